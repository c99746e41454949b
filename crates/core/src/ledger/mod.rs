//! Shared-expense ledger.
//!
//! This module implements the settlement engine:
//! - Participant, expense and split types
//! - Net balance calculation
//! - Greedy settlement into transfers
//! - Expense validation against the event roster
//! - Ledger service tying balances and settlement together

pub mod balance;
pub mod service;
pub mod settlement;
pub mod types;
pub mod validation;

#[cfg(test)]
mod settlement_props;

pub use balance::{Balance, BalanceSheet, expense_shares};
pub use service::{LedgerService, Summary};
pub use settlement::{BalanceSettler, Transfer};
pub use types::{Expense, NewExpense, Participant, Split};
pub use validation::{ExpenseValidationError, validate_expense};
