//! Core business logic for Splitpot.
//!
//! This crate contains pure business logic with ZERO I/O dependencies.
//! All domain types, allocation rules, and settlement calculations live here.
//!
//! # Modules
//!
//! - `split` - Splitting a total across participants, and the expense form
//! - `ledger` - Net balances, settlement, and expense validation
//! - `event` - The event aggregate that owns participants and expenses

pub mod event;
pub mod ledger;
pub mod split;
