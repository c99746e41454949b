//! Net balance calculation.
//!
//! A participant's net balance is what they paid minus their share of every
//! expense. Positive means the group owes them, negative means they owe the
//! group. Shares are allocated per expense in whole cents with the first
//! split absorbing the rounding residue, so every well-formed expense moves
//! exactly zero in total and the balances of an event always sum to zero.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use splitpot_shared::types::{Money, ParticipantId, Percentage};
use tracing::warn;

use super::settlement::Transfer;
use super::types::{Expense, Participant, Split};
use crate::split::SplitAllocator;

/// A participant's net position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// The participant.
    pub participant_id: ParticipantId,
    /// Net amount: positive if owed money, negative if owing.
    pub net: Money,
}

impl Balance {
    /// Creates a balance.
    #[must_use]
    pub fn new(participant_id: ParticipantId, net: Money) -> Self {
        Self {
            participant_id,
            net,
        }
    }
}

/// Net balances of every roster participant, in roster order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceSheet {
    balances: Vec<Balance>,
    index: HashMap<ParticipantId, usize>,
}

impl BalanceSheet {
    /// Computes net balances for `roster` from `expenses`.
    ///
    /// Ids that are not in the roster are ignored. A roster participant that
    /// takes part in no expense ends with a balance of zero.
    #[must_use]
    pub fn compute(roster: &[Participant], expenses: &[Expense]) -> Self {
        let mut sheet = Self::from_balances(
            roster
                .iter()
                .map(|p| Balance::new(p.id.clone(), Money::ZERO))
                .collect(),
        );
        for expense in expenses {
            sheet.record(expense);
        }
        sheet
    }

    /// Wraps already computed balances. A repeated id keeps its first entry.
    #[must_use]
    pub fn from_balances(balances: Vec<Balance>) -> Self {
        let mut sheet = Self::default();
        for balance in balances {
            if sheet.index.contains_key(&balance.participant_id) {
                warn!(participant_id = %balance.participant_id, "duplicate participant ignored");
                continue;
            }
            sheet
                .index
                .insert(balance.participant_id.clone(), sheet.balances.len());
            sheet.balances.push(balance);
        }
        sheet
    }

    /// Net balance of a participant, if they are on the sheet.
    #[must_use]
    pub fn get(&self, participant_id: &ParticipantId) -> Option<Money> {
        self.index.get(participant_id).map(|&i| self.balances[i].net)
    }

    /// Sum of all balances. Zero for well-formed expenses.
    #[must_use]
    pub fn total(&self) -> Money {
        self.balances.iter().map(|b| b.net).sum()
    }

    /// Returns true if every balance is zero.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.balances.iter().all(|b| b.net.is_zero())
    }

    /// Applies a settling payment: the debtor's balance rises and the
    /// creditor's falls by the transfer amount.
    pub fn apply(&mut self, transfer: &Transfer) {
        self.adjust(&transfer.from, transfer.amount);
        self.adjust(&transfer.to, -transfer.amount);
    }

    /// Balances in roster order.
    #[must_use]
    pub fn balances(&self) -> &[Balance] {
        &self.balances
    }

    /// Consumes the sheet, returning the balances in roster order.
    #[must_use]
    pub fn into_balances(self) -> Vec<Balance> {
        self.balances
    }

    fn record(&mut self, expense: &Expense) {
        let shares = expense_shares(expense);
        if shares.is_empty() {
            warn!(expense_id = %expense.id, "expense has nobody to charge, skipped");
            return;
        }

        if !self.adjust(&expense.payer, expense.amount) {
            warn!(expense_id = %expense.id, payer = %expense.payer, "unknown payer ignored");
        }
        for (participant_id, share) in shares {
            if !self.adjust(&participant_id, -share) {
                warn!(expense_id = %expense.id, participant_id = %participant_id, "unknown split participant ignored");
            }
        }
    }

    fn adjust(&mut self, participant_id: &ParticipantId, delta: Money) -> bool {
        match self.index.get(participant_id) {
            Some(&i) => {
                self.balances[i].net += delta;
                true
            }
            None => false,
        }
    }
}

/// Splits an expense amount into per-participant shares in whole cents.
///
/// An expense without explicit splits is shared equally by its participants.
/// If the percentages do not add up to 100%, each share is rounded on its own
/// and the expense will not net to zero.
#[must_use]
pub fn expense_shares(expense: &Expense) -> Vec<(ParticipantId, Money)> {
    let splits: Vec<Split> = if expense.splits.is_empty() {
        match SplitAllocator::equal_percentages(&expense.participants) {
            Ok(splits) => splits,
            Err(err) => {
                warn!(expense_id = %expense.id, error = %err, "cannot derive equal split");
                return Vec::new();
            }
        }
    } else {
        expense.splits.clone()
    };

    match SplitAllocator::percentages_to_amounts(expense.amount, &splits) {
        Ok(allocations) => allocations
            .into_iter()
            .map(|a| (a.participant_id, a.amount))
            .collect(),
        Err(err) => {
            warn!(expense_id = %expense.id, error = %err, "split does not reconcile, rounding shares independently");
            splits
                .into_iter()
                .filter_map(|split| {
                    expense
                        .amount
                        .checked_ratio(split.percentage.hundredths(), Percentage::HUNDRED.hundredths())
                        .map(|share| (split.user_id, share))
                })
                .collect()
        }
    }
}
