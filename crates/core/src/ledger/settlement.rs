//! Greedy debt settlement.
//!
//! Participants are sorted by net balance (biggest debtor first, biggest
//! creditor last) with a stable sort, so ties keep their input order. Two
//! cursors walk inward: the current debtor pays the current creditor as much
//! as both can absorb, and whichever side reaches zero moves on. Each payment
//! settles at least one participant, so at most `N - 1` transfers are emitted.
//!
//! Not guaranteed to be the theoretical minimum number of transfers, but
//! deterministic for a given input order.

use serde::{Deserialize, Serialize};
use splitpot_shared::types::{Money, ParticipantId};
use tracing::debug;

use super::balance::Balance;

/// A payment from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Who pays.
    pub from: ParticipantId,
    /// Who receives.
    pub to: ParticipantId,
    /// How much, always positive.
    pub amount: Money,
}

/// Reduces net balances to a short list of transfers.
pub struct BalanceSettler;

impl BalanceSettler {
    /// Computes the transfers that bring every balance to zero.
    ///
    /// Balances that are already zero never appear in a transfer. If the
    /// balances do not sum to zero the leftover stays unsettled; the
    /// function never fails.
    ///
    /// # Example
    ///
    /// ```
    /// use splitpot_core::ledger::{Balance, BalanceSettler};
    /// use splitpot_shared::types::{Money, ParticipantId};
    ///
    /// let balances = vec![
    ///     Balance::new(ParticipantId::from("a"), Money::from_cents(1500)),
    ///     Balance::new(ParticipantId::from("b"), Money::from_cents(-1500)),
    /// ];
    /// let transfers = BalanceSettler::settle(&balances);
    /// assert_eq!(transfers.len(), 1);
    /// assert_eq!(transfers[0].from, ParticipantId::from("b"));
    /// assert_eq!(transfers[0].amount, Money::from_cents(1500));
    /// ```
    #[must_use]
    pub fn settle(balances: &[Balance]) -> Vec<Transfer> {
        let mut ledger: Vec<(&ParticipantId, Money)> = balances
            .iter()
            .map(|b| (&b.participant_id, b.net))
            .collect();
        ledger.sort_by_key(|&(_, net)| net);

        let mut transfers = Vec::new();
        if ledger.len() < 2 {
            return transfers;
        }

        let mut i = 0;
        let mut j = ledger.len() - 1;
        while i < j {
            let debt = (-ledger[i].1).max(Money::ZERO);
            let credit = ledger[j].1.max(Money::ZERO);

            if debt.is_zero() && credit.is_zero() {
                i += 1;
                j -= 1;
                continue;
            }

            let amount = debt.min(credit);
            if amount.is_positive() {
                transfers.push(Transfer {
                    from: ledger[i].0.clone(),
                    to: ledger[j].0.clone(),
                    amount,
                });
                ledger[i].1 += amount;
                ledger[j].1 -= amount;
            }

            if !ledger[i].1.is_negative() {
                i += 1;
            }
            if !ledger[j].1.is_positive() {
                j -= 1;
            }
        }

        debug!(
            participants = balances.len(),
            transfers = transfers.len(),
            "balances settled"
        );
        transfers
    }
}
