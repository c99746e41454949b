//! Ledger service: balances and settlement for one event snapshot.

use serde::{Deserialize, Serialize};
use tracing::debug_span;

use super::balance::{Balance, BalanceSheet};
use super::settlement::{BalanceSettler, Transfer};
use super::types::{Expense, Participant};

/// Net balances and the transfers that settle them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Net balance per roster participant, in roster order.
    pub balances: Vec<Balance>,
    /// Settling transfers, in emission order.
    pub transfers: Vec<Transfer>,
}

/// Ledger service for computing who owes whom.
///
/// Stateless: every call recomputes from the snapshot it is given.
pub struct LedgerService;

impl LedgerService {
    /// Computes balances and settling transfers for an event.
    #[must_use]
    pub fn summarize(roster: &[Participant], expenses: &[Expense]) -> Summary {
        let span = debug_span!(
            "summarize",
            participants = roster.len(),
            expenses = expenses.len()
        );
        let _enter = span.enter();

        let sheet = BalanceSheet::compute(roster, expenses);
        if !sheet.total().is_zero() {
            tracing::warn!(residue = %sheet.total(), "balances do not net to zero");
        }
        let transfers = BalanceSettler::settle(sheet.balances());

        Summary {
            balances: sheet.into_balances(),
            transfers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use splitpot_shared::types::{ExpenseId, Money, ParticipantId, Percentage};

    use crate::ledger::types::{NewExpense, Split};

    #[test]
    fn test_summarize_two_participants() {
        let roster = vec![
            Participant {
                id: ParticipantId::from("a"),
                name: "Ana".into(),
            },
            Participant {
                id: ParticipantId::from("b"),
                name: "Ben".into(),
            },
        ];
        let expenses = vec![Expense::from_input(
            ExpenseId::new(),
            NewExpense {
                description: "Dinner".into(),
                amount: Money::from_cents(3000),
                payer: ParticipantId::from("a"),
                participants: vec![ParticipantId::from("a"), ParticipantId::from("b")],
                splits: vec![
                    Split::new(ParticipantId::from("a"), Percentage::from_hundredths(5000)),
                    Split::new(ParticipantId::from("b"), Percentage::from_hundredths(5000)),
                ],
            },
            Utc::now(),
        )];

        let summary = LedgerService::summarize(&roster, &expenses);
        assert_eq!(
            summary.balances,
            vec![
                Balance::new(ParticipantId::from("a"), Money::from_cents(1500)),
                Balance::new(ParticipantId::from("b"), Money::from_cents(-1500)),
            ]
        );
        assert_eq!(
            summary.transfers,
            vec![Transfer {
                from: ParticipantId::from("b"),
                to: ParticipantId::from("a"),
                amount: Money::from_cents(1500),
            }]
        );
    }

    #[test]
    fn test_summarize_empty_event() {
        let summary = LedgerService::summarize(&[], &[]);
        assert!(summary.balances.is_empty());
        assert!(summary.transfers.is_empty());
    }
}
