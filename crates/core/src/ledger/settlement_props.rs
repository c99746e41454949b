//! Property-based tests for balances and settlement.
//!
//! - Conservation: balances always net to exactly zero
//! - Settlement correctness: applying the transfers zeroes every balance
//! - Bound: at most N - 1 transfers for N participants with a balance

use chrono::Utc;
use proptest::prelude::*;
use splitpot_shared::types::{ExpenseId, Money, ParticipantId};

use super::balance::{Balance, BalanceSheet};
use super::settlement::BalanceSettler;
use super::types::{Expense, NewExpense, Participant};
use crate::split::{Allocation, SplitAllocator};

const MAX_PARTICIPANTS: usize = 12;

fn roster(size: usize) -> Vec<Participant> {
    (0..size)
        .map(|i| Participant {
            id: ParticipantId::from(format!("p{i}")),
            name: format!("Participant {i}"),
        })
        .collect()
}

/// Strategy for one expense over a roster of `MAX_PARTICIPANTS`: a payer
/// index and a custom amount per participant (zero means not involved).
fn expense_strategy() -> impl Strategy<Value = Option<Expense>> {
    (
        0..MAX_PARTICIPANTS,
        prop::collection::vec(prop_oneof![Just(0i64), 1i64..200_000], MAX_PARTICIPANTS),
    )
        .prop_map(|(payer, cents)| {
            let allocations: Vec<Allocation> = cents
                .iter()
                .enumerate()
                .filter(|&(_, &c)| c > 0)
                .map(|(i, &c)| {
                    Allocation::new(ParticipantId::from(format!("p{i}")), Money::from_cents(c))
                })
                .collect();
            let total: Money = allocations.iter().map(|a| a.amount).sum();
            let splits = SplitAllocator::amounts_to_percentages(&allocations, total).ok()?;

            Some(Expense::from_input(
                ExpenseId::new(),
                NewExpense {
                    description: "generated".into(),
                    amount: total,
                    payer: ParticipantId::from(format!("p{payer}")),
                    participants: allocations.into_iter().map(|a| a.participant_id).collect(),
                    splits,
                },
                Utc::now(),
            ))
        })
}

fn expenses_strategy() -> impl Strategy<Value = Vec<Expense>> {
    prop::collection::vec(expense_strategy(), 0..25)
        .prop_map(|expenses| expenses.into_iter().flatten().collect())
}

/// Strategy for arbitrary balances that net to zero.
fn zero_sum_balances() -> impl Strategy<Value = Vec<Balance>> {
    prop::collection::vec(-500_000i64..500_000, 1..MAX_PARTICIPANTS).prop_map(|mut cents| {
        let sum: i64 = cents.iter().sum();
        cents.push(-sum);
        cents
            .into_iter()
            .enumerate()
            .map(|(i, c)| Balance::new(ParticipantId::from(format!("p{i}")), Money::from_cents(c)))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Net balances of any set of well-formed expenses sum to exactly zero.
    #[test]
    fn prop_balances_are_conserved(expenses in expenses_strategy()) {
        let sheet = BalanceSheet::compute(&roster(MAX_PARTICIPANTS), &expenses);
        prop_assert_eq!(sheet.total(), Money::ZERO);
    }

    /// Applying every emitted transfer settles the whole sheet.
    #[test]
    fn prop_transfers_settle_computed_balances(expenses in expenses_strategy()) {
        let mut sheet = BalanceSheet::compute(&roster(MAX_PARTICIPANTS), &expenses);
        let transfers = BalanceSettler::settle(sheet.balances());
        for transfer in &transfers {
            prop_assert!(transfer.amount.is_positive());
            sheet.apply(transfer);
        }
        prop_assert!(sheet.is_settled());
    }

    /// Settlement of zero-sum balances zeroes everything within N - 1 transfers.
    #[test]
    fn prop_settlement_bound(balances in zero_sum_balances()) {
        let nonzero = balances.iter().filter(|b| !b.net.is_zero()).count();
        let transfers = BalanceSettler::settle(&balances);

        prop_assert!(transfers.len() <= nonzero.saturating_sub(1));

        let mut sheet = BalanceSheet::from_balances(balances);
        for transfer in &transfers {
            sheet.apply(transfer);
        }
        prop_assert!(sheet.is_settled());
    }

    /// Participants with a zero balance never pay or receive.
    #[test]
    fn prop_zero_balances_never_transfer(balances in zero_sum_balances()) {
        let transfers = BalanceSettler::settle(&balances);
        for balance in balances.iter().filter(|b| b.net.is_zero()) {
            prop_assert!(transfers
                .iter()
                .all(|t| t.from != balance.participant_id && t.to != balance.participant_id));
        }
    }

    /// Settlement is deterministic.
    #[test]
    fn prop_settlement_is_deterministic(balances in zero_sum_balances()) {
        prop_assert_eq!(BalanceSettler::settle(&balances), BalanceSettler::settle(&balances));
    }
}
