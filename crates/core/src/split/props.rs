//! Property-based tests for split allocation.
//!
//! - Exact-sum allocation: equal parts always add up to the total
//! - Percentage round-trip: converted percentages always add up to 100.00
//! - Determinism: identical inputs give identical outputs

use proptest::prelude::*;
use splitpot_shared::types::{Money, ParticipantId, Percentage};

use super::allocation::{Allocation, SplitAllocator};

/// Strategy to generate positive totals (0.01 to 1,000,000.00).
fn positive_total() -> impl Strategy<Value = Money> {
    (1i64..100_000_000i64).prop_map(Money::from_cents)
}

/// Strategy to generate 1 to 30 distinct participant ids.
fn participant_ids() -> impl Strategy<Value = Vec<ParticipantId>> {
    (1usize..30).prop_map(|n| {
        (0..n)
            .map(|i| ParticipantId::from(format!("p{i}")))
            .collect()
    })
}

/// Strategy to generate a total together with custom amounts summing to it.
fn custom_amounts() -> impl Strategy<Value = (Money, Vec<Allocation>)> {
    prop::collection::vec(0i64..500_000, 1..20).prop_filter_map(
        "total must be positive",
        |cents| {
            let total: i64 = cents.iter().sum();
            (total > 0).then(|| {
                let allocations = cents
                    .iter()
                    .enumerate()
                    .map(|(i, c)| {
                        Allocation::new(ParticipantId::from(format!("p{i}")), Money::from_cents(*c))
                    })
                    .collect();
                (Money::from_cents(total), allocations)
            })
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Equal allocation sums exactly to the total.
    #[test]
    fn prop_allocate_equal_sums_to_total(
        total in positive_total(),
        ids in participant_ids(),
    ) {
        let parts = SplitAllocator::allocate_equal(total, &ids).unwrap();
        prop_assert_eq!(parts.len(), ids.len());
        prop_assert_eq!(parts.iter().map(|p| p.amount).sum::<Money>(), total);
    }

    /// Only the first participant deviates from round2(total / N), and by
    /// less than one cent per other participant.
    #[test]
    fn prop_allocate_equal_only_first_deviates(
        total in positive_total(),
        ids in participant_ids(),
    ) {
        let parts = SplitAllocator::allocate_equal(total, &ids).unwrap();
        let count = i64::try_from(ids.len()).unwrap();
        let share = total.checked_ratio(1, count).unwrap();

        for part in &parts[1..] {
            prop_assert_eq!(part.amount, share);
        }
        let drift = (parts[0].amount - share).cents().abs();
        prop_assert!(drift < count, "first part drifted by {} cents", drift);
    }

    /// Calling allocate_equal twice yields the same parts.
    #[test]
    fn prop_allocate_equal_is_deterministic(
        total in positive_total(),
        ids in participant_ids(),
    ) {
        let first = SplitAllocator::allocate_equal(total, &ids).unwrap();
        let second = SplitAllocator::allocate_equal(total, &ids).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Percentages derived from amounts add up to exactly 100.00.
    #[test]
    fn prop_amounts_to_percentages_sum_to_hundred(
        (total, amounts) in custom_amounts(),
    ) {
        let splits = SplitAllocator::amounts_to_percentages(&amounts, total).unwrap();
        let sum: Percentage = splits.iter().map(|s| s.percentage).sum();
        prop_assert_eq!(sum, Percentage::HUNDRED);
    }

    /// Percentages converted back to amounts add up to the total.
    #[test]
    fn prop_percentages_to_amounts_sums_to_total(
        (total, amounts) in custom_amounts(),
        new_total in positive_total(),
    ) {
        let splits = SplitAllocator::amounts_to_percentages(&amounts, total).unwrap();
        let back = SplitAllocator::percentages_to_amounts(new_total, &splits).unwrap();
        prop_assert_eq!(back.iter().map(|a| a.amount).sum::<Money>(), new_total);
    }

    /// Rebalancing touches only the first participant and restores the sum.
    #[test]
    fn prop_rebalance_only_moves_first(
        (total, amounts) in custom_amounts(),
        new_total in positive_total(),
    ) {
        let rebalanced = SplitAllocator::rebalance_on_total_change(new_total, amounts.clone()).unwrap();
        prop_assert_eq!(rebalanced.iter().map(|a| a.amount).sum::<Money>(), new_total);
        prop_assert_eq!(&rebalanced[1..], &amounts[1..]);
        prop_assert_eq!(rebalanced[0].amount - amounts[0].amount, new_total - total);
    }
}
