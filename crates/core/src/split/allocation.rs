//! Amount allocation across the participants of an expense.
//!
//! Every operation here keeps an exact sum: the parts always add up to the
//! total (or to 100%). Rounding residue is never spread around; the first
//! participant in input order absorbs it. Amounts are whole cents and
//! percentages whole hundredths of a percent, rounded half away from zero.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use splitpot_shared::types::money::round_div;
use splitpot_shared::types::{Money, ParticipantId, Percentage};

use super::error::SplitError;
use crate::ledger::Split;

/// An amount assigned to one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// The participant carrying this amount.
    pub participant_id: ParticipantId,
    /// The participant's part of the total.
    pub amount: Money,
}

impl Allocation {
    /// Creates an allocation.
    #[must_use]
    pub fn new(participant_id: ParticipantId, amount: Money) -> Self {
        Self {
            participant_id,
            amount,
        }
    }
}

/// Allocation utility for splitting an expense between participants.
pub struct SplitAllocator;

impl SplitAllocator {
    /// Split `total` equally across `participant_ids`.
    ///
    /// Every participant but the first gets `round2(total / N)`; the first
    /// gets whatever is left so the sum equals `total` exactly. An empty
    /// participant list yields an empty allocation. A zero total is allowed
    /// (all parts are zero); a negative total is refused.
    ///
    /// # Example
    ///
    /// ```
    /// use splitpot_core::split::SplitAllocator;
    /// use splitpot_shared::types::{Money, ParticipantId};
    ///
    /// let ids = ["a", "b", "c"].map(ParticipantId::from);
    /// let parts = SplitAllocator::allocate_equal(Money::from_cents(1000), &ids).unwrap();
    /// let cents: Vec<i64> = parts.iter().map(|p| p.amount.cents()).collect();
    /// assert_eq!(cents, vec![334, 333, 333]);
    /// ```
    pub fn allocate_equal(
        total: Money,
        participant_ids: &[ParticipantId],
    ) -> Result<Vec<Allocation>, SplitError> {
        if total.is_negative() {
            return Err(SplitError::InvalidTotal(total));
        }
        if participant_ids.is_empty() {
            return Ok(Vec::new());
        }
        ensure_unique(participant_ids.iter())?;

        let count = i64::try_from(participant_ids.len()).map_err(|_| SplitError::AmountOutOfRange)?;
        let share = total
            .checked_ratio(1, count)
            .ok_or(SplitError::AmountOutOfRange)?;

        let mut allocations: Vec<Allocation> = participant_ids
            .iter()
            .map(|id| Allocation::new(id.clone(), share))
            .collect();
        absorb_residue(&mut allocations, total);

        Ok(allocations)
    }

    /// Adjust custom amounts after the expense total changed.
    ///
    /// Only the first participant absorbs the difference between `total` and
    /// the current sum; every other custom amount is left untouched. An empty
    /// list is returned unchanged.
    pub fn rebalance_on_total_change(
        total: Money,
        mut current: Vec<Allocation>,
    ) -> Result<Vec<Allocation>, SplitError> {
        if total.is_negative() {
            return Err(SplitError::InvalidTotal(total));
        }
        if current.is_empty() {
            return Ok(current);
        }

        absorb_residue(&mut current, total);
        Ok(current)
    }

    /// Convert participant amounts into percentages of `total`.
    ///
    /// Every participant but the first gets `round2(100 * amount / total)`;
    /// the first absorbs the remainder so the percentages add up to exactly
    /// 100.00.
    ///
    /// # Errors
    ///
    /// - [`SplitError::InvalidTotal`] if `total` is zero or negative.
    /// - [`SplitError::AmountsDoNotSumToTotal`] if the amounts do not add up to
    ///   `total`; the first participant only absorbs rounding, never a gap in
    ///   the input.
    ///
    /// # Example
    ///
    /// ```
    /// use splitpot_core::split::{Allocation, SplitAllocator};
    /// use splitpot_shared::types::{Money, ParticipantId, Percentage};
    ///
    /// let amounts = vec![
    ///     Allocation::new(ParticipantId::from("a"), Money::from_cents(334)),
    ///     Allocation::new(ParticipantId::from("b"), Money::from_cents(333)),
    ///     Allocation::new(ParticipantId::from("c"), Money::from_cents(333)),
    /// ];
    /// let splits = SplitAllocator::amounts_to_percentages(&amounts, Money::from_cents(1000)).unwrap();
    /// let total: Percentage = splits.iter().map(|s| s.percentage).sum();
    /// assert_eq!(total, Percentage::HUNDRED);
    /// assert_eq!(splits[1].percentage, Percentage::from_hundredths(3330));
    /// ```
    pub fn amounts_to_percentages(
        amounts: &[Allocation],
        total: Money,
    ) -> Result<Vec<Split>, SplitError> {
        if !total.is_positive() {
            return Err(SplitError::InvalidTotal(total));
        }
        if amounts.is_empty() {
            return Ok(Vec::new());
        }
        ensure_unique(amounts.iter().map(|a| &a.participant_id))?;

        let actual: Money = amounts.iter().map(|a| a.amount).sum();
        if actual != total {
            return Err(SplitError::AmountsDoNotSumToTotal {
                expected: total,
                actual,
            });
        }

        let hundred = i128::from(Percentage::HUNDRED.hundredths());
        let mut splits = Vec::with_capacity(amounts.len());
        let mut assigned = 0i64;
        for allocation in &amounts[1..] {
            let hundredths = round_div(
                i128::from(allocation.amount.cents()) * hundred,
                i128::from(total.cents()),
            )
            .and_then(|v| i64::try_from(v).ok())
            .ok_or(SplitError::AmountOutOfRange)?;
            assigned = assigned.saturating_add(hundredths);
            splits.push(Split::new(
                allocation.participant_id.clone(),
                Percentage::from_hundredths(hundredths),
            ));
        }

        let first = Split::new(
            amounts[0].participant_id.clone(),
            Percentage::from_hundredths(Percentage::HUNDRED.hundredths().saturating_sub(assigned)),
        );
        splits.insert(0, first);

        Ok(splits)
    }

    /// Convert stored percentages back into amounts of `total`.
    ///
    /// Used when an existing expense is opened for editing. Every participant
    /// but the first gets `round2(percentage / 100 * total)`; the first
    /// absorbs the remainder.
    ///
    /// # Errors
    ///
    /// - [`SplitError::InvalidTotal`] if `total` is negative.
    /// - [`SplitError::PercentagesDoNotSumToHundred`] if the splits are not a
    ///   complete 100% split.
    pub fn percentages_to_amounts(
        total: Money,
        splits: &[Split],
    ) -> Result<Vec<Allocation>, SplitError> {
        if total.is_negative() {
            return Err(SplitError::InvalidTotal(total));
        }
        if splits.is_empty() {
            return Ok(Vec::new());
        }

        let actual: Percentage = splits.iter().map(|s| s.percentage).sum();
        if actual != Percentage::HUNDRED {
            return Err(SplitError::PercentagesDoNotSumToHundred { actual });
        }

        let mut allocations = splits
            .iter()
            .map(|split| {
                total
                    .checked_ratio(split.percentage.hundredths(), Percentage::HUNDRED.hundredths())
                    .map(|amount| Allocation::new(split.user_id.clone(), amount))
                    .ok_or(SplitError::AmountOutOfRange)
            })
            .collect::<Result<Vec<_>, _>>()?;
        absorb_residue(&mut allocations, total);

        Ok(allocations)
    }

    /// Equal percentage split across `participant_ids`, first absorbing the
    /// residue (e.g. 33.34 / 33.33 / 33.33).
    ///
    /// Used for expenses recorded with participants but without explicit
    /// splits.
    pub fn equal_percentages(participant_ids: &[ParticipantId]) -> Result<Vec<Split>, SplitError> {
        if participant_ids.is_empty() {
            return Ok(Vec::new());
        }
        ensure_unique(participant_ids.iter())?;

        let count = i128::try_from(participant_ids.len()).map_err(|_| SplitError::AmountOutOfRange)?;
        let hundredths = round_div(i128::from(Percentage::HUNDRED.hundredths()), count)
            .and_then(|v| i64::try_from(v).ok())
            .ok_or(SplitError::AmountOutOfRange)?;

        let mut splits: Vec<Split> = participant_ids
            .iter()
            .map(|id| Split::new(id.clone(), Percentage::from_hundredths(hundredths)))
            .collect();
        let rest: Percentage = splits[1..].iter().map(|s| s.percentage).sum();
        splits[0].percentage =
            Percentage::from_hundredths(Percentage::HUNDRED.hundredths() - rest.hundredths());

        Ok(splits)
    }
}

/// Sets the first allocation so the whole list sums to `total`.
fn absorb_residue(allocations: &mut [Allocation], total: Money) {
    let Some((first, rest)) = allocations.split_first_mut() else {
        return;
    };
    let others: Money = rest.iter().map(|a| a.amount).sum();
    first.amount = total - others;
}

fn ensure_unique<'a>(ids: impl Iterator<Item = &'a ParticipantId>) -> Result<(), SplitError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(SplitError::DuplicateParticipant(id.clone()));
        }
    }
    Ok(())
}
