//! Business rule validation for recorded expenses.
//!
//! The settlement engine trusts its input; this is the layer that checks an
//! expense against the event roster before it is stored.

use std::collections::HashSet;

use splitpot_shared::AppError;
use splitpot_shared::types::{Money, ParticipantId, Percentage};
use thiserror::Error;

use super::types::{Expense, Participant};

/// Validation errors for expenses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseValidationError {
    /// Amount is zero or negative.
    #[error("Expense amount must be positive, got {0}")]
    NonPositiveAmount(Money),

    /// Payer is not a participant of the event.
    #[error("Payer {0} is not a participant of the event")]
    UnknownPayer(ParticipantId),

    /// Expense is shared by nobody.
    #[error("Expense must have at least one participant")]
    NoParticipants,

    /// A participant is listed twice.
    #[error("Participant {0} is listed more than once")]
    DuplicateParticipant(ParticipantId),

    /// A listed participant is not in the event roster.
    #[error("Participant {0} is not a participant of the event")]
    UnknownParticipant(ParticipantId),

    /// Two splits name the same participant.
    #[error("Participant {0} has more than one split")]
    DuplicateSplit(ParticipantId),

    /// A split references someone outside the expense's participants.
    #[error("Split for {0} does not belong to a listed participant")]
    SplitOutsideParticipants(ParticipantId),

    /// A split percentage is negative.
    #[error("Split for {user_id} has negative percentage {percentage}")]
    NegativePercentage {
        /// The participant.
        user_id: ParticipantId,
        /// The offending percentage.
        percentage: Percentage,
    },

    /// Split percentages do not add up to 100%.
    #[error("Split percentages add up to {0}, expected 100.00%")]
    UnreconciledPercentages(Percentage),
}

impl ExpenseValidationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::UnknownPayer(_) => "UNKNOWN_PAYER",
            Self::NoParticipants => "NO_PARTICIPANTS",
            Self::DuplicateParticipant(_) => "DUPLICATE_PARTICIPANT",
            Self::UnknownParticipant(_) => "UNKNOWN_PARTICIPANT",
            Self::DuplicateSplit(_) => "DUPLICATE_SPLIT",
            Self::SplitOutsideParticipants(_) => "SPLIT_OUTSIDE_PARTICIPANTS",
            Self::NegativePercentage { .. } => "NEGATIVE_PERCENTAGE",
            Self::UnreconciledPercentages(_) => "UNRECONCILED_RESIDUE",
        }
    }
}

impl From<ExpenseValidationError> for AppError {
    fn from(err: ExpenseValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Validates an expense against the event roster.
///
/// Splits may be empty, in which case the participants share equally.
///
/// # Errors
///
/// Returns the first rule the expense breaks.
pub fn validate_expense(
    expense: &Expense,
    roster: &[Participant],
) -> Result<(), ExpenseValidationError> {
    if !expense.amount.is_positive() {
        return Err(ExpenseValidationError::NonPositiveAmount(expense.amount));
    }

    let known: HashSet<&ParticipantId> = roster.iter().map(|p| &p.id).collect();
    if !known.contains(&expense.payer) {
        return Err(ExpenseValidationError::UnknownPayer(expense.payer.clone()));
    }

    if expense.participants.is_empty() {
        return Err(ExpenseValidationError::NoParticipants);
    }

    let mut listed = HashSet::with_capacity(expense.participants.len());
    for participant_id in &expense.participants {
        if !listed.insert(participant_id) {
            return Err(ExpenseValidationError::DuplicateParticipant(
                participant_id.clone(),
            ));
        }
        if !known.contains(participant_id) {
            return Err(ExpenseValidationError::UnknownParticipant(
                participant_id.clone(),
            ));
        }
    }

    if expense.splits.is_empty() {
        return Ok(());
    }

    let mut split_users = HashSet::with_capacity(expense.splits.len());
    for split in &expense.splits {
        if !split_users.insert(&split.user_id) {
            return Err(ExpenseValidationError::DuplicateSplit(split.user_id.clone()));
        }
        if !listed.contains(&split.user_id) {
            return Err(ExpenseValidationError::SplitOutsideParticipants(
                split.user_id.clone(),
            ));
        }
        if split.percentage.is_negative() {
            return Err(ExpenseValidationError::NegativePercentage {
                user_id: split.user_id.clone(),
                percentage: split.percentage,
            });
        }
    }

    let total = expense.percentage_total();
    if total != Percentage::HUNDRED {
        return Err(ExpenseValidationError::UnreconciledPercentages(total));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::{fixture, rstest};
    use splitpot_shared::types::ExpenseId;

    use crate::ledger::types::{NewExpense, Split};

    #[fixture]
    fn roster() -> Vec<Participant> {
        ["a", "b", "c"]
            .iter()
            .map(|id| Participant {
                id: ParticipantId::from(*id),
                name: id.to_string(),
            })
            .collect()
    }

    fn expense(amount: i64, payer: &str, participants: &[&str], splits: &[(&str, i64)]) -> Expense {
        Expense::from_input(
            ExpenseId::from("e1"),
            NewExpense {
                description: "test".into(),
                amount: Money::from_cents(amount),
                payer: ParticipantId::from(payer),
                participants: participants.iter().copied().map(ParticipantId::from).collect(),
                splits: splits
                    .iter()
                    .map(|(id, pct)| {
                        Split::new(ParticipantId::from(*id), Percentage::from_hundredths(*pct))
                    })
                    .collect(),
            },
            Utc::now(),
        )
    }

    #[rstest]
    fn test_valid_expense(roster: Vec<Participant>) {
        let e = expense(3000, "a", &["a", "b"], &[("a", 5000), ("b", 5000)]);
        assert_eq!(validate_expense(&e, &roster), Ok(()));
    }

    #[rstest]
    fn test_valid_expense_without_splits(roster: Vec<Participant>) {
        let e = expense(3000, "c", &["a", "b"], &[]);
        assert_eq!(validate_expense(&e, &roster), Ok(()));
    }

    #[rstest]
    #[case::zero_amount(
        expense(0, "a", &["a"], &[("a", 10_000)]),
        ExpenseValidationError::NonPositiveAmount(Money::ZERO)
    )]
    #[case::negative_amount(
        expense(-100, "a", &["a"], &[("a", 10_000)]),
        ExpenseValidationError::NonPositiveAmount(Money::from_cents(-100))
    )]
    #[case::unknown_payer(
        expense(100, "z", &["a"], &[("a", 10_000)]),
        ExpenseValidationError::UnknownPayer(ParticipantId::from("z"))
    )]
    #[case::no_participants(
        expense(100, "a", &[], &[("a", 10_000)]),
        ExpenseValidationError::NoParticipants
    )]
    #[case::duplicate_participant(
        expense(100, "a", &["a", "a"], &[]),
        ExpenseValidationError::DuplicateParticipant(ParticipantId::from("a"))
    )]
    #[case::unknown_participant(
        expense(100, "a", &["a", "z"], &[]),
        ExpenseValidationError::UnknownParticipant(ParticipantId::from("z"))
    )]
    #[case::split_outside_participants(
        expense(100, "a", &["a"], &[("a", 5000), ("b", 5000)]),
        ExpenseValidationError::SplitOutsideParticipants(ParticipantId::from("b"))
    )]
    #[case::duplicate_split(
        expense(100, "a", &["a", "b"], &[("a", 5000), ("a", 5000)]),
        ExpenseValidationError::DuplicateSplit(ParticipantId::from("a"))
    )]
    #[case::negative_percentage(
        expense(100, "a", &["a", "b"], &[("a", 11_000), ("b", -1000)]),
        ExpenseValidationError::NegativePercentage {
            user_id: ParticipantId::from("b"),
            percentage: Percentage::from_hundredths(-1000),
        }
    )]
    #[case::unreconciled(
        expense(100, "a", &["a", "b"], &[("a", 5000), ("b", 4999)]),
        ExpenseValidationError::UnreconciledPercentages(Percentage::from_hundredths(9999))
    )]
    fn test_invalid_expense(
        roster: Vec<Participant>,
        #[case] e: Expense,
        #[case] expected: ExpenseValidationError,
    ) {
        assert_eq!(validate_expense(&e, &roster), Err(expected));
    }

    #[rstest]
    fn test_overflowing_percentages_are_unreconciled(roster: Vec<Participant>) {
        let huge = i64::MAX / 2 + 1;
        let e = expense(100, "a", &["a", "b"], &[("a", huge), ("b", huge)]);
        assert_eq!(
            validate_expense(&e, &roster),
            Err(ExpenseValidationError::UnreconciledPercentages(
                Percentage::from_hundredths(i64::MAX)
            ))
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ExpenseValidationError::UnreconciledPercentages(Percentage::ZERO).error_code(),
            "UNRECONCILED_RESIDUE"
        );
        assert_eq!(
            ExpenseValidationError::NoParticipants.error_code(),
            "NO_PARTICIPANTS"
        );
    }
}
