//! Event error types.

use splitpot_shared::AppError;
use splitpot_shared::types::{ExpenseId, ParticipantId};
use thiserror::Error;

use crate::ledger::ExpenseValidationError;

/// Errors raised when changing an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// Event or participant name is blank.
    #[error("Name cannot be blank")]
    BlankName,

    /// Participant not found.
    #[error("Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),

    /// Expense not found.
    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),

    /// Expense breaks a business rule.
    #[error(transparent)]
    InvalidExpense(#[from] ExpenseValidationError),
}

impl EventError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BlankName => "BLANK_NAME",
            Self::ParticipantNotFound(_) => "PARTICIPANT_NOT_FOUND",
            Self::ExpenseNotFound(_) => "EXPENSE_NOT_FOUND",
            Self::InvalidExpense(err) => err.error_code(),
        }
    }
}

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::ParticipantNotFound(_) | EventError::ExpenseNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            EventError::BlankName | EventError::InvalidExpense(_) => {
                Self::Validation(err.to_string())
            }
        }
    }
}
