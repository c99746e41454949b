//! Split allocation error types.

use splitpot_shared::AppError;
use splitpot_shared::types::{Money, ParticipantId, Percentage};
use thiserror::Error;

/// Errors raised while allocating an amount across participants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// Total is zero or negative where a positive total is required.
    #[error("Invalid total: {0}")]
    InvalidTotal(Money),

    /// Participant amounts do not add up to the expense total.
    #[error("Amounts add up to {actual}, expected {expected}")]
    AmountsDoNotSumToTotal {
        /// The expense total.
        expected: Money,
        /// Sum of the participant amounts.
        actual: Money,
    },

    /// Split percentages do not add up to 100%.
    #[error("Percentages add up to {actual}, expected 100.00%")]
    PercentagesDoNotSumToHundred {
        /// Sum of the split percentages.
        actual: Percentage,
    },

    /// A participant appears twice in the same allocation.
    #[error("Participant {0} is listed more than once")]
    DuplicateParticipant(ParticipantId),

    /// An intermediate result does not fit in the money range.
    #[error("Amount out of range")]
    AmountOutOfRange,
}

impl SplitError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTotal(_) => "INVALID_TOTAL",
            Self::AmountsDoNotSumToTotal { .. } | Self::PercentagesDoNotSumToHundred { .. } => {
                "UNRECONCILED_RESIDUE"
            }
            Self::DuplicateParticipant(_) => "DUPLICATE_PARTICIPANT",
            Self::AmountOutOfRange => "AMOUNT_OUT_OF_RANGE",
        }
    }
}

impl From<SplitError> for AppError {
    fn from(err: SplitError) -> Self {
        Self::Validation(err.to_string())
    }
}
