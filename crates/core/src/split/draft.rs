//! Expense form state.
//!
//! An [`ExpenseDraft`] holds what a user is typing into the add/edit expense
//! form and keeps the per-participant amounts consistent with the total after
//! every edit, using [`SplitAllocator`]. [`ExpenseDraft::submit`] validates the
//! form and converts the amounts into percentage splits.
//!
//! Each operation leaves the draft normalized: whenever at least one
//! participant is selected, the amounts add up to the total. Operations are
//! applied in call order; changing the total and then enabling custom split
//! is not the same as enabling custom split and then changing the total.

use splitpot_shared::AppError;
use splitpot_shared::types::{ExpenseId, Money, ParticipantId};
use thiserror::Error;

use super::allocation::{Allocation, SplitAllocator};
use super::error::SplitError;
use crate::ledger::{Expense, NewExpense};

/// Errors raised by the expense form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    /// Description is empty after trimming.
    #[error("Description is required")]
    MissingDescription,

    /// Total is zero or negative.
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Money),

    /// No participant is selected.
    #[error("At least one participant must be selected")]
    NoParticipants,

    /// Per-participant amounts can only be edited in custom split mode.
    #[error("Custom split is not enabled")]
    NotCustomSplit,

    /// The participant is not selected in this draft.
    #[error("Participant {0} is not part of this expense")]
    UnknownParticipant(ParticipantId),

    /// A participant would carry a negative amount.
    #[error("Participant {0} has a negative share")]
    NegativeShare(ParticipantId),

    /// Allocation failed.
    #[error(transparent)]
    Split(#[from] SplitError),
}

impl DraftError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingDescription => "DESCRIPTION_REQUIRED",
            Self::InvalidAmount(_) => "AMOUNT_REQUIRED",
            Self::NoParticipants => "NO_PARTICIPANTS_SELECTED",
            Self::NotCustomSplit => "NOT_CUSTOM_SPLIT",
            Self::UnknownParticipant(_) => "UNKNOWN_PARTICIPANT",
            Self::NegativeShare(_) => "NEGATIVE_SHARE",
            Self::Split(err) => err.error_code(),
        }
    }
}

impl From<DraftError> for AppError {
    fn from(err: DraftError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// In-progress state of the add/edit expense form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDraft {
    editing: Option<ExpenseId>,
    description: String,
    total: Money,
    payer: ParticipantId,
    custom_split: bool,
    allocations: Vec<Allocation>,
}

impl ExpenseDraft {
    /// Starts a new expense paid by `payer`.
    ///
    /// The payer is preselected as the only participant, with an equal split.
    #[must_use]
    pub fn new(payer: ParticipantId) -> Self {
        Self {
            editing: None,
            description: String::new(),
            total: Money::ZERO,
            allocations: vec![Allocation::new(payer.clone(), Money::ZERO)],
            payer,
            custom_split: false,
        }
    }

    /// Opens an existing expense for editing.
    ///
    /// Stored percentages are turned back into amounts and custom split is
    /// enabled. An expense recorded without splits is opened as an equal
    /// split across its participants.
    pub fn edit(expense: &Expense) -> Result<Self, DraftError> {
        let (allocations, custom_split) = if expense.splits.is_empty() {
            (
                SplitAllocator::allocate_equal(expense.amount, &expense.participants)?,
                false,
            )
        } else {
            (
                SplitAllocator::percentages_to_amounts(expense.amount, &expense.splits)?,
                true,
            )
        };

        Ok(Self {
            editing: Some(expense.id.clone()),
            description: expense.description.clone(),
            total: expense.amount,
            payer: expense.payer.clone(),
            custom_split,
            allocations,
        })
    }

    /// Id of the expense being edited, if any.
    #[must_use]
    pub fn editing(&self) -> Option<&ExpenseId> {
        self.editing.as_ref()
    }

    /// Current description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Current total.
    #[must_use]
    pub fn total(&self) -> Money {
        self.total
    }

    /// Current payer.
    #[must_use]
    pub fn payer(&self) -> &ParticipantId {
        &self.payer
    }

    /// Whether per-participant amounts are entered by hand.
    #[must_use]
    pub fn is_custom_split(&self) -> bool {
        self.custom_split
    }

    /// Selected participants and their amounts, in selection order.
    #[must_use]
    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    /// Sets the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Sets the payer. The participant selection is left as is.
    pub fn set_payer(&mut self, payer: ParticipantId) {
        self.payer = payer;
    }

    /// Sets the total and redistributes it.
    ///
    /// Equal split: reallocated equally. Custom split: the first participant
    /// absorbs the change.
    pub fn set_total(&mut self, total: Money) -> Result<(), DraftError> {
        if total.is_negative() {
            return Err(DraftError::InvalidAmount(total));
        }
        self.total = total;
        self.normalize()
    }

    /// Selects or deselects a participant.
    ///
    /// A newly selected participant is appended; in custom split mode it
    /// starts at zero.
    pub fn toggle_participant(&mut self, participant_id: ParticipantId) -> Result<(), DraftError> {
        if let Some(pos) = self
            .allocations
            .iter()
            .position(|a| a.participant_id == participant_id)
        {
            self.allocations.remove(pos);
        } else {
            self.allocations
                .push(Allocation::new(participant_id, Money::ZERO));
        }
        self.normalize()
    }

    /// Switches between equal and custom split.
    ///
    /// Turning custom split off reallocates the total equally.
    pub fn set_custom_split(&mut self, custom_split: bool) -> Result<(), DraftError> {
        self.custom_split = custom_split;
        self.normalize()
    }

    /// Sets one participant's amount in custom split mode.
    ///
    /// The first participant then absorbs the difference to the total, so
    /// editing the first participant's own amount is undone immediately.
    pub fn set_participant_amount(
        &mut self,
        participant_id: &ParticipantId,
        amount: Money,
    ) -> Result<(), DraftError> {
        if !self.custom_split {
            return Err(DraftError::NotCustomSplit);
        }
        if amount.is_negative() {
            return Err(DraftError::NegativeShare(participant_id.clone()));
        }
        let allocation = self
            .allocations
            .iter_mut()
            .find(|a| &a.participant_id == participant_id)
            .ok_or_else(|| DraftError::UnknownParticipant(participant_id.clone()))?;
        allocation.amount = amount;
        self.normalize()
    }

    /// Validates the form and produces the expense to record.
    pub fn submit(&self) -> Result<NewExpense, DraftError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(DraftError::MissingDescription);
        }
        if !self.total.is_positive() {
            return Err(DraftError::InvalidAmount(self.total));
        }
        if self.allocations.is_empty() {
            return Err(DraftError::NoParticipants);
        }
        if let Some(negative) = self.allocations.iter().find(|a| a.amount.is_negative()) {
            return Err(DraftError::NegativeShare(negative.participant_id.clone()));
        }

        let splits = SplitAllocator::amounts_to_percentages(&self.allocations, self.total)?;

        Ok(NewExpense {
            description: description.to_string(),
            amount: self.total,
            payer: self.payer.clone(),
            participants: self
                .allocations
                .iter()
                .map(|a| a.participant_id.clone())
                .collect(),
            splits,
        })
    }

    fn normalize(&mut self) -> Result<(), DraftError> {
        let current = std::mem::take(&mut self.allocations);
        self.allocations = if self.custom_split {
            SplitAllocator::rebalance_on_total_change(self.total, current)?
        } else {
            let ids: Vec<ParticipantId> = current.into_iter().map(|a| a.participant_id).collect();
            SplitAllocator::allocate_equal(self.total, &ids)?
        };
        Ok(())
    }
}
