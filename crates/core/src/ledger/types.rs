//! Ledger domain types: participants, expenses and their percentage splits.
//!
//! The serde shape follows the event records written by the web client, so a
//! stored event can be fed to the engine as-is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use splitpot_shared::types::{ExpenseId, Money, ParticipantId, Percentage};

/// A member of an event. Identity is the id; names may collide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique identifier within the event.
    pub id: ParticipantId,
    /// Display name.
    pub name: String,
}

impl Participant {
    /// Creates a participant with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::new(),
            name: name.into(),
        }
    }
}

/// A percentage share of one expense assigned to one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    /// The participant carrying this share.
    pub user_id: ParticipantId,
    /// Share of the expense amount.
    pub percentage: Percentage,
}

impl Split {
    /// Creates a split.
    #[must_use]
    pub fn new(user_id: ParticipantId, percentage: Percentage) -> Self {
        Self {
            user_id,
            percentage,
        }
    }
}

/// Expense fields supplied by a caller, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpense {
    /// What the money was spent on.
    pub description: String,
    /// Total amount paid.
    pub amount: Money,
    /// Who paid.
    pub payer: ParticipantId,
    /// Who shares the expense, in form order. Empty means everyone.
    #[serde(default)]
    pub participants: Vec<ParticipantId>,
    /// Percentage shares per participant.
    #[serde(default)]
    pub splits: Vec<Split>,
}

/// A recorded expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ExpenseRecord")]
pub struct Expense {
    /// Unique identifier.
    pub id: ExpenseId,
    /// What the money was spent on.
    pub description: String,
    /// Total amount paid.
    pub amount: Money,
    /// Who paid.
    pub payer: ParticipantId,
    /// Who shares the expense, in form order.
    pub participants: Vec<ParticipantId>,
    /// Percentage shares per participant.
    pub splits: Vec<Split>,
    /// When the expense was recorded.
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Builds an expense from caller input with the given identity.
    #[must_use]
    pub fn from_input(id: ExpenseId, input: NewExpense, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            description: input.description,
            amount: input.amount,
            payer: input.payer,
            participants: input.participants,
            splits: input.splits,
            created_at,
        }
    }

    /// Returns true if the participant paid for or shares this expense.
    #[must_use]
    pub fn involves(&self, participant_id: &ParticipantId) -> bool {
        &self.payer == participant_id || self.participants.contains(participant_id)
    }

    /// Sum of all split percentages.
    #[must_use]
    pub fn percentage_total(&self) -> Percentage {
        self.splits.iter().map(|s| s.percentage).sum()
    }
}

/// Wire shape of an expense. Older records carry the payer as `paid_by`,
/// newer ones carry both fields.
#[derive(Deserialize)]
struct ExpenseRecord {
    id: ExpenseId,
    #[serde(default)]
    description: String,
    amount: Money,
    payer: Option<ParticipantId>,
    paid_by: Option<ParticipantId>,
    #[serde(default)]
    participants: Vec<ParticipantId>,
    #[serde(default)]
    splits: Option<Vec<Split>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ExpenseRecord> for Expense {
    type Error = String;

    fn try_from(record: ExpenseRecord) -> Result<Self, Self::Error> {
        let payer = record
            .payer
            .or(record.paid_by)
            .ok_or_else(|| format!("expense {} has no payer", record.id))?;

        Ok(Self {
            id: record.id,
            description: record.description,
            amount: record.amount,
            payer,
            participants: record.participants,
            splits: record.splits.unwrap_or_default(),
            created_at: record.created_at,
        })
    }
}
