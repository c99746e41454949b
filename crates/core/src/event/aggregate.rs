//! Event aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use splitpot_shared::types::{EventId, ExpenseId, ParticipantId};
use tracing::info;

use super::error::EventError;
use crate::ledger::{
    Expense, LedgerService, NewExpense, Participant, Summary, validate_expense,
};

/// An event: a roster of participants and the expenses they share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier.
    pub id: EventId,
    /// Event name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the event was created.
    pub created_at: DateTime<Utc>,
    /// Participants, in the order they were added.
    #[serde(default)]
    pub participants: Vec<Participant>,
    /// Expenses, in the order they were recorded.
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl Event {
    /// Creates an empty event.
    pub fn new(name: &str, description: Option<String>) -> Result<Self, EventError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EventError::BlankName);
        }
        Ok(Self {
            id: EventId::new(),
            name: name.to_string(),
            description,
            created_at: Utc::now(),
            participants: Vec::new(),
            expenses: Vec::new(),
        })
    }

    /// Looks up a participant.
    #[must_use]
    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    /// Looks up an expense.
    #[must_use]
    pub fn expense(&self, id: &ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| &e.id == id)
    }

    /// Adds a participant with a fresh id.
    pub fn add_participant(&mut self, name: &str) -> Result<&Participant, EventError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EventError::BlankName);
        }
        self.participants.push(Participant::new(name));
        let index = self.participants.len() - 1;
        Ok(&self.participants[index])
    }

    /// Records an expense.
    ///
    /// An empty participant list means the whole roster shares it.
    pub fn add_expense(&mut self, input: NewExpense) -> Result<&Expense, EventError> {
        let expense = self.prepare(ExpenseId::new(), input, Utc::now())?;
        self.expenses.push(expense);
        let index = self.expenses.len() - 1;
        Ok(&self.expenses[index])
    }

    /// Replaces an expense's fields, keeping its id and creation time.
    pub fn update_expense(
        &mut self,
        id: &ExpenseId,
        input: NewExpense,
    ) -> Result<&Expense, EventError> {
        let index = self
            .expenses
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| EventError::ExpenseNotFound(id.clone()))?;
        let updated = self.prepare(id.clone(), input, self.expenses[index].created_at)?;
        self.expenses[index] = updated;
        Ok(&self.expenses[index])
    }

    /// Removes an expense.
    pub fn delete_expense(&mut self, id: &ExpenseId) -> Result<Expense, EventError> {
        let index = self
            .expenses
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| EventError::ExpenseNotFound(id.clone()))?;
        Ok(self.expenses.remove(index))
    }

    /// Removes a participant together with every expense they paid for or
    /// take part in. Returns the participant and the removed expenses.
    pub fn delete_participant(
        &mut self,
        id: &ParticipantId,
    ) -> Result<(Participant, Vec<Expense>), EventError> {
        let index = self
            .participants
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| EventError::ParticipantNotFound(id.clone()))?;
        let participant = self.participants.remove(index);

        let (removed, kept): (Vec<Expense>, Vec<Expense>) =
            std::mem::take(&mut self.expenses)
                .into_iter()
                .partition(|e| e.involves(id));
        self.expenses = kept;

        info!(
            event_id = %self.id,
            participant_id = %id,
            removed_expenses = removed.len(),
            "participant removed"
        );
        Ok((participant, removed))
    }

    /// Balances and settling transfers for the current state of the event.
    #[must_use]
    pub fn summary(&self) -> Summary {
        LedgerService::summarize(&self.participants, &self.expenses)
    }

    fn prepare(
        &self,
        id: ExpenseId,
        mut input: NewExpense,
        created_at: DateTime<Utc>,
    ) -> Result<Expense, EventError> {
        if input.participants.is_empty() {
            input.participants = self.participants.iter().map(|p| p.id.clone()).collect();
        }
        let expense = Expense::from_input(id, input, created_at);
        validate_expense(&expense, &self.participants)?;
        Ok(expense)
    }
}
