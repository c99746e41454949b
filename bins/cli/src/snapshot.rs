//! Loading event snapshots from disk.

use std::path::Path;

use splitpot_core::event::Event;
use splitpot_core::ledger::validate_expense;
use splitpot_shared::{AppError, AppResult};
use tracing::{info, warn};

/// Reads and decodes an event snapshot file.
pub fn load(path: &Path) -> AppResult<Event> {
    let raw = std::fs::read_to_string(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => AppError::NotFound(path.display().to_string()),
        _ => AppError::Snapshot(format!("{}: {err}", path.display())),
    })?;
    let event = parse(&raw)?;
    info!(
        event_id = %event.id,
        participants = event.participants.len(),
        expenses = event.expenses.len(),
        "snapshot loaded"
    );
    Ok(event)
}

/// Decodes an event snapshot.
pub fn parse(raw: &str) -> AppResult<Event> {
    Ok(serde_json::from_str(raw)?)
}

/// Checks every expense against the roster.
///
/// In strict mode the first invalid expense is an error; otherwise invalid
/// expenses are only logged and the ledger copes with them.
pub fn check(event: &Event, strict: bool) -> AppResult<()> {
    for expense in &event.expenses {
        if let Err(err) = validate_expense(expense, &event.participants) {
            if strict {
                return Err(AppError::Validation(format!("expense {}: {err}", expense.id)));
            }
            warn!(expense_id = %expense.id, code = err.error_code(), error = %err, "invalid expense");
        }
    }
    Ok(())
}
