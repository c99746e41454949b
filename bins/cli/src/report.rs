//! Rendering a summary for people.

use std::fmt::Write;

use serde::Serialize;
use splitpot_core::event::Event;
use splitpot_core::ledger::Summary;
use splitpot_shared::types::{Currency, Money, ParticipantId};
use splitpot_shared::{AppError, AppResult};

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Plain text lines.
    #[default]
    Text,
    /// The summary as JSON.
    Json,
}

/// JSON envelope: the summary plus the currency it is expressed in.
#[derive(Serialize)]
struct JsonReport<'a> {
    event: &'a str,
    currency: Currency,
    #[serde(flatten)]
    summary: &'a Summary,
}

/// Renders `summary` for `event` in the requested format.
pub fn render(
    event: &Event,
    summary: &Summary,
    currency: Currency,
    format: Format,
) -> AppResult<String> {
    match format {
        Format::Text => render_text(event, summary, currency)
            .map_err(|err| AppError::Internal(format!("cannot render report: {err}"))),
        Format::Json => serde_json::to_string_pretty(&JsonReport {
            event: &event.name,
            currency,
            summary,
        })
        .map_err(|err| AppError::Internal(format!("cannot encode report: {err}"))),
    }
}

fn render_text(
    event: &Event,
    summary: &Summary,
    currency: Currency,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{}", event.name)?;
    writeln!(out)?;
    writeln!(out, "Balances:")?;
    for balance in &summary.balances {
        writeln!(
            out,
            "  {}: {} {currency}",
            name_of(event, &balance.participant_id),
            signed(balance.net)
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Transfers:")?;
    if summary.transfers.is_empty() {
        writeln!(out, "  Nobody owes anything.")?;
    }
    for transfer in &summary.transfers {
        writeln!(
            out,
            "  {} -> {}: {} {currency}",
            name_of(event, &transfer.from),
            name_of(event, &transfer.to),
            transfer.amount
        )?;
    }
    Ok(out)
}

fn name_of<'a>(event: &'a Event, id: &'a ParticipantId) -> &'a str {
    event
        .participant(id)
        .map_or_else(|| id.as_str(), |p| p.name.as_str())
}

fn signed(amount: Money) -> String {
    if amount.is_positive() {
        format!("+{amount}")
    } else {
        amount.to_string()
    }
}
