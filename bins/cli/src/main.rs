//! Splitpot CLI
//!
//! Reads an event snapshot and prints who owes whom.

mod report;
mod snapshot;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use splitpot_shared::types::Currency;
use splitpot_shared::{AppConfig, AppError};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use report::Format;

#[derive(Parser, Debug)]
#[command(name = "splitpot")]
#[command(about = "Settle up a shared-expense event snapshot")]
struct Cli {
    /// Path to the event snapshot (JSON).
    snapshot: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Currency printed next to amounts (overrides configuration).
    #[arg(long, env = "SPLITPOT_CURRENCY")]
    currency: Option<Currency>,

    /// Fail on the first expense that does not validate against the roster.
    #[arg(long)]
    strict: bool,
}

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = err.downcast_ref::<AppError>().map_or(1, AppError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = AppConfig::load().map_err(AppError::from)?;
    init_tracing(&config);

    let event = snapshot::load(&cli.snapshot)?;
    snapshot::check(&event, cli.strict)?;

    let summary = event.summary();
    debug!(transfers = summary.transfers.len(), "summary computed");

    let currency = cli.currency.unwrap_or(config.display.currency);
    let output = report::render(&event, &summary, currency, cli.format)?;
    print!("{output}");
    if cli.format == Format::Json {
        println!();
    }

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));

    // Logs go to stderr so the report on stdout stays clean.
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&["splitpot", "event.json"], Format::Text, None, false)]
    #[case(&["splitpot", "event.json", "--format", "json"], Format::Json, None, false)]
    #[case(
        &["splitpot", "event.json", "--currency", "usd", "--strict"],
        Format::Text,
        Some(Currency::Usd),
        true
    )]
    fn test_parse_args(
        #[case] args: &[&str],
        #[case] format: Format,
        #[case] currency: Option<Currency>,
        #[case] strict: bool,
    ) {
        temp_env::with_var_unset("SPLITPOT_CURRENCY", || {
            let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
            assert_eq!(cli.snapshot, PathBuf::from("event.json"));
            assert_eq!(cli.format, format);
            assert_eq!(cli.currency, currency);
            assert_eq!(cli.strict, strict);
        });
    }

    #[test]
    fn test_currency_from_env() {
        temp_env::with_var("SPLITPOT_CURRENCY", Some("CHF"), || {
            let cli = Cli::try_parse_from(["splitpot", "event.json"]).unwrap();
            assert_eq!(cli.currency, Some(Currency::Chf));
        });
    }

    #[test]
    fn test_snapshot_is_required() {
        assert!(Cli::try_parse_from(["splitpot"]).is_err());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["splitpot", "event.json", "--format", "xml"]).is_err());
    }
}
