//! Application configuration management.

use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Presentation configuration.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON log lines instead of human-readable ones.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

fn default_filter() -> String {
    "splitpot=info".to_string()
}

/// Presentation configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayConfig {
    /// Currency code printed next to amounts.
    #[serde(default)]
    pub currency: Currency,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `SPLITPOT__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SPLITPOT").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
