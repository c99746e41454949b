//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced participant, expense, or file does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Business rule violation.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Event snapshot could not be read or decoded.
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the process exit code for this error (sysexits.h values).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::BusinessRule(_) | Self::Snapshot(_) => 65,
            Self::NotFound(_) => 66,
            Self::Internal(_) => 70,
            Self::Config(_) => 78,
        }
    }

    /// Returns the machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Snapshot(_) => "SNAPSHOT_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Snapshot(err.to_string())
    }
}
