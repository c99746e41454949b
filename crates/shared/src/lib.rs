//! Shared types, errors, and configuration for Splitpot.
//!
//! This crate provides common types used across all other crates:
//! - Fixed-point money and percentage types
//! - Typed IDs for participants, expenses, and events
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
