//! Common types used across the workspace.

pub mod id;
pub mod money;
pub mod percentage;

pub use id::*;
pub use money::{AmountError, Currency, Money};
pub use percentage::Percentage;
