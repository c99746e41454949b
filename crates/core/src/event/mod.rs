//! Events: the roster and expense list that a ledger is computed from.

pub mod aggregate;
pub mod error;

pub use aggregate::Event;
pub use error::EventError;
