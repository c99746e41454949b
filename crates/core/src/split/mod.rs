//! Splitting an expense total between participants.
//!
//! - Exact-sum allocation of amounts and percentages
//! - Expense form state driving the allocator
//! - Error types for allocation

pub mod allocation;
pub mod draft;
pub mod error;

#[cfg(test)]
mod props;

pub use allocation::{Allocation, SplitAllocator};
pub use draft::{DraftError, ExpenseDraft};
pub use error::SplitError;
