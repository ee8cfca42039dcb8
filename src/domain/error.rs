//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, PartialEq)]
pub enum DomainError {
    #[error("no category at position {index} (level has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("not a number: {0:?}")]
    InvalidAllocation(String),
}
