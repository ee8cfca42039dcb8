//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod allocation;
pub mod entities;
pub mod error;
pub mod redistribution;

pub use allocation::SiblingGroup;
pub use entities::*;
pub use error::DomainError;
pub use redistribution::{Adjustment, Normalization};
