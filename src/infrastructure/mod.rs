//! Infrastructure layer: collaborator implementations and DI container
//!
//! This layer implements the boundary traits and wires up the controller.

pub mod di;
pub mod error;
pub mod http;
pub mod traits;

pub use error::{ApiError, ApiResult, InfraError, InfraResult};
