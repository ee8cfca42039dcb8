//! Error conversion helpers for collaborator calls
//!
//! Provides extension traits for cleaner error handling with request context.

use crate::application::{ApplicationError, ApplicationResult};
use crate::infrastructure::ApiResult;

/// Extension trait for converting `ApiResult` to `ApplicationResult` with context.
pub trait ApiResultExt<T> {
    /// Add context to a collaborator error.
    ///
    /// # Example
    /// ```ignore
    /// tree.children(parent, mode)
    ///     .with_context(format!("load children of {parent}"))?;
    /// ```
    fn with_context(self, context: impl Into<String>) -> ApplicationResult<T>;
}

impl<T> ApiResultExt<T> for ApiResult<T> {
    fn with_context(self, context: impl Into<String>) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::Api {
            context: context.into(),
            source,
        })
    }
}
