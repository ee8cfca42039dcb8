//! Infrastructure-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// Failure talking to one of the remote collaborators.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("connection error: {0}")]
    Transport(String),

    #[error("server rejected request with status {status}")]
    Rejected {
        status: u16,
        /// `error` field of the response body, if any
        message: Option<String>,
    },

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Server-provided explanation, if the server sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::Rejected {
                status: status.as_u16(),
                message: None,
            }
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// Result type for collaborator calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Infrastructure errors wrap application errors and add I/O-level concerns.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("http client setup failed: {context}")]
    Http {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("selector failed: {message}")]
    Selector { message: String },
}

impl InfraError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;
