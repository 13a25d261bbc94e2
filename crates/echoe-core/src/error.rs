//! Error types for echoe-core

use thiserror::Error;

/// Result type alias using echoe-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in echoe-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid user input, rejected before any remote call
    #[error("{0}")]
    Validation(String),

    /// Image payload could not be decoded
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Remote store rejected or failed the call
    #[error("{0}")]
    Remote(String),

    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication provider error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required collaborator is not available (yet)
    #[error("Not ready: {0}")]
    NotReady(String),
}

/// Coarse error taxonomy surfaced to presentation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Decode,
    Remote,
    Precondition,
    Io,
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    pub fn not_ready(message: impl Into<String>) -> Self {
        Self::NotReady(message.into())
    }

    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Decode(_) => ErrorCategory::Decode,
            Self::Remote(_) | Self::Http(_) | Self::Auth(_) | Self::Serialization(_) => {
                ErrorCategory::Remote
            }
            Self::NotReady(_) => ErrorCategory::Precondition,
            Self::Io(_) => ErrorCategory::Io,
        }
    }
}
