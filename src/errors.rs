//! Typed error hierarchy for the land-registration client.
//!
//! Three enums cover the three places things go wrong:
//! - `ApiError`: everything a backend call can return, as a closed set
//! - `FormError`: dynamic input events that do not fit the target form
//! - `StorageError`: reading or writing the persisted session

use thiserror::Error;

use crate::i18n::{Locale, Message};

/// Errors from a call to the land-registration backend.
///
/// The HTTP layer maps every failure into one of these variants so callers
/// never inspect response bodies themselves.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected locally before any request was sent.
    #[error("Validation failed for {fields} field(s)")]
    Validation { fields: usize },

    /// Non-2xx response. `message` is the body's `message` field, if any.
    #[error("Server returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server { status: u16, message: Option<String> },

    /// The request never produced a response (DNS, connect, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// Anything else, such as a body that does not decode.
    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl ApiError {
    /// The message shown to the user for this error.
    ///
    /// Server messages are surfaced verbatim; every other shape falls back to
    /// a generic localized string.
    pub fn user_message(&self, locale: Locale) -> String {
        match self {
            ApiError::Server {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            ApiError::Server { .. } => Message::ServerError.text(locale),
            ApiError::Validation { .. } | ApiError::Network(_) | ApiError::Unknown(_) => {
                Message::UnknownError.text(locale)
            }
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Server { status: 401, .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            ApiError::Network(err.to_string())
        } else {
            ApiError::Unknown(err.to_string())
        }
    }
}

/// Errors from applying a dynamic input event to a typed form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Field '{field}' expects {expected} input")]
    WrongInputKind {
        field: String,
        expected: &'static str,
    },

    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidChoice { field: String, value: String },
}

/// Errors from the durable session storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read session file at {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write session file at {path}: {source}")]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session file at {path} is not valid JSON: {source}")]
    Corrupt {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize session: {0}")]
    Serialize(#[source] serde_json::Error),
}
