//! Error type shared by the loaders, the profile store and the chat client
//!
//! The numeric engines never fail: bad inputs are clamped and an unsolvable
//! IRR is reported as `None`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the I/O-facing parts of the crate
#[derive(Debug, Error)]
pub enum InvestedError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },

    #[error("invalid {field} for '{record}': {value}")]
    InvalidValue {
        record: String,
        field: &'static str,
        value: f64,
    },

    #[error("profile store at {path} is unreadable: {reason}")]
    ProfileStore { path: PathBuf, reason: String },

    #[error("missing chat API key (set GEMINI_API_KEY, GOOGLE_API_KEY or GOOGLE_GENERATIVE_AI_API_KEY)")]
    MissingApiKey,

    #[error("chat request timed out after {0} ms")]
    ChatTimeout(u64),

    #[error("chat request failed with HTTP {status}: {message}")]
    ChatStatus { status: u16, message: String },

    #[error("chat transport error: {0}")]
    ChatTransport(String),
}

impl InvestedError {
    pub(crate) fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownValue {
            kind,
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InvestedError>;
