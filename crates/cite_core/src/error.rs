use serde::{Deserialize, Serialize};
use std::fmt;

/// Codes raised when the corpus as a whole cannot be loaded. Callers treat these as
/// "citations unavailable" and keep generating documents without them.
pub const CORPUS_LOAD_ERROR_CODES: [&str; 3] =
    ["CORPUS_NOT_FOUND", "CORPUS_READ_FAILED", "CORPUS_MALFORMED"];

/// Single structured error shape used by every citation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn is_corpus_load_error(&self) -> bool {
        CORPUS_LOAD_ERROR_CODES.contains(&self.code.as_str())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}
