//! Thesaurus Error Types
//!
//! Every failure of the search pipeline is caught at the query controller
//! boundary; this enum decides which of them the user ever hears about.

use thiserror::Error;

/// Search pipeline errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThesaurusError {
    /// The request was superseded by a newer submit.
    #[error("Request cancelled")]
    Cancelled,

    /// The transport gave up waiting for the service.
    #[error("Request timed out")]
    TimedOut,

    #[error("{0}")]
    TransportFailure(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ThesaurusError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        ThesaurusError::MalformedResponse(reason.into())
    }

    pub fn transport(reason: impl Into<String>) -> Self {
        ThesaurusError::TransportFailure(reason.into())
    }

    /// Silent errors are logged at debug and never reach the failure channel.
    pub fn is_silent(&self) -> bool {
        matches!(self, ThesaurusError::Cancelled | ThesaurusError::TimedOut)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ThesaurusError::Cancelled)
    }
}

impl From<reqwest::Error> for ThesaurusError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ThesaurusError::TimedOut
        } else if e.is_decode() {
            ThesaurusError::MalformedResponse(e.to_string())
        } else {
            ThesaurusError::TransportFailure(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ThesaurusError {
    fn from(e: serde_json::Error) -> Self {
        ThesaurusError::MalformedResponse(e.to_string())
    }
}

/// Result type alias for thesaurus operations
pub type Result<T> = std::result::Result<T, ThesaurusError>;
