//! Domain-level error types.
//!
//! These errors are transport agnostic. The HTTP adapter maps them to status
//! codes and response bodies in `inbound::http::error`.

use std::fmt;

use crate::domain::TraceId;
use crate::domain::ports::SnippetRepositoryError;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// The requested resource does not exist or is no longer live.
    NotFound,
    /// An unexpected error occurred inside the application or its store.
    InternalError,
}

/// Application error payload.
///
/// The current [`TraceId`], when one is in scope, is captured at construction
/// so log lines and responses for the same request correlate.
///
/// # Examples
/// ```
/// use snippetbox::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("snippet 4 is gone");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    trace_id: Option<String>,
}

impl Error {
    /// Create a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Detailed message; never shown to clients for internal errors.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Trace identifier captured when the error was built.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl From<SnippetRepositoryError> for Error {
    fn from(err: SnippetRepositoryError) -> Self {
        match err {
            SnippetRepositoryError::NoRecord => Self::not_found(err.to_string()),
            SnippetRepositoryError::Connection { .. } | SnippetRepositoryError::Query { .. } => {
                Self::internal(err.to_string())
            }
        }
    }
}
