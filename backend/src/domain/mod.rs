//! Domain primitives and ports.
//!
//! Purpose: Define the snippet model, form validation, and the persistence
//! port the HTTP adapter depends on. Nothing in here knows about actix or
//! Diesel.
//!
//! Public surface:
//! - Snippet, SnippetId, NewSnippet: the stored entity and its insert input.
//! - FormErrors, SnippetForm: validation results and the create form.
//! - Error, ErrorCode: transport-agnostic failures.
//! - TraceId: request correlation identifier.

pub mod error;
pub mod forms;
pub mod ports;
pub mod snippet;
pub mod trace_id;

pub use self::error::{Error, ErrorCode};
pub use self::forms::{FormErrors, PERMITTED_RETENTION_DAYS, SnippetForm, TITLE_MAX_CHARS};
pub use self::snippet::{NewSnippet, Snippet, SnippetId, SnippetIdError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
