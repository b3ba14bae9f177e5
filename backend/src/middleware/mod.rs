//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns:
//! panic recovery, request logging with trace identifiers, and security
//! headers. Applied in that order from outermost to innermost.

pub mod recover;
pub mod secure_headers;
pub mod trace;

pub use recover::Recover;
pub use secure_headers::secure_headers;
pub use trace::Trace;
