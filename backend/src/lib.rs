//! Snippetbox library modules.
//!
//! A small web application for pasting text snippets that expire after a
//! chosen number of days. The crate follows a hexagonal layout: [`domain`]
//! holds the model and ports, [`outbound`] the PostgreSQL adapter, and
//! [`inbound`] the HTML-over-HTTP adapter with its [`middleware`].

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use middleware::Trace;
