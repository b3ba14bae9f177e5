//! Port for snippet persistence.

use async_trait::async_trait;

use crate::domain::{NewSnippet, Snippet, SnippetId};

use super::define_port_error;

/// Maximum number of snippets returned by [`SnippetRepository::latest`].
pub const LATEST_SNIPPETS_LIMIT: usize = 10;

define_port_error! {
    /// Errors raised by snippet repository adapters.
    pub enum SnippetRepositoryError {
        /// No live snippet matches the lookup.
        NoRecord => "no matching snippet found",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "snippet repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "snippet repository query failed: {message}",
    }
}

/// Port for writing snippets and reading live snippets back.
///
/// Implementations perform one round trip per call and release whatever they
/// acquired from the store before returning, on success and failure alike.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnippetRepository: Send + Sync {
    /// Persist a snippet and return its store-assigned identifier.
    ///
    /// `created` is the current UTC time and `expires` is `created` plus the
    /// requested retention.
    async fn insert(&self, snippet: &NewSnippet) -> Result<SnippetId, SnippetRepositoryError>;

    /// Fetch a live snippet by id.
    ///
    /// Returns [`SnippetRepositoryError::NoRecord`] when the id is unknown or
    /// the snippet has expired.
    async fn get(&self, id: SnippetId) -> Result<Snippet, SnippetRepositoryError>;

    /// Up to [`LATEST_SNIPPETS_LIMIT`] live snippets, newest first.
    async fn latest(&self) -> Result<Vec<Snippet>, SnippetRepositoryError>;
}
