//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod snippet_repository;

#[cfg(test)]
pub use snippet_repository::MockSnippetRepository;
pub use snippet_repository::{LATEST_SNIPPETS_LIMIT, SnippetRepository, SnippetRepositoryError};
