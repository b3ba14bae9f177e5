//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the snippet port and the parsed templates, and remain testable
//! without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::SnippetRepository;
use crate::inbound::http::templates::TemplateCache;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub snippets: Arc<dyn SnippetRepository>,
    pub templates: Arc<TemplateCache>,
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Construct state from the snippet store, templates and clock.
    pub fn new(
        snippets: Arc<dyn SnippetRepository>,
        templates: Arc<TemplateCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            snippets,
            templates,
            clock,
        }
    }
}
