//! HTTP inbound adapter serving the snippet pages.

pub mod error;
pub mod router;
pub mod snippets;
pub mod state;
pub mod templates;

pub use error::ApiResult;
pub use router::{build_app, configure};
pub use state::HttpState;
pub use templates::{TemplateCache, TemplateData, TemplateError};
