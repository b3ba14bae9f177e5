//! HTTP server configuration object.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use snippetbox::inbound::http::TemplateCache;
use snippetbox::outbound::persistence::DbPool;

/// Everything [`super::create_server`] needs to start listening.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) templates: Arc<TemplateCache>,
    pub(crate) static_dir: PathBuf,
}

impl ServerConfig {
    /// Construct a server configuration from already-initialised resources.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        db_pool: DbPool,
        templates: TemplateCache,
        static_dir: PathBuf,
    ) -> Self {
        Self {
            bind_addr,
            db_pool,
            templates: Arc::new(templates),
            static_dir,
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
