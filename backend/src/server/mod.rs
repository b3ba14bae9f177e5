//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{HttpServer, web};
use mockable::DefaultClock;
use tracing::info;

use snippetbox::inbound::http::{HttpState, build_app};
use snippetbox::outbound::persistence::DieselSnippetRepository;

/// Construct an Actix HTTP server backed by the PostgreSQL snippet store.
///
/// # Returns
/// A [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let bind_addr = config.bind_addr();
    let ServerConfig {
        bind_addr: _,
        db_pool,
        templates,
        static_dir,
    } = config;

    let clock = Arc::new(DefaultClock);
    let snippets = Arc::new(DieselSnippetRepository::new(db_pool, clock.clone()));
    let http_state = web::Data::new(HttpState::new(snippets, templates, clock));

    let server = HttpServer::new(move || build_app(http_state.clone(), static_dir.clone()))
        .bind(bind_addr)?
        .run();

    info!(%bind_addr, "starting server");
    Ok(server)
}
