//! Snippetbox entry-point: loads settings, connects to PostgreSQL, parses
//! templates and serves HTTP.

mod server;

use std::io;

use actix_web::rt::task;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use snippetbox::inbound::http::TemplateCache;
use snippetbox::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use snippetbox::settings::AppSettings;

use server::{ServerConfig, create_server};

/// Application bootstrap.
///
/// Every startup failure (bad settings, unreachable database, failed
/// migration, broken templates, bind error) ends the process with an error
/// before any request is served.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| io::Error::other(format!("settings: {e}")))?;
    let bind_addr = settings.addr().map_err(io::Error::other)?;

    let pool = DbPool::new(PoolConfig::new(settings.dsn()))
        .await
        .map_err(io::Error::other)?;

    if settings.migrate {
        let dsn = settings.dsn().to_owned();
        let applied = task::spawn_blocking(move || run_pending_migrations(&dsn))
            .await
            .map_err(|e| io::Error::other(format!("migration task failed: {e}")))?
            .map_err(io::Error::other)?;
        info!(applied, "migrations complete");
    }

    let templates_dir = settings.templates_dir();
    let templates = TemplateCache::new(&templates_dir).map_err(io::Error::other)?;
    info!(dir = %templates_dir.display(), pages = templates.pages().count(), "templates parsed");

    let config = ServerConfig::new(bind_addr, pool, templates, settings.static_dir());
    create_server(config)?.await
}
