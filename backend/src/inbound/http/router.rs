//! Route table and middleware stack.
//!
//! ```text
//! /                 home
//! /snippet          show_snippet
//! /snippet/create   create_snippet
//! /static/*         files under the static directory
//! anything else     404
//! ```

use std::path::PathBuf;

use actix_files::Files;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::inbound::http::snippets::{
    CREATE_FORM_LIMIT, create_snippet, home, not_found, show_snippet,
};
use crate::inbound::http::state::HttpState;
use crate::middleware::{Recover, Trace, secure_headers};

/// URL prefix for static assets.
pub const STATIC_PREFIX: &str = "/static";

/// Register every route on `cfg`, serving assets from `static_dir`.
pub fn configure(cfg: &mut web::ServiceConfig, static_dir: PathBuf) {
    cfg.service(web::resource("/").to(home))
        .service(web::resource("/snippet").to(show_snippet))
        .service(
            web::resource("/snippet/create")
                .app_data(web::FormConfig::default().limit(CREATE_FORM_LIMIT))
                .to(create_snippet),
        )
        .service(Files::new(STATIC_PREFIX, static_dir))
        .default_service(web::to(not_found));
}

/// Build the application: routes wrapped in panic recovery, request logging
/// and security headers, outermost first.
pub fn build_app(
    state: web::Data<HttpState>,
    static_dir: PathBuf,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .wrap(secure_headers())
        .wrap(Trace)
        .wrap(Recover)
        .configure(|cfg| configure(cfg, static_dir))
}
