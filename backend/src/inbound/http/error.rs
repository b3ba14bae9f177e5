//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while handlers return
//! `ApiResult` and let Actix turn failures into plain-text responses. Clients
//! only ever see the standard reason phrase; the detailed message is logged.

use actix_web::http::{Method, StatusCode, header};
use actix_web::{HttpResponse, HttpResponseBuilder, ResponseError};
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Plain-text response whose body is the status reason phrase.
pub fn client_error(status: StatusCode) -> HttpResponse {
    status_text_response(HttpResponse::build(status), status)
}

/// `405 Method Not Allowed` advertising the methods the resource accepts.
pub fn method_not_allowed(allowed: &[Method]) -> HttpResponse {
    let allow = allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let mut builder = HttpResponse::MethodNotAllowed();
    builder.insert_header((header::ALLOW, allow));
    status_text_response(builder, StatusCode::METHOD_NOT_ALLOWED)
}

/// Finish `builder` with the plain-text reason phrase for `status`.
pub(crate) fn status_text_response(
    mut builder: HttpResponseBuilder,
    status: StatusCode,
) -> HttpResponse {
    let reason = status.canonical_reason().unwrap_or("Unknown Status");
    builder
        .content_type("text/plain; charset=utf-8")
        .insert_header((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .body(format!("{reason}\n"))
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let trace_id = self.trace_id().unwrap_or_default();
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(trace_id, error = %self, "request failed");
        } else {
            debug!(trace_id, status = status.as_u16(), error = %self, "client error");
        }

        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        status_text_response(builder, status)
    }
}
