//! Panic recovery middleware.
//!
//! A panic anywhere below this middleware, either while the inner service
//! builds its future or while that future runs, becomes a logged
//! `500 Internal Server Error` with `Connection: close` and the same
//! security headers as every other response. The worker keeps serving other
//! requests.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::task::{Context, Poll};

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::{StatusCode, header};
use actix_web::{Error, HttpRequest, HttpResponse};
use futures_util::FutureExt;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::error;

use crate::inbound::http::error::status_text_response;
use crate::middleware::secure_headers::{FRAME_OPTIONS, XSS_PROTECTION};

/// Middleware turning handler panics into `500` responses.
///
/// Wrap it last so it sits outermost and also covers the other middleware.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use snippetbox::middleware::{Recover, Trace};
///
/// let app = App::new().wrap(Trace).wrap(Recover);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Recover;

impl<S, B> Transform<S, ServiceRequest> for Recover
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = RecoverMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RecoverMiddleware { service }))
    }
}

/// Service wrapper produced by [`Recover`].
pub struct RecoverMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RecoverMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request = req.request().clone();
        let fut = match panic::catch_unwind(AssertUnwindSafe(|| self.service.call(req))) {
            Ok(fut) => fut,
            Err(payload) => {
                return Box::pin(ready(Ok(panic_response(request, payload.as_ref()))));
            }
        };

        Box::pin(async move {
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(result) => result.map(ServiceResponse::map_into_boxed_body),
                Err(payload) => Ok(panic_response(request, payload.as_ref())),
            }
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

fn panic_response(request: HttpRequest, payload: &(dyn Any + Send)) -> ServiceResponse<BoxBody> {
    error!(
        panic = panic_message(payload),
        method = %request.method(),
        path = request.path(),
        "handler panicked"
    );
    let mut builder = HttpResponse::InternalServerError();
    builder
        .force_close()
        .insert_header((header::X_XSS_PROTECTION, XSS_PROTECTION))
        .insert_header((header::X_FRAME_OPTIONS, FRAME_OPTIONS));
    ServiceResponse::new(
        request,
        status_text_response(builder, StatusCode::INTERNAL_SERVER_ERROR),
    )
}
