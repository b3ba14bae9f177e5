//! Security headers added to every response.

use actix_web::middleware::DefaultHeaders;

/// `X-XSS-Protection` value asking legacy browsers to block reflected XSS.
pub const XSS_PROTECTION: &str = "1; mode=block";
/// `X-Frame-Options` value forbidding framing by any origin.
pub const FRAME_OPTIONS: &str = "deny";

/// Middleware setting `X-XSS-Protection` and `X-Frame-Options`.
///
/// Headers a handler already set are left alone.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use snippetbox::middleware::secure_headers;
///
/// let app = App::new().wrap(secure_headers());
/// ```
pub fn secure_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-XSS-Protection", XSS_PROTECTION))
        .add(("X-Frame-Options", FRAME_OPTIONS))
}
