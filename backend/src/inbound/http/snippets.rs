//! Snippet HTML handlers.
//!
//! ```text
//! ANY /                 Latest live snippets
//! ANY /snippet?id=N     One live snippet
//! POST /snippet/create  Store a snippet and redirect to it
//! ```

use actix_web::http::{Method, StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{debug, info};

use crate::domain::{Error, NewSnippet, SnippetForm, SnippetId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::{client_error, method_not_allowed};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::templates::TemplateData;

/// Page listing the latest snippets.
pub const HOME_PAGE: &str = "home.page.tmpl";
/// Page showing one snippet.
pub const SHOW_PAGE: &str = "show.page.tmpl";
/// Page holding the create form, rendered when a submission is rejected.
pub const CREATE_PAGE: &str = "create.page.tmpl";

/// Largest create-form body accepted, in bytes.
pub const CREATE_FORM_LIMIT: usize = 64 * 1024;

fn render_page(
    state: &HttpState,
    page: &str,
    status: StatusCode,
    data: &TemplateData,
) -> ApiResult<HttpResponse> {
    let html = state
        .templates
        .render(page, data)
        .map_err(|err| Error::internal(err.to_string()))?;
    Ok(HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// Render the ten most recent live snippets.
pub async fn home(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let snippets = state.snippets.latest().await?;
    let data = TemplateData::new(state.clock.utc()).with_snippets(snippets);
    render_page(&state, HOME_PAGE, StatusCode::OK, &data)
}

/// Render one snippet selected by the `id` query parameter.
///
/// A missing, malformed or non-positive id is indistinguishable from an id
/// that matches no live snippet: all answer `404 Not Found`. When `id`
/// repeats, the first occurrence wins.
pub async fn show_snippet(
    req: HttpRequest,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let pairs = web::Query::<Vec<(String, String)>>::from_query(req.query_string())
        .map_err(|err| Error::not_found(format!("unreadable query string: {err}")))?
        .into_inner();
    let id: SnippetId = pairs
        .into_iter()
        .find_map(|(key, value)| (key == "id").then_some(value))
        .unwrap_or_default()
        .parse()
        .map_err(|err| Error::not_found(format!("invalid snippet id: {err}")))?;

    let snippet = state.snippets.get(id).await?;
    let data = TemplateData::new(state.clock.utc()).with_snippet(snippet);
    render_page(&state, SHOW_PAGE, StatusCode::OK, &data)
}

/// Store a snippet and redirect to its page.
///
/// Only `POST` is accepted. A request with an empty body, or a form without
/// any of the known fields, stores the placeholder snippet. A body that is
/// not a readable urlencoded form (wrong media type, over
/// [`CREATE_FORM_LIMIT`], malformed) is answered with the extractor's client
/// error status and nothing is stored. A readable form is validated and, when
/// rejected, the create page is rendered again with
/// `422 Unprocessable Entity`.
pub async fn create_snippet(
    req: HttpRequest,
    state: web::Data<HttpState>,
    form: Result<web::Form<SnippetForm>, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    if req.method() != Method::POST {
        return Ok(method_not_allowed(&[Method::POST]));
    }

    let submitted = match form {
        Ok(form) => Some(form.into_inner()).filter(|form| !form.is_blank()),
        Err(_) if has_empty_body(&req) => None,
        Err(err) => {
            let status = err.as_response_error().status_code();
            debug!(%status, error = %err, "create form rejected");
            return Ok(client_error(status));
        }
    };
    let new_snippet = match submitted {
        None => NewSnippet::placeholder(),
        Some(form) => match form.validate() {
            Ok(snippet) => snippet,
            Err(errors) => {
                let data = TemplateData::new(state.clock.utc()).with_form(&form, &errors);
                return render_page(
                    &state,
                    CREATE_PAGE,
                    StatusCode::UNPROCESSABLE_ENTITY,
                    &data,
                );
            }
        },
    };

    let id = state.snippets.insert(&new_snippet).await?;
    info!(snippet_id = %id, "snippet created");
    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, format!("/snippet?id={id}")))
        .finish())
}

/// True when the request declares no body at all.
fn has_empty_body(req: &HttpRequest) -> bool {
    let headers = req.headers();
    if headers.contains_key(header::TRANSFER_ENCODING) {
        return false;
    }
    headers
        .get(header::CONTENT_LENGTH)
        .is_none_or(|length| length.as_bytes() == b"0")
}

/// Fallback for every path without a route.
pub async fn not_found() -> ApiResult<HttpResponse> {
    Err(Error::not_found("no route matches the request path"))
}

#[cfg(test)]
#[path = "snippets_tests.rs"]
mod tests;
