//! Dial request handlers.
//!
//! GET and HEAD render the current dial, POST mutates it and redirects back
//! to the dial page. Anything else on the dial route is a 405; any other
//! path is a 404.

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::http::page::{render_page, DialView};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::toggle::DialError;

/// Submitted dial form. The field name matches [`FIELD_NAME`](crate::http::page::FIELD_NAME).
#[derive(Debug, Deserialize)]
pub struct DialForm {
    #[serde(rename = "smp")]
    pub value: String,
}

/// GET (and HEAD, body stripped by axum): render the dial page.
pub async fn show_dial(State(state): State<AppState>, method: Method) -> Response {
    tracing::debug!(method = %method, "Handling read request");

    match state.toggle.current_value() {
        Ok(value) => {
            let view = DialView::new(value, state.toggle.recency(), &state.uri);
            Html(render_page(&view)).into_response()
        }
        Err(e) => dial_failure(&state, e),
    }
}

/// POST: set the dial if it differs, then redirect to the dial page.
pub async fn update_dial(State(state): State<AppState>, Form(form): Form<DialForm>) -> Response {
    tracing::info!(value = %form.value, "Received value");

    match state.toggle.set_if_changed(&form.value) {
        Ok(changed) => {
            tracing::debug!(changed, "Redirecting to dial page");
            Redirect::to(&state.uri).into_response()
        }
        Err(e) => dial_failure(&state, e),
    }
}

/// Any other method on the dial route.
pub async fn method_not_allowed(method: Method) -> Response {
    let message = format!(
        "{} HTTP method {} not allowed",
        StatusCode::METHOD_NOT_ALLOWED.as_u16(),
        method
    );
    tracing::warn!("{}", message);
    (StatusCode::METHOD_NOT_ALLOWED, message).into_response()
}

/// Any path other than the dial route.
pub async fn not_found(uri: Uri) -> Response {
    tracing::warn!(path = %uri.path(), "Request not found");
    (StatusCode::NOT_FOUND, "404 page not found").into_response()
}

fn dial_failure(state: &AppState, err: DialError) -> Response {
    metrics::record_document_error(err.store_error().kind());

    if err.is_fatal() {
        tracing::error!(error = %err, "Settings document is unusable, shutting down");
        state.shutdown.trigger_fatal();
    } else {
        tracing::error!(error = %err, "Dial update failed");
    }

    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
