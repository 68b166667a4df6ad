//! services/portal/src/web/respond.rs
//!
//! Small response builders shared by the handlers.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use gyanganga_core::view::View;
use tracing::error;

use crate::web::state::AppState;

/// A `302 Found` redirect.
pub fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// A `302 Found` redirect that also sets (or clears) a cookie.
pub fn redirect_with_cookie(location: &str, cookie: Option<String>) -> Response {
    match cookie {
        Some(cookie) => (
            StatusCode::FOUND,
            [
                (header::LOCATION, location.to_string()),
                (header::SET_COOKIE, cookie),
            ],
        )
            .into_response(),
        None => redirect(location),
    }
}

pub fn plain_text(status: StatusCode, body: &'static str) -> Response {
    (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}

/// Renders a view to HTML.
pub fn render(state: &AppState, view: View) -> Response {
    match state.views.render(&view) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render view '{}': {:?}", view.name(), e);
            plain_text(StatusCode::INTERNAL_SERVER_ERROR, "Error rendering page.")
        }
    }
}
