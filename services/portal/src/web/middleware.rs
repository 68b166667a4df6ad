//! services/portal/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, error};

use crate::web::cookie::session_token;
use crate::web::respond::redirect;
use crate::web::state::{AppState, AuthSession};

pub const LOGIN_PATH: &str = "/login";

/// Middleware that validates the session cookie and extracts the cached user.
///
/// If valid, inserts an `AuthSession` into request extensions for handlers to use.
/// If missing, expired or anonymous, the handler is skipped and the caller is
/// redirected to the login page.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    // 1. Look the session up by its cookie
    let token = session_token(req.headers()).map(str::to_owned);
    let session = match state.sessions.load(token.as_deref()).await {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to load session: {:?}", e);
            None
        }
    };

    // 2. Only authenticated sessions pass
    let Some(auth) = session.and_then(|s| {
        s.user.map(|user| AuthSession {
            token: s.token,
            user,
        })
    }) else {
        debug!("No authenticated session for {}, redirecting to login", req.uri().path());
        return redirect(LOGIN_PATH);
    };

    // 3. Insert the caller into request extensions and continue to the handler
    req.extensions_mut().insert(auth);
    next.run(req).await
}
