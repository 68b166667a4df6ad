//! services/portal/src/web/auth.rs
//!
//! Authentication endpoints for user signup, login, and logout.

use axum::{
    extract::State,
    http::HeaderMap,
    response::Response,
    Form,
};
use gyanganga_core::session::Flash;
use gyanganga_core::view::View;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::credentials::{LoginError, NewAccount, SignupError};
use crate::web::cookie::{clear_session_cookie, session_cookie, session_token};
use crate::web::respond::{redirect, redirect_with_cookie, render};
use crate::web::state::AppState;

pub const SIGNUP_SUCCESS: &str = "Registration successful! You can now log in.";
pub const SIGNUP_FAILED: &str = "An error occurred. The username or email may be taken.";
pub const LOGIN_FAILED: &str = "Invalid username or password.";

//=========================================================================================
// Form Types
//=========================================================================================

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct SignupForm {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

impl From<SignupForm> for NewAccount {
    fn from(form: SignupForm) -> Self {
        Self {
            full_name: form.full_name,
            username: form.username,
            email: form.email,
            password: form.password,
            role: form.role,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /login - Show the login form with any pending notices
#[utoipa::path(
    get,
    path = "/login",
    responses((status = 200, description = "Login form", body = String, content_type = "text/html"))
)]
pub async fn login_form_handler(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let flashes = take_flashes(&state, &headers).await;
    render(&state, View::Login { flashes })
}

/// GET /signup - Show the registration form with any pending notices
#[utoipa::path(
    get,
    path = "/signup",
    responses((status = 200, description = "Registration form", body = String, content_type = "text/html"))
)]
pub async fn signup_form_handler(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let flashes = take_flashes(&state, &headers).await;
    render(&state, View::Signup { flashes })
}

/// POST /signup - Create a new user account
#[utoipa::path(
    post,
    path = "/signup",
    request_body(content = SignupForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Redirect to /login on success, back to /signup on failure")
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<SignupForm>,
) -> Response {
    match state.credentials.create_user(form.into()).await {
        Ok(user) => {
            info!("New user created: id={} username={}", user.id, user.username);
            flash_and_redirect(&state, &headers, Flash::success(SIGNUP_SUCCESS), "/login").await
        }
        Err(e) => {
            let message = match &e {
                SignupError::Invalid(reason) => {
                    warn!("Rejected signup: {}", reason);
                    format!("Please check your details: {}.", reason)
                }
                SignupError::Conflict => {
                    warn!("Rejected signup: {}", e);
                    SIGNUP_FAILED.to_string()
                }
                SignupError::Hash(_) | SignupError::Store(_) => {
                    error!("Error during signup: {:?}", e);
                    SIGNUP_FAILED.to_string()
                }
            };
            flash_and_redirect(&state, &headers, Flash::error(message), "/signup").await
        }
    }
}

/// POST /login - Login with an existing account
#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Redirect to / with a session cookie, or back to /login")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let previous = session_token(&headers);

    // 1. Verify the credentials
    let user = match state.credentials.verify(&form.username, &form.password).await {
        Ok(user) => user,
        Err(e) => {
            match &e {
                LoginError::UnknownUser | LoginError::PasswordMismatch => {
                    warn!("Failed login for '{}': {}", form.username.trim(), e)
                }
                LoginError::Store(_) => error!("Error during login: {:?}", e),
            }
            return flash_and_redirect(&state, &headers, Flash::error(LOGIN_FAILED), "/login")
                .await;
        }
    };

    // 2. Start a fresh session and hand its cookie back
    match state.sessions.login(previous, &user).await {
        Ok(session) => {
            info!("User {} logged in", user.id);
            let cookie = session_cookie(
                &session.token,
                state.sessions.ttl(),
                state.config.cookie_secure,
            );
            redirect_with_cookie("/", Some(cookie))
        }
        Err(e) => {
            error!("Failed to create session: {:?}", e);
            flash_and_redirect(&state, &headers, Flash::error(LOGIN_FAILED), "/login").await
        }
    }
}

/// GET /logout - End the session
#[utoipa::path(
    get,
    path = "/logout",
    responses((status = 302, description = "Redirect to / with the session cookie cleared"))
)]
pub async fn logout_handler(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let Some(token) = session_token(&headers) else {
        return redirect("/");
    };

    if let Err(e) = state.sessions.logout(token).await {
        error!("Failed to delete session: {:?}", e);
    }
    redirect_with_cookie("/", Some(clear_session_cookie(state.config.cookie_secure)))
}

//=========================================================================================
// Helpers
//=========================================================================================

/// Consumes the caller's pending notices. A store failure yields no notices.
pub(crate) async fn take_flashes(state: &AppState, headers: &HeaderMap) -> Vec<Flash> {
    state
        .sessions
        .take_flashes(session_token(headers))
        .await
        .unwrap_or_else(|e| {
            error!("Failed to read notices: {:?}", e);
            Vec::new()
        })
}

/// Queues a notice and redirects, setting a cookie if a session had to be created.
pub(crate) async fn flash_and_redirect(
    state: &AppState,
    headers: &HeaderMap,
    flash: Flash,
    location: &str,
) -> Response {
    match state.sessions.flash(session_token(headers), flash).await {
        Ok(created) => {
            let cookie = created.map(|session| {
                session_cookie(&session.token, state.sessions.ttl(), state.config.cookie_secure)
            });
            redirect_with_cookie(location, cookie)
        }
        Err(e) => {
            error!("Failed to store notice: {:?}", e);
            redirect(location)
        }
    }
}
