//! services/portal/src/web/routes.rs
//!
//! HTTP routes configuration.

use axum::{
    handler::HandlerWithoutStateExt,
    middleware as axum_middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::web::{
    auth::{
        login_form_handler, login_handler, logout_handler, signup_form_handler, signup_handler,
    },
    docs::ApiDoc,
    middleware::require_auth,
    pages::{
        courses_handler, dashboard_handler, health_handler, landing_handler, mission_handler,
        not_found_handler, profile_handler, update_profile_handler,
    },
    state::AppState,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(landing_handler))
        .route("/login", get(login_form_handler).post(login_handler))
        .route("/signup", get(signup_form_handler).post(signup_handler))
        .route("/logout", get(logout_handler))
        .route("/health", get(health_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/dashboard", get(dashboard_handler))
        .route("/profile", get(profile_handler).post(update_profile_handler))
        .route("/courses/{category}", get(courses_handler))
        .route("/mission/{id}", get(mission_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    // Anything else is looked up in the static directory, then 404s.
    let static_files =
        ServeDir::new(&state.config.static_dir).fallback(not_found_handler.into_service());

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
