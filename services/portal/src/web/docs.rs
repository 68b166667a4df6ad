//! services/portal/src/web/docs.rs
//!
//! The master definition for the OpenAPI specification of the form routes.

use utoipa::OpenApi;

use crate::web::{auth, pages};

#[derive(OpenApi)]
#[openapi(
    paths(
        pages::landing_handler,
        pages::dashboard_handler,
        auth::login_form_handler,
        auth::signup_form_handler,
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        pages::profile_handler,
        pages::update_profile_handler,
        pages::courses_handler,
        pages::mission_handler,
    ),
    components(
        schemas(auth::SignupForm, auth::LoginForm, pages::ProfileForm)
    ),
    tags(
        (name = "GyanGanga", description = "Server-rendered pages and form endpoints of the learning portal.")
    )
)]
pub struct ApiDoc;
