//! services/portal/src/web/pages.rs
//!
//! Landing, dashboard, profile and course browsing pages.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension, Form,
};
use gyanganga_core::domain::{select_default_video, CourseProgress, ProfileUpdate};
use gyanganga_core::ports::PortError;
use gyanganga_core::session::Flash;
use gyanganga_core::view::View;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::credentials::is_valid_email;
use crate::web::auth::{flash_and_redirect, take_flashes};
use crate::web::cookie::session_token;
use crate::web::respond::{plain_text, redirect, render};
use crate::web::state::{AppState, AuthSession};

pub const PROFILE_UPDATED: &str = "Profile updated.";
pub const PROFILE_UPDATE_FAILED: &str = "Could not update your profile.";

//=========================================================================================
// Form Types
//=========================================================================================

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileForm {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub school_name: String,
    pub grade: String,
    pub city: String,
}

impl ProfileForm {
    fn into_update(self) -> Result<ProfileUpdate, &'static str> {
        let full_name = self.full_name.trim().to_string();
        let email = self.email.trim().to_string();
        if full_name.is_empty() {
            return Err("Full name cannot be empty.");
        }
        if !is_valid_email(&email) {
            return Err("Please enter a valid email address.");
        }

        Ok(ProfileUpdate {
            full_name,
            email,
            phone_number: optional(self.phone_number),
            school_name: optional(self.school_name),
            grade: optional(self.grade),
            city: optional(self.city),
        })
    }
}

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET / - The home page for members, the landing page for everyone else
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Home or landing page", body = String, content_type = "text/html"))
)]
pub async fn landing_handler(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let session = state
        .sessions
        .load(session_token(&headers))
        .await
        .unwrap_or_else(|e| {
            error!("Failed to load session: {:?}", e);
            None
        });

    match session.and_then(|s| s.user) {
        Some(user) => render(&state, View::Home { user }),
        None => render(&state, View::Landing),
    }
}

/// GET /dashboard - Course progress overview
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = String, content_type = "text/html"),
        (status = 302, description = "Redirect to /login without a session")
    )
)]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthSession>,
) -> Response {
    render(
        &state,
        View::Dashboard {
            user: auth.user,
            progress: CourseProgress::placeholder(),
        },
    )
}

/// GET /profile - Show the caller's profile, read fresh from the database
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Profile page", body = String, content_type = "text/html"),
        (status = 302, description = "Redirect to /login without a session")
    )
)]
pub async fn profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthSession>,
    headers: HeaderMap,
) -> Response {
    let user = match state.users.get_user_by_id(auth.user.id()).await {
        Ok(user) => user,
        Err(e) => {
            error!("Error fetching user for profile: {:?}", e);
            return redirect("/");
        }
    };

    let flashes = take_flashes(&state, &headers).await;
    render(&state, View::Profile { user, flashes })
}

/// POST /profile - Update the caller's profile
#[utoipa::path(
    post,
    path = "/profile",
    request_body(content = ProfileForm, content_type = "application/x-www-form-urlencoded"),
    responses((status = 302, description = "Redirect to /profile"))
)]
pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthSession>,
    headers: HeaderMap,
    Form(form): Form<ProfileForm>,
) -> Response {
    let update = match form.into_update() {
        Ok(update) => update,
        Err(message) => {
            return flash_and_redirect(&state, &headers, Flash::error(message), "/profile").await;
        }
    };

    // 1. Write the authoritative row
    let user_id = auth.user.id();
    if let Err(e) = state.users.update_profile(user_id, &update).await {
        let message = match e {
            PortError::Conflict(_) => {
                warn!("Profile update for user {} rejected: {}", user_id, e);
                "That email is already in use."
            }
            _ => {
                error!("Error updating profile: {:?}", e);
                PROFILE_UPDATE_FAILED
            }
        };
        return flash_and_redirect(&state, &headers, Flash::error(message), "/profile").await;
    }

    // 2. Refresh the cached snapshot so the new name shows up without re-login
    if let Err(e) = state.sessions.resync(&auth.token, auth.user, &update).await {
        error!("Failed to refresh session after profile update: {:?}", e);
    }
    info!("User {} updated their profile", user_id);

    flash_and_redirect(&state, &headers, Flash::success(PROFILE_UPDATED), "/profile").await
}

/// GET /courses/{category} - Topics of one course category
#[utoipa::path(
    get,
    path = "/courses/{category}",
    params(("category" = String, Path, description = "Course category, e.g. maths")),
    responses(
        (status = 200, description = "Topic listing", body = String, content_type = "text/html"),
        (status = 302, description = "Redirect to /login without a session, or to / on error")
    )
)]
pub async fn courses_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthSession>,
    Path(category): Path<String>,
) -> Response {
    match state.content.topics_by_category(&category).await {
        Ok(topics) => render(
            &state,
            View::CourseCategory {
                user: auth.user,
                category,
                topics,
            },
        ),
        Err(e) => {
            error!("Error fetching course topics: {:?}", e);
            redirect("/")
        }
    }
}

//=========================================================================================
// Mission Playback
//=========================================================================================

#[derive(Debug, thiserror::Error)]
pub enum MissionError {
    #[error("Mission not found")]
    NotFound,
    #[error("Failed to load mission: {0}")]
    Store(PortError),
}

impl From<PortError> for MissionError {
    fn from(e: PortError) -> Self {
        match e {
            PortError::NotFound(_) => MissionError::NotFound,
            other => MissionError::Store(other),
        }
    }
}

impl IntoResponse for MissionError {
    fn into_response(self) -> Response {
        match self {
            MissionError::NotFound => plain_text(StatusCode::NOT_FOUND, "Mission not found!"),
            MissionError::Store(e) => {
                error!("Error fetching mission details: {:?}", e);
                plain_text(StatusCode::INTERNAL_SERVER_ERROR, "Error loading mission.")
            }
        }
    }
}

/// GET /mission/{id} - Play a mission's videos
#[utoipa::path(
    get,
    path = "/mission/{id}",
    params(("id" = i32, Path, description = "Mission id")),
    responses(
        (status = 200, description = "Mission player", body = String, content_type = "text/html"),
        (status = 302, description = "Redirect to /login without a session"),
        (status = 404, description = "Mission not found", body = String, content_type = "text/plain"),
        (status = 500, description = "Error loading mission", body = String, content_type = "text/plain")
    )
)]
pub async fn mission_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthSession>,
    Path(raw_id): Path<String>,
) -> Result<Response, MissionError> {
    let mission_id: i32 = raw_id.parse().map_err(|_| MissionError::NotFound)?;

    let mission = state.content.get_mission_detail(mission_id).await?;

    // Missing videos or siblings are a failure, not a 404.
    let videos = state
        .content
        .videos_for_mission(mission_id)
        .await
        .map_err(MissionError::Store)?;
    let topic_missions = state
        .content
        .missions_for_topic(mission.mission.topic_id)
        .await
        .map_err(MissionError::Store)?;

    let current_video = select_default_video(&videos).cloned();

    Ok(render(
        &state,
        View::Mission {
            user: auth.user,
            mission,
            videos,
            current_video,
            topic_missions,
        },
    ))
}

/// GET /health - Liveness probe
pub async fn health_handler() -> &'static str {
    "ok"
}

/// Fallback for unmatched routes
pub async fn not_found_handler() -> Response {
    plain_text(StatusCode::NOT_FOUND, "Page not found")
}
