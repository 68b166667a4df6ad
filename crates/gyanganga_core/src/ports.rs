//! crates/gyanganga_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or templates.

use async_trait::async_trait;

use crate::domain::{
    MissionDetail, MissionSummary, NewUser, ProfileUpdate, Topic, User, UserCredentials, Video,
};
use crate::session::{Flash, Session, SessionUser};
use crate::view::View;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, templates).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Inserts a user. A duplicate username or email is a `PortError::Conflict`.
    async fn create_user(&self, new_user: &NewUser) -> PortResult<User>;

    async fn get_credentials_by_username(
        &self,
        username: &str,
    ) -> PortResult<Option<UserCredentials>>;

    async fn get_user_by_id(&self, user_id: i32) -> PortResult<User>;

    async fn update_profile(&self, user_id: i32, update: &ProfileUpdate) -> PortResult<()>;
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Topics of one category, ordered by grade level then name.
    async fn topics_by_category(&self, category: &str) -> PortResult<Vec<Topic>>;

    async fn get_mission_detail(&self, mission_id: i32) -> PortResult<MissionDetail>;

    /// Videos of one mission, ordered by video order, language, quality.
    async fn videos_for_mission(&self, mission_id: i32) -> PortResult<Vec<Video>>;

    /// All missions of a topic, ordered by mission order.
    async fn missions_for_topic(&self, topic_id: i32) -> PortResult<Vec<MissionSummary>>;
}

/// Storage for browser sessions.
///
/// Lookups treat an expired session as absent and remove it.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: Session) -> PortResult<()>;

    async fn get(&self, token: &str) -> PortResult<Option<Session>>;

    /// Replaces the user snapshot of a live session. Returns `false` if the
    /// session no longer exists.
    async fn set_user(&self, token: &str, user: SessionUser) -> PortResult<bool>;

    /// Appends a notice. Returns `false` if the session no longer exists.
    async fn push_flash(&self, token: &str, flash: Flash) -> PortResult<bool>;

    /// Returns the pending notices and clears them.
    async fn take_flashes(&self, token: &str) -> PortResult<Vec<Flash>>;

    async fn remove(&self, token: &str) -> PortResult<()>;
}

pub trait ViewRenderer: Send + Sync {
    /// Produces a complete HTML document for the view.
    fn render(&self, view: &View) -> PortResult<String>;
}
