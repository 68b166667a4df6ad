//! services/portal/src/web/state.rs
//!
//! Defines the application's shared state and the per-request auth extension.

use crate::config::Config;
use crate::credentials::Credentials;
use crate::session::SessionManager;
use chrono::Duration;
use gyanganga_core::ports::{ContentStore, CredentialStore, SessionStore, ViewRenderer};
use gyanganga_core::session::SessionUser;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub credentials: Credentials,
    pub users: Arc<dyn CredentialStore>,
    pub content: Arc<dyn ContentStore>,
    pub sessions: SessionManager,
    pub views: Arc<dyn ViewRenderer>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        users: Arc<dyn CredentialStore>,
        content: Arc<dyn ContentStore>,
        session_store: Arc<dyn SessionStore>,
        views: Arc<dyn ViewRenderer>,
    ) -> Self {
        let sessions = SessionManager::new(session_store, Duration::hours(config.session_ttl_hours));
        Self {
            config,
            credentials: Credentials::new(users.clone()),
            users,
            content,
            sessions,
            views,
        }
    }
}

//=========================================================================================
// AuthSession (Inserted by the Auth Gate)
//=========================================================================================

/// The authenticated caller, placed in request extensions by `require_auth`.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: SessionUser,
}
