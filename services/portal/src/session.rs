//! services/portal/src/session.rs
//!
//! The session manager: issues tokens, moves a browser between the anonymous
//! and authenticated states, and queues one-shot notices.

use chrono::Duration;
use gyanganga_core::domain::{ProfileUpdate, User};
use gyanganga_core::ports::{PortResult, SessionStore};
use gyanganga_core::session::{Flash, Session, SessionUser};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the live session for a token, if any.
    pub async fn load(&self, token: Option<&str>) -> PortResult<Option<Session>> {
        match token {
            Some(token) => self.store.get(token).await,
            None => Ok(None),
        }
    }

    /// Starts an authenticated session for a verified user.
    ///
    /// A new token is always issued; the previous one, if any, is destroyed.
    pub async fn login(&self, previous: Option<&str>, user: &User) -> PortResult<Session> {
        if let Some(previous) = previous {
            self.store.remove(previous).await?;
        }
        let session = Session::new(new_token(), Some(SessionUser::from(user)), self.ttl);
        self.store.insert(session.clone()).await?;
        Ok(session)
    }

    pub async fn logout(&self, token: &str) -> PortResult<()> {
        self.store.remove(token).await
    }

    /// Applies a profile edit to the cached snapshot of a live session.
    pub async fn resync(
        &self,
        token: &str,
        mut cached: SessionUser,
        update: &ProfileUpdate,
    ) -> PortResult<SessionUser> {
        cached.resync(update);
        if !self.store.set_user(token, cached.clone()).await? {
            tracing::warn!("Session expired before profile resync for user {}", cached.id());
        }
        Ok(cached)
    }

    /// Queues a notice for the caller.
    ///
    /// When the caller has no live session an anonymous one is created to hold
    /// the notice and returned, so its cookie can be sent back.
    pub async fn flash(&self, token: Option<&str>, flash: Flash) -> PortResult<Option<Session>> {
        if let Some(token) = token {
            if self.store.push_flash(token, flash.clone()).await? {
                return Ok(None);
            }
        }

        let mut session = Session::new(new_token(), None, self.ttl);
        session.queue_flash(flash);
        self.store.insert(session.clone()).await?;
        Ok(Some(session))
    }

    /// Returns and clears the pending notices.
    pub async fn take_flashes(&self, token: Option<&str>) -> PortResult<Vec<Flash>> {
        match token {
            Some(token) => self.store.take_flashes(token).await,
            None => Ok(Vec::new()),
        }
    }
}

fn new_token() -> String {
    Uuid::new_v4().to_string()
}
