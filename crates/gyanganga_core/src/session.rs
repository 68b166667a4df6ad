//! crates/gyanganga_core/src/session.rs
//!
//! The server-side session model: an opaque token mapped to an optional
//! snapshot of the logged-in user plus a queue of one-shot notices.
//!
//! The snapshot is a cached copy of the `users` row taken at login. It is only
//! trusted for identity and display; anything that depends on fresh data must
//! go back to the credential store.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ProfileUpdate, User};

/// The cached view of a user held by an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    id: i32,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl SessionUser {
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Refreshes the display fields after the user edited their profile.
    /// The identity is left untouched.
    pub fn resync(&mut self, update: &ProfileUpdate) {
        self.full_name = update.full_name.clone();
        self.email = update.email.clone();
    }
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

/// A notice displayed on the next rendered page and then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Most notices a session holds; older ones are dropped first.
pub const MAX_QUEUED_FLASHES: usize = 5;

/// A browser session. Anonymous sessions exist only to carry notices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: Option<SessionUser>,
    pub flashes: Vec<Flash>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: String, user: Option<SessionUser>, ttl: Duration) -> Self {
        Self {
            token,
            user,
            flashes: Vec::new(),
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Queues a notice. A repeat of the newest queued notice is dropped.
    pub fn queue_flash(&mut self, flash: Flash) {
        if self.flashes.last() == Some(&flash) {
            return;
        }
        self.flashes.push(flash);
        if self.flashes.len() > MAX_QUEUED_FLASHES {
            let excess = self.flashes.len() - MAX_QUEUED_FLASHES;
            self.flashes.drain(..excess);
        }
    }
}
