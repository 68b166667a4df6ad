//! services/portal/src/adapters/sessions.rs
//!
//! Two implementations of the `SessionStore` port: an in-process map, which is
//! the default and forgets every session on restart, and a PostgreSQL table for
//! deployments that need sessions to survive a restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use gyanganga_core::ports::{PortError, PortResult, SessionStore};
use gyanganga_core::session::{Flash, Session, SessionUser};
use sqlx::{types::Json, FromRow, PgPool};

//=========================================================================================
// In-memory Store
//=========================================================================================

/// Sessions kept in a concurrent map keyed by token.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, session: Session) -> PortResult<()> {
        // Every new session sweeps out the expired ones.
        let now = Utc::now();
        self.sessions.retain(|_, s| !s.is_expired_at(now));
        self.sessions.insert(session.token.clone(), session);
        Ok(())
    }

    async fn get(&self, token: &str) -> PortResult<Option<Session>> {
        let now = Utc::now();
        if let Some(entry) = self.sessions.get(token) {
            if !entry.is_expired_at(now) {
                return Ok(Some(entry.value().clone()));
            }
        } else {
            return Ok(None);
        }

        self.sessions.remove_if(token, |_, s| s.is_expired_at(now));
        Ok(None)
    }

    async fn set_user(&self, token: &str, user: SessionUser) -> PortResult<bool> {
        let now = Utc::now();
        match self.sessions.get_mut(token) {
            Some(mut session) if !session.is_expired_at(now) => {
                session.user = Some(user);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn push_flash(&self, token: &str, flash: Flash) -> PortResult<bool> {
        let now = Utc::now();
        match self.sessions.get_mut(token) {
            Some(mut session) if !session.is_expired_at(now) => {
                session.queue_flash(flash);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn take_flashes(&self, token: &str) -> PortResult<Vec<Flash>> {
        let now = Utc::now();
        match self.sessions.get_mut(token) {
            Some(mut session) if !session.is_expired_at(now) => {
                Ok(std::mem::take(&mut session.flashes))
            }
            _ => Ok(Vec::new()),
        }
    }

    async fn remove(&self, token: &str) -> PortResult<()> {
        self.sessions.remove(token);
        Ok(())
    }
}

//=========================================================================================
// PostgreSQL Store
//=========================================================================================

/// Sessions persisted in the `auth_sessions` table.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AuthSessionRecord {
    id: String,
    user_snapshot: Option<Json<SessionUser>>,
    flashes: Json<Vec<Flash>>,
    expires_at: DateTime<Utc>,
}
impl AuthSessionRecord {
    fn to_domain(self) -> Session {
        Session {
            token: self.id,
            user: self.user_snapshot.map(|Json(user)| user),
            flashes: self.flashes.0,
            expires_at: self.expires_at,
        }
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn insert(&self, session: Session) -> PortResult<()> {
        let purged = sqlx::query("DELETE FROM auth_sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(unexpected)?
            .rows_affected();
        if purged > 0 {
            tracing::debug!("Purged {} expired sessions", purged);
        }

        sqlx::query(
            "INSERT INTO auth_sessions (id, user_snapshot, flashes, expires_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&session.token)
        .bind(session.user.as_ref().map(Json))
        .bind(Json(&session.flashes))
        .bind(session.expires_at)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn get(&self, token: &str) -> PortResult<Option<Session>> {
        let record = sqlx::query_as::<_, AuthSessionRecord>(
            "SELECT id, user_snapshot, flashes, expires_at FROM auth_sessions WHERE id = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        match record.map(AuthSessionRecord::to_domain) {
            Some(session) if session.is_expired_at(Utc::now()) => {
                self.remove(token).await?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    async fn set_user(&self, token: &str, user: SessionUser) -> PortResult<bool> {
        let result = sqlx::query(
            "UPDATE auth_sessions SET user_snapshot = $2 WHERE id = $1 AND expires_at > NOW()",
        )
        .bind(token)
        .bind(Json(&user))
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(result.rows_affected() > 0)
    }

    async fn push_flash(&self, token: &str, flash: Flash) -> PortResult<bool> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let record = sqlx::query_as::<_, AuthSessionRecord>(
            "SELECT id, user_snapshot, flashes, expires_at FROM auth_sessions \
             WHERE id = $1 AND expires_at > NOW() FOR UPDATE",
        )
        .bind(token)
        .fetch_optional(&mut *tx)
        .await
        .map_err(unexpected)?;

        let Some(mut session) = record.map(AuthSessionRecord::to_domain) else {
            return Ok(false);
        };
        session.queue_flash(flash);

        sqlx::query("UPDATE auth_sessions SET flashes = $2 WHERE id = $1")
            .bind(token)
            .bind(Json(&session.flashes))
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        tx.commit().await.map_err(unexpected)?;
        Ok(true)
    }

    async fn take_flashes(&self, token: &str) -> PortResult<Vec<Flash>> {
        let taken: Option<(Json<Vec<Flash>>,)> = sqlx::query_as(
            "WITH old AS ( \
                 SELECT id, flashes FROM auth_sessions \
                 WHERE id = $1 AND expires_at > NOW() FOR UPDATE \
             ) \
             UPDATE auth_sessions s SET flashes = '[]'::jsonb \
             FROM old WHERE s.id = old.id \
             RETURNING old.flashes",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(taken.map(|(Json(flashes),)| flashes).unwrap_or_default())
    }

    async fn remove(&self, token: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }
}
