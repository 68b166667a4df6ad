//! services/portal/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `CredentialStore` and `ContentStore` ports from the `core` crate. It handles
//! all interactions with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use gyanganga_core::domain::{
    Mission, MissionDetail, MissionSummary, NewUser, ProfileUpdate, Topic, User,
    UserCredentials, Video,
};
use gyanganga_core::ports::{ContentStore, CredentialStore, PortError, PortResult};
use sqlx::{FromRow, PgPool};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the store ports on a shared connection pool.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

const USER_COLUMNS: &str =
    "id, full_name, username, email, role, phone_number, school_name, grade, city";

#[derive(FromRow)]
struct UserRecord {
    id: i32,
    full_name: String,
    username: String,
    email: String,
    role: String,
    phone_number: Option<String>,
    school_name: Option<String>,
    grade: Option<String>,
    city: Option<String>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            full_name: self.full_name,
            username: self.username,
            email: self.email,
            role: self.role,
            phone_number: self.phone_number,
            school_name: self.school_name,
            grade: self.grade,
            city: self.city,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    #[sqlx(flatten)]
    user: UserRecord,
    password_hash: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user: self.user.to_domain(),
            password_hash: self.password_hash,
        }
    }
}

#[derive(FromRow)]
struct TopicRecord {
    id: i32,
    category: String,
    topic_name: String,
    grade_level: i32,
}
impl TopicRecord {
    fn to_domain(self) -> Topic {
        Topic {
            id: self.id,
            category: self.category,
            topic_name: self.topic_name,
            grade_level: self.grade_level,
        }
    }
}

#[derive(FromRow)]
struct MissionDetailRecord {
    id: i32,
    topic_id: i32,
    mission_title: String,
    mission_order: i32,
    topic_name: String,
    grade_level: i32,
}
impl MissionDetailRecord {
    fn to_domain(self) -> MissionDetail {
        MissionDetail {
            mission: Mission {
                id: self.id,
                topic_id: self.topic_id,
                mission_title: self.mission_title,
                mission_order: self.mission_order,
            },
            topic_name: self.topic_name,
            grade_level: self.grade_level,
        }
    }
}

#[derive(FromRow)]
struct MissionSummaryRecord {
    id: i32,
    mission_title: String,
    mission_order: i32,
}
impl MissionSummaryRecord {
    fn to_domain(self) -> MissionSummary {
        MissionSummary {
            id: self.id,
            mission_title: self.mission_title,
            mission_order: self.mission_order,
        }
    }
}

#[derive(FromRow)]
struct VideoRecord {
    id: i32,
    mission_id: i32,
    video_order: i32,
    language: String,
    quality: String,
    video_url: String,
}
impl VideoRecord {
    fn to_domain(self) -> Video {
        Video {
            id: self.id,
            mission_id: self.mission_id,
            video_order: self.video_order,
            language: self.language,
            quality: self.quality,
            video_url: self.video_url,
        }
    }
}

//=========================================================================================
// `CredentialStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl CredentialStore for DbAdapter {
    async fn create_user(&self, new_user: &NewUser) -> PortResult<User> {
        let sql = format!(
            "INSERT INTO users (full_name, username, email, password_hash, role) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );
        let record = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(&new_user.full_name)
            .bind(&new_user.username)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(&new_user.role)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    PortError::Conflict("username or email already registered".to_string())
                }
                _ => unexpected(e),
            })?;
        Ok(record.to_domain())
    }

    async fn get_credentials_by_username(
        &self,
        username: &str,
    ) -> PortResult<Option<UserCredentials>> {
        let sql = format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE username = $1");
        let record = sqlx::query_as::<_, CredentialsRecord>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(record.map(CredentialsRecord::to_domain))
    }

    async fn get_user_by_id(&self, user_id: i32) -> PortResult<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let record = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", user_id)),
                _ => unexpected(e),
            })?;
        Ok(record.to_domain())
    }

    async fn update_profile(&self, user_id: i32, update: &ProfileUpdate) -> PortResult<()> {
        let result = sqlx::query(
            "UPDATE users \
             SET full_name = $1, email = $2, phone_number = $3, school_name = $4, grade = $5, city = $6 \
             WHERE id = $7",
        )
        .bind(&update.full_name)
        .bind(&update.email)
        .bind(&update.phone_number)
        .bind(&update.school_name)
        .bind(&update.grade)
        .bind(&update.city)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                PortError::Conflict("email already registered".to_string())
            }
            _ => unexpected(e),
        })?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }
}

//=========================================================================================
// `ContentStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ContentStore for DbAdapter {
    async fn topics_by_category(&self, category: &str) -> PortResult<Vec<Topic>> {
        let records = sqlx::query_as::<_, TopicRecord>(
            "SELECT id, category, topic_name, grade_level FROM topics \
             WHERE category = $1 ORDER BY grade_level, topic_name",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_mission_detail(&self, mission_id: i32) -> PortResult<MissionDetail> {
        let record = sqlx::query_as::<_, MissionDetailRecord>(
            "SELECT m.id, m.topic_id, m.mission_title, m.mission_order, t.topic_name, t.grade_level \
             FROM missions m JOIN topics t ON m.topic_id = t.id WHERE m.id = $1",
        )
        .bind(mission_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Mission {} not found", mission_id))
            }
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn videos_for_mission(&self, mission_id: i32) -> PortResult<Vec<Video>> {
        let records = sqlx::query_as::<_, VideoRecord>(
            "SELECT id, mission_id, video_order, language, quality, video_url FROM videos \
             WHERE mission_id = $1 ORDER BY video_order, language, quality",
        )
        .bind(mission_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn missions_for_topic(&self, topic_id: i32) -> PortResult<Vec<MissionSummary>> {
        let records = sqlx::query_as::<_, MissionSummaryRecord>(
            "SELECT id, mission_title, mission_order FROM missions \
             WHERE topic_id = $1 ORDER BY mission_order",
        )
        .bind(topic_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}
