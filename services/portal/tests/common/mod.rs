//! Shared fixtures for the router-level tests: in-memory stores standing in for
//! PostgreSQL and helpers for driving requests through the full router.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use gyanganga_core::domain::{
    Mission, MissionDetail, MissionSummary, NewUser, ProfileUpdate, Topic, User, UserCredentials,
    Video,
};
use gyanganga_core::ports::{ContentStore, CredentialStore, PortError, PortResult};
use http_body_util::BodyExt;
use portal_lib::{
    adapters::{HtmlRenderer, MemorySessionStore},
    config::{Config, SessionBackend},
    web::{build_router, state::AppState},
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

//=========================================================================================
// Fake Credential Store
//=========================================================================================

#[derive(Default)]
pub struct FakeCredentialStore {
    rows: Mutex<Vec<UserCredentials>>,
    pub fail: AtomicBool,
}

impl FakeCredentialStore {
    pub fn users(&self) -> Vec<User> {
        self.rows.lock().unwrap().iter().map(|c| c.user.clone()).collect()
    }

    fn check(&self) -> PortResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FakeCredentialStore {
    async fn create_user(&self, new_user: &NewUser) -> PortResult<User> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|c| c.user.username == new_user.username || c.user.email == new_user.email)
        {
            return Err(PortError::Conflict("duplicate key".to_string()));
        }

        let user = User {
            id: rows.len() as i32 + 1,
            full_name: new_user.full_name.clone(),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            role: new_user.role.clone(),
            phone_number: None,
            school_name: None,
            grade: None,
            city: None,
        };
        rows.push(UserCredentials {
            user: user.clone(),
            password_hash: new_user.password_hash.clone(),
        });
        Ok(user)
    }

    async fn get_credentials_by_username(
        &self,
        username: &str,
    ) -> PortResult<Option<UserCredentials>> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|c| c.user.username == username).cloned())
    }

    async fn get_user_by_id(&self, user_id: i32) -> PortResult<User> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|c| c.user.id == user_id)
            .map(|c| c.user.clone())
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }

    async fn update_profile(&self, user_id: i32, update: &ProfileUpdate) -> PortResult<()> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|c| c.user.id != user_id && c.user.email == update.email)
        {
            return Err(PortError::Conflict("duplicate key".to_string()));
        }

        let row = rows
            .iter_mut()
            .find(|c| c.user.id == user_id)
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))?;
        row.user.full_name = update.full_name.clone();
        row.user.email = update.email.clone();
        row.user.phone_number = update.phone_number.clone();
        row.user.school_name = update.school_name.clone();
        row.user.grade = update.grade.clone();
        row.user.city = update.city.clone();
        Ok(())
    }
}

//=========================================================================================
// Fake Content Store
//=========================================================================================

#[derive(Default)]
pub struct FakeContentStore {
    pub topics: Mutex<Vec<Topic>>,
    pub missions: Mutex<Vec<Mission>>,
    pub videos: Mutex<Vec<Video>>,
    pub fail: AtomicBool,
}

impl FakeContentStore {
    fn check(&self) -> PortResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("connection reset".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentStore for FakeContentStore {
    async fn topics_by_category(&self, category: &str) -> PortResult<Vec<Topic>> {
        self.check()?;
        let mut topics: Vec<Topic> = self
            .topics
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.category == category)
            .cloned()
            .collect();
        topics.sort_by(|a, b| {
            (a.grade_level, &a.topic_name).cmp(&(b.grade_level, &b.topic_name))
        });
        Ok(topics)
    }

    async fn get_mission_detail(&self, mission_id: i32) -> PortResult<MissionDetail> {
        self.check()?;
        let mission = self
            .missions
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == mission_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Mission {} not found", mission_id)))?;
        let topic = self
            .topics
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == mission.topic_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Mission {} not found", mission_id)))?;

        Ok(MissionDetail {
            mission,
            topic_name: topic.topic_name,
            grade_level: topic.grade_level,
        })
    }

    async fn videos_for_mission(&self, mission_id: i32) -> PortResult<Vec<Video>> {
        self.check()?;
        let mut videos: Vec<Video> = self
            .videos
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.mission_id == mission_id)
            .cloned()
            .collect();
        videos.sort_by(|a, b| {
            (a.video_order, &a.language, &a.quality).cmp(&(b.video_order, &b.language, &b.quality))
        });
        Ok(videos)
    }

    async fn missions_for_topic(&self, topic_id: i32) -> PortResult<Vec<MissionSummary>> {
        self.check()?;
        let mut missions: Vec<MissionSummary> = self
            .missions
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.topic_id == topic_id)
            .map(|m| MissionSummary {
                id: m.id,
                mission_title: m.mission_title.clone(),
                mission_order: m.mission_order,
            })
            .collect();
        missions.sort_by_key(|m| m.mission_order);
        Ok(missions)
    }
}

//=========================================================================================
// Test Application
//=========================================================================================

pub struct TestApp {
    pub router: Router,
    pub users: Arc<FakeCredentialStore>,
    pub content: Arc<FakeContentStore>,
    pub sessions: Arc<MemorySessionStore>,
}

pub fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: "postgres://unused".to_string(),
        log_level: tracing::Level::INFO,
        db_max_connections: 1,
        session_backend: SessionBackend::Memory,
        session_ttl_hours: 24,
        cookie_secure: false,
        static_dir: PathBuf::from("./no-static-files-in-tests"),
        run_migrations: false,
    }
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(FakeCredentialStore::default());
        let content = Arc::new(FakeContentStore::default());
        let sessions = Arc::new(MemorySessionStore::new());
        let state = Arc::new(AppState::new(
            Arc::new(test_config()),
            users.clone(),
            content.clone(),
            sessions.clone(),
            Arc::new(HtmlRenderer::new("GyanGanga")),
        ));

        Self {
            router: build_router(state),
            users,
            content,
            sessions,
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Response {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("session={}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, path: &str, form: &str, token: Option<&str>) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("session={}", token));
        }
        self.send(builder.body(Body::from(form.to_string())).unwrap())
            .await
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Registers an account through the signup form.
    pub async fn signup(&self, full_name: &str, username: &str, email: &str, password: &str) -> Response {
        let form = format!(
            "fullName={}&username={}&email={}&password={}&role=student",
            encode(full_name),
            encode(username),
            encode(email),
            encode(password)
        );
        self.post_form("/signup", &form, None).await
    }

    pub async fn login(&self, username: &str, password: &str, token: Option<&str>) -> Response {
        let form = format!("username={}&password={}", encode(username), encode(password));
        self.post_form("/login", &form, token).await
    }

    /// Signs up and logs in, returning the authenticated session token.
    pub async fn signed_in(&self, full_name: &str, username: &str) -> String {
        let email = format!("{}@example.com", username);
        let response = self.signup(full_name, username, &email, "correct horse").await;
        assert_eq!(location(&response), Some("/login"));

        let response = self.login(username, "correct horse", None).await;
        assert_eq!(location(&response), Some("/"));
        session_token(&response).expect("login sets a session cookie")
    }
}

//=========================================================================================
// Response Helpers
//=========================================================================================

pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub fn set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// The token from a `Set-Cookie: session=...` header, if one was issued.
pub fn session_token(response: &Response) -> Option<String> {
    let cookie = set_cookie(response)?;
    let value = cookie.split(';').next()?.strip_prefix("session=")?;
    (!value.is_empty()).then(|| value.to_string())
}

pub fn assert_redirect(response: &Response, to: &str) {
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(response), Some(to));
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Minimal form encoding for the characters the tests use.
fn encode(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('&', "%26")
        .replace('+', "%2B")
        .replace('=', "%3D")
        .replace('@', "%40")
        .replace(' ', "+")
}
