//! crates/gyanganga_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or template engine.

use serde::Serialize;

// Represents a user - safe to hand to views, never carries the password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i32,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub phone_number: Option<String>,
    pub school_name: Option<String>,
    pub grade: Option<String>,
    pub city: Option<String>,
}

// Only used internally for login - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// The fields required to insert a new user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// The editable subset of a user's profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub school_name: Option<String>,
    pub grade: Option<String>,
    pub city: Option<String>,
}

/// A course topic inside a category such as `maths` or `science`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub id: i32,
    pub category: String,
    pub topic_name: String,
    pub grade_level: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mission {
    pub id: i32,
    pub topic_id: i32,
    pub mission_title: String,
    pub mission_order: i32,
}

/// A mission joined with the topic it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissionDetail {
    pub mission: Mission,
    pub topic_name: String,
    pub grade_level: i32,
}

/// The short form of a mission used for the "upcoming missions" listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissionSummary {
    pub id: i32,
    pub mission_title: String,
    pub mission_order: i32,
}

/// One language/quality variant of a lesson video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Video {
    pub id: i32,
    pub mission_id: i32,
    pub video_order: i32,
    pub language: String,
    pub quality: String,
    pub video_url: String,
}

pub const DEFAULT_VIDEO_ORDER: i32 = 1;
pub const DEFAULT_VIDEO_LANGUAGE: &str = "english";
pub const DEFAULT_VIDEO_QUALITY: &str = "720p";

/// Picks the video that starts playing when a mission is opened.
///
/// The first video of the mission in English at 720p wins. When no variant
/// matches exactly, the first entry of the (already ordered) list is used.
pub fn select_default_video(videos: &[Video]) -> Option<&Video> {
    videos
        .iter()
        .find(|v| {
            v.video_order == DEFAULT_VIDEO_ORDER
                && v.language == DEFAULT_VIDEO_LANGUAGE
                && v.quality == DEFAULT_VIDEO_QUALITY
        })
        .or_else(|| videos.first())
}

/// Per-category completion percentages shown on the dashboard.
///
/// Progress is not tracked yet, so the dashboard always shows the same figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CourseProgress {
    pub maths: u8,
    pub science: u8,
    pub technology: u8,
    pub engineering: u8,
}

impl CourseProgress {
    pub fn placeholder() -> Self {
        Self {
            maths: 75,
            science: 50,
            technology: 90,
            engineering: 25,
        }
    }
}
