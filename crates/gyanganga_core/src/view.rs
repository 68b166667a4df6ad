//! crates/gyanganga_core/src/view.rs
//!
//! The data payloads handed to the view renderer, one variant per page.

use crate::domain::{CourseProgress, MissionDetail, MissionSummary, Topic, User, Video};
use crate::session::{Flash, SessionUser};

#[derive(Debug, Clone)]
pub enum View {
    /// Public landing page for anonymous visitors.
    Landing,
    Home {
        user: SessionUser,
    },
    Dashboard {
        user: SessionUser,
        progress: CourseProgress,
    },
    Login {
        flashes: Vec<Flash>,
    },
    Signup {
        flashes: Vec<Flash>,
    },
    /// Rendered from the authoritative row, not the session snapshot.
    Profile {
        user: User,
        flashes: Vec<Flash>,
    },
    CourseCategory {
        user: SessionUser,
        category: String,
        topics: Vec<Topic>,
    },
    Mission {
        user: SessionUser,
        mission: MissionDetail,
        videos: Vec<Video>,
        current_video: Option<Video>,
        topic_missions: Vec<MissionSummary>,
    },
}

impl View {
    /// The template name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            View::Landing => "index",
            View::Home { .. } => "home",
            View::Dashboard { .. } => "dashboard",
            View::Login { .. } => "login",
            View::Signup { .. } => "register",
            View::Profile { .. } => "profile",
            View::CourseCategory { .. } => "course_category",
            View::Mission { .. } => "mission",
        }
    }
}
