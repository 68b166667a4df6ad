//! services/portal/src/adapters/html.rs
//!
//! A plain HTML implementation of the `ViewRenderer` port. Pages share one
//! layout with a navigation bar and a notice area; stylesheets and scripts come
//! from the static directory.

use gyanganga_core::domain::{CourseProgress, MissionDetail, MissionSummary, Topic, User, Video};
use gyanganga_core::ports::{PortResult, ViewRenderer};
use gyanganga_core::session::{Flash, FlashKind, SessionUser};
use gyanganga_core::view::View;
use std::fmt::Write;

pub const CATEGORIES: [&str; 4] = ["maths", "science", "technology", "engineering"];

#[derive(Clone, Default)]
pub struct HtmlRenderer {
    site_name: String,
}

impl HtmlRenderer {
    pub fn new(site_name: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
        }
    }
}

impl ViewRenderer for HtmlRenderer {
    fn render(&self, view: &View) -> PortResult<String> {
        let page = match view {
            View::Landing => Page {
                title: "Welcome",
                display_name: None,
                flashes: &[],
                body: landing_body(&self.site_name),
            },
            View::Home { user } => Page {
                title: "Home",
                display_name: Some(user.full_name.as_str()),
                flashes: &[],
                body: home_body(user),
            },
            View::Dashboard { user, progress } => Page {
                title: "Dashboard",
                display_name: Some(user.full_name.as_str()),
                flashes: &[],
                body: dashboard_body(progress),
            },
            View::Login { flashes } => Page {
                title: "Log in",
                display_name: None,
                flashes,
                body: login_body(),
            },
            View::Signup { flashes } => Page {
                title: "Sign up",
                display_name: None,
                flashes,
                body: signup_body(),
            },
            View::Profile { user, flashes } => Page {
                title: "Profile",
                display_name: Some(user.full_name.as_str()),
                flashes,
                body: profile_body(user),
            },
            View::CourseCategory {
                user,
                category,
                topics,
            } => Page {
                title: "Courses",
                display_name: Some(user.full_name.as_str()),
                flashes: &[],
                body: category_body(category, topics),
            },
            View::Mission {
                user,
                mission,
                videos,
                current_video,
                topic_missions,
            } => Page {
                title: "Mission",
                display_name: Some(user.full_name.as_str()),
                flashes: &[],
                body: mission_body(mission, videos, current_video.as_ref(), topic_missions),
            },
        };
        Ok(self.layout(&page))
    }
}

struct Page<'a> {
    title: &'a str,
    display_name: Option<&'a str>,
    flashes: &'a [Flash],
    body: String,
}

impl HtmlRenderer {
    fn layout(&self, page: &Page<'_>) -> String {
        let mut html = String::with_capacity(page.body.len() + 1024);
        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>{} | {}</title>\n<link rel=\"stylesheet\" href=\"/css/styles.css\">\n\
             </head>\n<body>\n<nav>\n<a href=\"/\">{}</a>\n",
            escape(page.title),
            escape(&self.site_name),
            escape(&self.site_name),
        );

        match page.display_name {
            Some(name) => {
                let _ = write!(
                    html,
                    "<a href=\"/dashboard\">Dashboard</a>\n<a href=\"/profile\" class=\"user-name\">{}</a>\n\
                     <a href=\"/logout\">Log out</a>\n",
                    escape(name)
                );
            }
            None => html.push_str("<a href=\"/login\">Log in</a>\n<a href=\"/signup\">Sign up</a>\n"),
        }
        html.push_str("</nav>\n<main>\n");

        for flash in page.flashes {
            let class = match flash.kind {
                FlashKind::Success => "flash flash-success",
                FlashKind::Error => "flash flash-error",
            };
            let _ = writeln!(html, "<div class=\"{}\">{}</div>", class, escape(&flash.message));
        }

        html.push_str(&page.body);
        html.push_str("</main>\n</body>\n</html>\n");
        html
    }
}

//=========================================================================================
// Page Bodies
//=========================================================================================

fn landing_body(site_name: &str) -> String {
    format!(
        "<h1>{}</h1>\n<p>Learn maths, science, technology and engineering through short video missions.</p>\n\
         <p><a href=\"/signup\">Create an account</a> or <a href=\"/login\">log in</a>.</p>\n",
        escape(site_name)
    )
}

fn home_body(user: &SessionUser) -> String {
    let mut body = format!("<h1>Welcome back, {}!</h1>\n<ul class=\"categories\">\n", escape(&user.full_name));
    for category in CATEGORIES {
        let _ = writeln!(
            body,
            "<li><a href=\"/courses/{}\">{}</a></li>",
            category,
            title_case(category)
        );
    }
    body.push_str("</ul>\n");
    body
}

fn dashboard_body(progress: &CourseProgress) -> String {
    let rows = [
        ("maths", progress.maths),
        ("science", progress.science),
        ("technology", progress.technology),
        ("engineering", progress.engineering),
    ];
    let mut body = String::from("<h1>Your progress</h1>\n<ul class=\"progress\">\n");
    for (category, percent) in rows {
        let _ = writeln!(
            body,
            "<li><a href=\"/courses/{}\">{}</a> <progress max=\"100\" value=\"{}\"></progress> {}%</li>",
            category,
            title_case(category),
            percent,
            percent
        );
    }
    body.push_str("</ul>\n");
    body
}

fn login_body() -> String {
    String::from(
        "<h1>Log in</h1>\n<form method=\"post\" action=\"/login\">\n\
         <label>Username <input name=\"username\" required></label>\n\
         <label>Password <input name=\"password\" type=\"password\" required></label>\n\
         <button type=\"submit\">Log in</button>\n</form>\n\
         <p>New here? <a href=\"/signup\">Sign up</a></p>\n",
    )
}

fn signup_body() -> String {
    String::from(
        "<h1>Sign up</h1>\n<form method=\"post\" action=\"/signup\">\n\
         <label>Full name <input name=\"fullName\" required></label>\n\
         <label>Username <input name=\"username\" required></label>\n\
         <label>Email <input name=\"email\" type=\"email\" required></label>\n\
         <label>Password <input name=\"password\" type=\"password\" required></label>\n\
         <label>I am a <select name=\"role\">\
         <option value=\"student\">Student</option>\
         <option value=\"teacher\">Teacher</option>\
         <option value=\"parent\">Parent</option></select></label>\n\
         <button type=\"submit\">Create account</button>\n</form>\n\
         <p>Already registered? <a href=\"/login\">Log in</a></p>\n",
    )
}

fn profile_body(user: &User) -> String {
    let field = |label: &str, name: &str, value: &str, kind: &str| {
        format!(
            "<label>{} <input name=\"{}\" type=\"{}\" value=\"{}\"></label>\n",
            label,
            name,
            kind,
            escape(value)
        )
    };
    let optional = |value: &Option<String>| value.clone().unwrap_or_default();

    let mut body = format!(
        "<h1>{}</h1>\n<p>@{} &middot; {}</p>\n<form method=\"post\" action=\"/profile\">\n",
        escape(&user.full_name),
        escape(&user.username),
        escape(&user.role)
    );
    body.push_str(&field("Full name", "fullName", &user.full_name, "text"));
    body.push_str(&field("Email", "email", &user.email, "email"));
    body.push_str(&field("Phone number", "phoneNumber", &optional(&user.phone_number), "tel"));
    body.push_str(&field("School", "schoolName", &optional(&user.school_name), "text"));
    body.push_str(&field("Grade", "grade", &optional(&user.grade), "text"));
    body.push_str(&field("City", "city", &optional(&user.city), "text"));
    body.push_str("<button type=\"submit\">Save</button>\n</form>\n");
    body
}

fn category_body(category: &str, topics: &[Topic]) -> String {
    let mut body = format!("<h1>{}</h1>\n", escape(&title_case(category)));
    if topics.is_empty() {
        body.push_str("<p>No topics in this category yet.</p>\n");
        return body;
    }

    body.push_str("<ul class=\"topics\">\n");
    for topic in topics {
        let _ = writeln!(
            body,
            "<li data-topic-id=\"{}\"><span class=\"grade\">Grade {}</span> {}</li>",
            topic.id,
            topic.grade_level,
            escape(&topic.topic_name)
        );
    }
    body.push_str("</ul>\n");
    body
}

fn mission_body(
    detail: &MissionDetail,
    videos: &[Video],
    current: Option<&Video>,
    topic_missions: &[MissionSummary],
) -> String {
    let mut body = format!(
        "<h1>{}</h1>\n<p class=\"topic\">{} &middot; Grade {}</p>\n",
        escape(&detail.mission.mission_title),
        escape(&detail.topic_name),
        detail.grade_level
    );

    match current {
        Some(video) => {
            let _ = writeln!(
                body,
                "<video id=\"player\" controls src=\"{}\" data-video-id=\"{}\"></video>",
                escape(&video.video_url),
                video.id
            );
        }
        None => body.push_str("<p>No videos for this mission yet.</p>\n"),
    }

    if !videos.is_empty() {
        body.push_str("<ul class=\"variants\">\n");
        for video in videos {
            let selected = current.map(|c| c.id == video.id).unwrap_or(false);
            let _ = writeln!(
                body,
                "<li{}><a href=\"{}\" data-video-id=\"{}\">Part {} &middot; {} &middot; {}</a></li>",
                if selected { " class=\"current\"" } else { "" },
                escape(&video.video_url),
                video.id,
                video.video_order,
                escape(&video.language),
                escape(&video.quality)
            );
        }
        body.push_str("</ul>\n");
    }

    body.push_str("<h2>Missions in this topic</h2>\n<ol class=\"missions\">\n");
    for mission in topic_missions {
        let _ = writeln!(
            body,
            "<li{}><a href=\"/mission/{}\">{}</a></li>",
            if mission.id == detail.mission.id { " class=\"current\"" } else { "" },
            mission.id,
            escape(&mission.mission_title)
        );
    }
    body.push_str("</ol>\n");
    body
}

//=========================================================================================
// Helpers
//=========================================================================================

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Escapes text for use in element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
