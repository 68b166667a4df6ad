mod common;

use axum::http::StatusCode;
use common::{assert_redirect, body_text, TestApp};
use gyanganga_core::domain::{Mission, Topic, Video};
use std::sync::atomic::Ordering;

fn topic(id: i32, category: &str, name: &str, grade_level: i32) -> Topic {
    Topic {
        id,
        category: category.to_string(),
        topic_name: name.to_string(),
        grade_level,
    }
}

fn mission(id: i32, topic_id: i32, title: &str, order: i32) -> Mission {
    Mission {
        id,
        topic_id,
        mission_title: title.to_string(),
        mission_order: order,
    }
}

fn video(id: i32, mission_id: i32, order: i32, language: &str, quality: &str) -> Video {
    Video {
        id,
        mission_id,
        video_order: order,
        language: language.to_string(),
        quality: quality.to_string(),
        video_url: format!("/media/v{}.mp4", id),
    }
}

fn seed_content(app: &TestApp) {
    *app.content.topics.lock().unwrap() = vec![
        topic(1, "maths", "Fractions", 5),
        topic(2, "maths", "Addition", 1),
        topic(3, "maths", "Angles", 5),
        topic(4, "science", "Magnets", 3),
    ];
    *app.content.missions.lock().unwrap() = vec![
        mission(20, 1, "Comparing fractions", 2),
        mission(10, 1, "What is a fraction?", 1),
        mission(30, 1, "Adding fractions", 3),
        mission(40, 4, "Poles attract", 1),
    ];
    *app.content.videos.lock().unwrap() = vec![
        video(102, 10, 2, "english", "480p"),
        video(101, 10, 1, "english", "720p"),
        video(201, 20, 1, "hindi", "720p"),
    ];
}

fn player_src(id: i32) -> String {
    format!("<video id=\"player\" controls src=\"/media/v{}.mp4\"", id)
}

//=========================================================================================
// Landing & Dashboard
//=========================================================================================

#[tokio::test]
async fn test_landing_for_anonymous_visitor() {
    let app = TestApp::new();
    let response = app.get("/", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_text(response).await;
    assert!(page.contains("href=\"/signup\""));
    assert!(!page.contains("Welcome back"));
}

#[tokio::test]
async fn test_dashboard_shows_placeholder_progress() {
    let app = TestApp::new();
    let token = app.signed_in("Ravi Kumar", "ravi").await;

    let page = body_text(app.get("/dashboard", Some(&token)).await).await;
    assert!(page.contains("value=\"75\""));
    assert!(page.contains("value=\"90\""));
    assert!(page.contains("Ravi Kumar"));
}

//=========================================================================================
// Profile
//=========================================================================================

#[tokio::test]
async fn test_profile_reads_fresh_row() {
    let app = TestApp::new();
    let token = app.signed_in("Ravi Kumar", "ravi").await;

    let response = app.get("/profile", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("value=\"ravi@example.com\""));
    assert!(page.contains("@ravi"));
}

#[tokio::test]
async fn test_profile_update_refreshes_display_name() {
    let app = TestApp::new();
    let token = app.signed_in("Ravi Kumar", "ravi").await;

    let response = app
        .post_form(
            "/profile",
            "fullName=Ravi+K.&email=ravi.k%40example.com&phoneNumber=98765&schoolName=&grade=7&city=Pune",
            Some(&token),
        )
        .await;
    assert_redirect(&response, "/profile");

    // No re-login: the next page already shows the new name.
    let home = body_text(app.get("/", Some(&token)).await).await;
    assert!(home.contains("Welcome back, Ravi K.!"));

    let profile = body_text(app.get("/profile", Some(&token)).await).await;
    assert!(profile.contains("Profile updated."));
    assert!(profile.contains("value=\"Pune\""));

    let user = app.users.users().remove(0);
    assert_eq!(user.full_name, "Ravi K.");
    assert_eq!(user.email, "ravi.k@example.com");
    assert_eq!(user.phone_number.as_deref(), Some("98765"));
    assert_eq!(user.school_name, None);
    assert_eq!(user.username, "ravi");
}

#[tokio::test]
async fn test_profile_update_rejects_taken_email() {
    let app = TestApp::new();
    app.signup("Asha Rao", "asha", "asha@example.com", "pw").await;
    let token = app.signed_in("Ravi Kumar", "ravi").await;

    let response = app
        .post_form("/profile", "fullName=Ravi&email=asha%40example.com", Some(&token))
        .await;
    assert_redirect(&response, "/profile");

    let profile = body_text(app.get("/profile", Some(&token)).await).await;
    assert!(profile.contains("That email is already in use."));
    let home = body_text(app.get("/", Some(&token)).await).await;
    assert!(home.contains("Welcome back, Ravi Kumar!"));
}

#[tokio::test]
async fn test_profile_update_rejects_blank_name() {
    let app = TestApp::new();
    let token = app.signed_in("Ravi Kumar", "ravi").await;

    let response = app
        .post_form("/profile", "fullName=+&email=ravi%40example.com", Some(&token))
        .await;
    assert_redirect(&response, "/profile");
    assert_eq!(app.users.users()[0].full_name, "Ravi Kumar");
}

#[tokio::test]
async fn test_profile_store_failure_redirects_home() {
    let app = TestApp::new();
    let token = app.signed_in("Ravi Kumar", "ravi").await;
    app.users.fail.store(true, Ordering::SeqCst);

    assert_redirect(&app.get("/profile", Some(&token)).await, "/");
}

//=========================================================================================
// Courses
//=========================================================================================

#[tokio::test]
async fn test_courses_ordered_by_grade_then_name() {
    let app = TestApp::new();
    seed_content(&app);
    let token = app.signed_in("Ravi Kumar", "ravi").await;

    let response = app.get("/courses/maths", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;

    let addition = page.find("Addition").unwrap();
    let angles = page.find("Angles").unwrap();
    let fractions = page.find("Fractions").unwrap();
    assert!(addition < angles && angles < fractions);
    assert!(!page.contains("Magnets"));
}

#[tokio::test]
async fn test_courses_empty_category() {
    let app = TestApp::new();
    seed_content(&app);
    let token = app.signed_in("Ravi Kumar", "ravi").await;

    let page = body_text(app.get("/courses/art", Some(&token)).await).await;
    assert!(page.contains("No topics in this category yet."));
}

#[tokio::test]
async fn test_courses_store_failure_redirects_home() {
    let app = TestApp::new();
    let token = app.signed_in("Ravi Kumar", "ravi").await;
    app.content.fail.store(true, Ordering::SeqCst);

    assert_redirect(&app.get("/courses/maths", Some(&token)).await, "/");
}

//=========================================================================================
// Missions
//=========================================================================================

#[tokio::test]
async fn test_mission_plays_exact_default_video() {
    let app = TestApp::new();
    seed_content(&app);
    let token = app.signed_in("Ravi Kumar", "ravi").await;

    let response = app.get("/mission/10", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;

    assert!(page.contains(&player_src(101)));
    assert!(page.contains("Fractions &middot; Grade 5"));

    // Sibling missions listed in mission order.
    let first = page.find("What is a fraction?").unwrap();
    let second = page.find("Comparing fractions").unwrap();
    let third = page.find("Adding fractions").unwrap();
    assert!(first < second && second < third);
    assert!(!page.contains("Poles attract"));
}

#[tokio::test]
async fn test_mission_falls_back_to_first_video() {
    let app = TestApp::new();
    seed_content(&app);
    let token = app.signed_in("Ravi Kumar", "ravi").await;

    let page = body_text(app.get("/mission/20", Some(&token)).await).await;
    assert!(page.contains(&player_src(201)));
}

#[tokio::test]
async fn test_mission_without_videos() {
    let app = TestApp::new();
    seed_content(&app);
    let token = app.signed_in("Ravi Kumar", "ravi").await;

    let response = app.get("/mission/30", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No videos for this mission yet."));
}

#[tokio::test]
async fn test_missing_mission_is_not_found() {
    let app = TestApp::new();
    seed_content(&app);
    let token = app.signed_in("Ravi Kumar", "ravi").await;

    // Trailing junk is not ignored, even when the numeric prefix names a mission.
    for path in ["/mission/999", "/mission/abc", "/mission/-1", "/mission/10abc"] {
        let response = app.get(path, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "Mission not found!");
    }
}

#[tokio::test]
async fn test_mission_store_failure_is_server_error() {
    let app = TestApp::new();
    seed_content(&app);
    let token = app.signed_in("Ravi Kumar", "ravi").await;
    app.content.fail.store(true, Ordering::SeqCst);

    let response = app.get("/mission/10", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Error loading mission.");
}

//=========================================================================================
// Misc
//=========================================================================================

#[tokio::test]
async fn test_health_and_unknown_route() {
    let app = TestApp::new();

    let health = app.get("/health", None).await;
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(body_text(health).await, "ok");

    let missing = app.get("/no/such/page", None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(missing).await, "Page not found");
}
