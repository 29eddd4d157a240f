#![allow(dead_code)]

use std::path::PathBuf;

use axum::http::StatusCode;
use axum_test::TestServer;
use stemfolio::models::{NewClass, NewLesson, NewUser, Role};
use stemfolio::store::{classes, users};
use stemfolio::{create_app, db, AppState, SharedState};

pub const PASSWORD: &str = "password123";

pub fn temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{}-{}", prefix, uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

/// In-process server over a fresh database file. Cookies persist between requests.
pub fn spawn_app(prefix: &str) -> (TestServer, SharedState) {
    let dir = temp_dir(prefix);
    let conn = db::open_db(&dir.join("stemfolio.sqlite3")).expect("open db");
    let state = AppState::new(conn);
    let server = TestServer::builder()
        .save_cookies()
        .build(create_app(state.clone()))
        .expect("test server");
    (server, state)
}

pub fn seed_user(state: &SharedState, username: &str, role: Role) -> i64 {
    let new = NewUser {
        username: username.to_string(),
        email: format!("{username}@barnum.edu"),
        password: PASSWORD.to_string(),
        role,
        first_name: username.to_string(),
        last_name: None,
        grade_level: Some("3rd Grade".to_string()),
        parent_email: None,
        tinkercad_username: None,
    };
    state
        .with_db(|conn| users::create_user(conn, &new))
        .expect("seed user")
}

/// Returns (class_id, lesson_id).
pub fn seed_class_and_lesson(state: &SharedState) -> (i64, i64) {
    state
        .with_db(|conn| {
            let class_id = classes::create_class(
                conn,
                &NewClass {
                    class_name: "3rd Grade Digital Designers".to_string(),
                    teacher_first_name: "Ms. Johnson".to_string(),
                    grade_level: "3rd Grade".to_string(),
                    tinkercad_class_link: String::new(),
                    description: String::new(),
                },
            )?;
            let lesson_id = classes::create_lesson(
                conn,
                &NewLesson {
                    title: "Treehouse Blueprints".to_string(),
                    class_id,
                    subject_area: "Engineering".to_string(),
                    quarter: "Q1".to_string(),
                    duration_minutes: 45,
                    learning_objectives: String::new(),
                    materials_needed: String::new(),
                    lesson_content: String::new(),
                    assessment_method: String::new(),
                    standards_alignment: String::new(),
                    difficulty_level: String::new(),
                },
            )?;
            Ok((class_id, lesson_id))
        })
        .expect("seed class and lesson")
}

pub async fn login(server: &TestServer, username: &str) {
    let response = server
        .post("/login")
        .form(&[("username", username), ("password", PASSWORD)])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
}

pub fn location(response: &axum_test::TestResponse) -> String {
    response
        .header("location")
        .to_str()
        .expect("location header")
        .to_string()
}
