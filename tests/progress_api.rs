mod test_support;

use axum::http::StatusCode;
use serde_json::json;
use stemfolio::models::Role;
use stemfolio::store::progress;
use test_support::{location, login, seed_class_and_lesson, seed_user, spawn_app};

#[tokio::test]
async fn completed_at_is_stamped_once() {
    let (server, state) = spawn_app("stemfolio-progress-stamp");
    seed_user(&state, "teacher1", Role::Teacher);
    let student = seed_user(&state, "student1", Role::Student);
    let (class_id, lesson_id) = seed_class_and_lesson(&state);
    login(&server, "teacher1").await;

    let body = json!({
        "student_id": student,
        "lesson_id": lesson_id,
        "class_id": class_id,
        "status": "completed",
    });
    let response = server.post("/api/update-progress").json(&body).await;
    response.assert_status_ok();
    response.assert_json(&json!({
        "success": true,
        "message": "Progress updated successfully",
    }));

    let first = state
        .with_db(|conn| progress::find_progress(conn, student, lesson_id))
        .expect("find")
        .expect("row created");
    let stamped = first.completed_at.clone().expect("completed_at set");

    server
        .post("/api/update-progress")
        .json(&body)
        .await
        .assert_status_ok();
    let second = state
        .with_db(|conn| progress::find_progress(conn, student, lesson_id))
        .expect("find")
        .expect("row kept");
    assert_eq!(second.id, first.id);
    assert_eq!(second.completed_at.as_deref(), Some(stamped.as_str()));
    assert!(second.last_updated >= first.last_updated);
}

#[tokio::test]
async fn partial_update_leaves_absent_fields_alone() {
    let (server, state) = spawn_app("stemfolio-progress-partial");
    seed_user(&state, "teacher1", Role::Teacher);
    let student = seed_user(&state, "student1", Role::Student);
    let (class_id, lesson_id) = seed_class_and_lesson(&state);
    login(&server, "teacher1").await;

    server
        .post("/api/update-progress")
        .json(&json!({
            "student_id": student,
            "lesson_id": lesson_id,
            "class_id": class_id,
            "status": "in_progress",
            "completion_percentage": 40,
            "notes": "measuring the beams",
        }))
        .await
        .assert_status_ok();
    server
        .post("/api/update-progress")
        .json(&json!({
            "student_id": student,
            "lesson_id": lesson_id,
            "class_id": class_id,
            "teacher_feedback": "great joinery",
        }))
        .await
        .assert_status_ok();

    let row = state
        .with_db(|conn| progress::find_progress(conn, student, lesson_id))
        .expect("find")
        .expect("row");
    assert_eq!(row.status, "in_progress");
    assert_eq!(row.completion_percentage, 40);
    assert_eq!(row.notes.as_deref(), Some("measuring the beams"));
    assert_eq!(row.teacher_feedback.as_deref(), Some("great joinery"));
    assert!(row.started_at.is_some());
    assert!(row.completed_at.is_none());
}

#[tokio::test]
async fn class_id_is_ignored_once_the_row_exists() {
    let (server, state) = spawn_app("stemfolio-progress-class");
    seed_user(&state, "teacher1", Role::Teacher);
    let student = seed_user(&state, "student1", Role::Student);
    let (class_id, lesson_id) = seed_class_and_lesson(&state);
    login(&server, "teacher1").await;

    server
        .post("/api/update-progress")
        .json(&json!({
            "student_id": student,
            "lesson_id": lesson_id,
            "class_id": class_id,
            "status": "in_progress",
        }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/update-progress")
        .json(&json!({
            "student_id": student,
            "lesson_id": lesson_id,
            "class_id": 9999,
            "showcase_ready": true,
        }))
        .await;
    response.assert_status_ok();

    let row = state
        .with_db(|conn| progress::find_progress(conn, student, lesson_id))
        .expect("find")
        .expect("row");
    assert_eq!(row.class_id, class_id);
    assert!(row.showcase_ready);
    assert_eq!(row.status, "in_progress");
}

#[tokio::test]
async fn malformed_or_dangling_bodies_are_bad_requests() {
    let (server, state) = spawn_app("stemfolio-progress-malformed");
    seed_user(&state, "teacher1", Role::Teacher);
    let student = seed_user(&state, "student1", Role::Student);
    let (class_id, _) = seed_class_and_lesson(&state);
    login(&server, "teacher1").await;

    let response = server
        .post("/api/update-progress")
        .json(&json!({ "lesson_id": 1, "class_id": 1 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_text("Bad Request");

    let response = server
        .post("/api/update-progress")
        .json(&json!({
            "student_id": student,
            "lesson_id": 4242,
            "class_id": class_id,
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_class_is_rejected_when_creating_the_row() {
    let (server, state) = spawn_app("stemfolio-progress-new-class");
    seed_user(&state, "teacher1", Role::Teacher);
    let student = seed_user(&state, "student1", Role::Student);
    let (_, lesson_id) = seed_class_and_lesson(&state);
    login(&server, "teacher1").await;

    let response = server
        .post("/api/update-progress")
        .json(&json!({
            "student_id": student,
            "lesson_id": lesson_id,
            "class_id": 9999,
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let row = state
        .with_db(|conn| progress::find_progress(conn, student, lesson_id))
        .expect("find");
    assert!(row.is_none());
}

#[tokio::test]
async fn students_cannot_update_progress() {
    let (server, state) = spawn_app("stemfolio-progress-student");
    let student = seed_user(&state, "student1", Role::Student);
    let (class_id, lesson_id) = seed_class_and_lesson(&state);
    login(&server, "student1").await;

    let response = server
        .post("/api/update-progress")
        .json(&json!({
            "student_id": student,
            "lesson_id": lesson_id,
            "class_id": class_id,
            "status": "completed",
        }))
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let row = state
        .with_db(|conn| progress::find_progress(conn, student, lesson_id))
        .expect("find");
    assert!(row.is_none());
}

#[tokio::test]
async fn dashboards_reflect_recorded_progress() {
    let (server, state) = spawn_app("stemfolio-progress-dashboards");
    seed_user(&state, "teacher1", Role::Teacher);
    let student = seed_user(&state, "student1", Role::Student);
    let (class_id, lesson_id) = seed_class_and_lesson(&state);

    login(&server, "teacher1").await;
    server
        .post("/api/update-progress")
        .json(&json!({
            "student_id": student,
            "lesson_id": lesson_id,
            "class_id": class_id,
            "status": "completed",
            "completion_percentage": 100,
        }))
        .await
        .assert_status_ok();

    let teacher = server.get("/teacher-dashboard").await;
    teacher.assert_status_ok();
    assert!(teacher
        .text()
        .contains("3rd Grade Digital Designers: 1 students, 100.0% average"));

    let report = server.get("/student-progress").await;
    report.assert_status_ok();
    assert!(report.text().contains("1/1 completed, 100.0% average"));

    login(&server, "student1").await;
    let mine = server.get("/student-dashboard").await;
    mine.assert_status_ok();
    assert!(mine.text().contains(r#"<span class="completed">1 completed</span>"#));
}
