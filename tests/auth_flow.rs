mod test_support;

use axum::http::StatusCode;
use stemfolio::models::Role;
use test_support::{location, login, seed_user, spawn_app, PASSWORD};

#[tokio::test]
async fn login_routes_by_role() {
    let (server, state) = spawn_app("stemfolio-login-roles");
    seed_user(&state, "teacher1", Role::Teacher);
    seed_user(&state, "student1", Role::Student);

    let response = server
        .post("/login")
        .form(&[("username", "teacher1"), ("password", PASSWORD)])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/teacher-dashboard");

    let response = server
        .post("/login")
        .form(&[("username", "student1"), ("password", PASSWORD)])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/student-dashboard");
}

#[tokio::test]
async fn unknown_user_and_wrong_password_look_the_same() {
    let (server, state) = spawn_app("stemfolio-login-failures");
    seed_user(&state, "teacher1", Role::Teacher);

    let unknown = server
        .post("/login")
        .form(&[("username", "nobody"), ("password", PASSWORD)])
        .await;
    let wrong = server
        .post("/login")
        .form(&[("username", "teacher1"), ("password", "not-it")])
        .await;

    unknown.assert_status_ok();
    wrong.assert_status_ok();
    assert!(unknown.text().contains("Invalid credentials"));
    assert_eq!(unknown.text(), wrong.text());
}

#[tokio::test]
async fn next_target_is_only_honoured_for_local_paths() {
    let (server, state) = spawn_app("stemfolio-login-next");
    seed_user(&state, "teacher1", Role::Teacher);

    let response = server
        .post("/login")
        .add_query_param("next", "https://evil.example/phish")
        .form(&[("username", "teacher1"), ("password", PASSWORD)])
        .await;
    assert_eq!(location(&response), "/teacher-dashboard");

    let response = server
        .post("/login")
        .add_query_param("next", "//evil.example")
        .form(&[("username", "teacher1"), ("password", PASSWORD)])
        .await;
    assert_eq!(location(&response), "/teacher-dashboard");

    let response = server
        .post("/login")
        .add_query_param("next", "/manage-classes")
        .form(&[("username", "teacher1"), ("password", PASSWORD)])
        .await;
    assert_eq!(location(&response), "/manage-classes");
}

#[tokio::test]
async fn anonymous_teacher_dashboard_redirects_home_with_notice() {
    let (server, _state) = spawn_app("stemfolio-guard-anon");

    let response = server.get("/teacher-dashboard").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let home = server.get("/").await;
    home.assert_status_ok();
    assert!(home.text().contains("Teacher access required."));

    // One-shot: the notice is gone on the next page.
    let again = server.get("/").await;
    assert!(!again.text().contains("Teacher access required."));
}

#[tokio::test]
async fn students_are_kept_out_of_staff_pages() {
    let (server, state) = spawn_app("stemfolio-guard-student");
    seed_user(&state, "student1", Role::Student);
    login(&server, "student1").await;

    for path in ["/teacher-dashboard", "/manage-classes", "/student-progress"] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/", "{path}");
    }

    let response = server.get("/manage-rooms").await;
    assert_eq!(location(&response), "/");
    let home = server.get("/").await;
    assert!(home.text().contains("Admin access required."));
}

#[tokio::test]
async fn admin_pages_reject_teachers_but_admit_admins() {
    let (server, state) = spawn_app("stemfolio-guard-admin");
    seed_user(&state, "teacher1", Role::Teacher);
    seed_user(&state, "admin1", Role::Admin);

    login(&server, "teacher1").await;
    let response = server.get("/manage-rooms").await;
    response.assert_status(StatusCode::SEE_OTHER);

    login(&server, "admin1").await;
    server.get("/manage-rooms").await.assert_status_ok();
    server.get("/teacher-dashboard").await.assert_status_ok();
}

#[tokio::test]
async fn login_required_pages_send_anonymous_users_to_login() {
    let (server, _state) = spawn_app("stemfolio-guard-login");

    let response = server.get("/create-project").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?next=%2Fcreate-project");

    let page = server.get("/login").add_query_param("next", "/create-project").await;
    page.assert_status_ok();
    assert!(page.text().contains("Please log in to access this page."));
    assert!(page.text().contains(r#"action="/login?next=%2Fcreate-project""#));
}

#[tokio::test]
async fn login_redirect_keeps_the_query_string() {
    let (server, state) = spawn_app("stemfolio-guard-query");
    seed_user(&state, "teacher1", Role::Teacher);

    let response = server.get("/create-project?a=1&b=two").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/login?next=%2Fcreate-project%3Fa%3D1%26b%3Dtwo"
    );

    let page = server
        .get("/login")
        .add_query_param("next", "/create-project?a=1&b=two")
        .await;
    assert!(page
        .text()
        .contains(r#"action="/login?next=%2Fcreate-project%3Fa%3D1%26b%3Dtwo""#));

    let response = server
        .post("/login")
        .add_query_param("next", "/create-project?a=1&b=two")
        .form(&[("username", "teacher1"), ("password", PASSWORD)])
        .await;
    assert_eq!(location(&response), "/create-project?a=1&b=two");
}

#[tokio::test]
async fn repeated_anonymous_denials_store_nothing() {
    let (server, state) = spawn_app("stemfolio-guard-no-rows");

    for _ in 0..50 {
        server
            .get("/teacher-dashboard")
            .await
            .assert_status(StatusCode::SEE_OTHER);
    }
    assert!(server.get("/").await.text().contains("Teacher access required."));

    let (sessions, tables): (i64, Vec<String>) = state
        .with_db(|conn| {
            let sessions = conn.query_row("SELECT COUNT(*) FROM sessions", [], |r| r.get(0))?;
            let tables = conn
                .prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?
                .query_map([], |r| r.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok((sessions, tables))
        })
        .expect("count rows");
    assert_eq!(sessions, 0);
    assert!(!tables.iter().any(|t| t.contains("flash")), "{tables:?}");
}

#[tokio::test]
async fn session_cookie_is_http_only_and_lax() {
    let (server, state) = spawn_app("stemfolio-cookie-attrs");
    seed_user(&state, "teacher1", Role::Teacher);

    let response = server
        .post("/login")
        .form(&[("username", "teacher1"), ("password", PASSWORD)])
        .await;
    let cookie = response.cookie("stemfolio_session");
    assert!(!cookie.value().is_empty());
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site().map(|s| s.to_string()).as_deref(), Some("Lax"));
}

#[tokio::test]
async fn logout_ends_the_session() {
    let (server, state) = spawn_app("stemfolio-logout");
    seed_user(&state, "teacher1", Role::Teacher);
    login(&server, "teacher1").await;
    server.get("/teacher-dashboard").await.assert_status_ok();

    let response = server.get("/logout").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(server.get("/").await.text().contains("Logged out successfully"));

    let response = server.get("/teacher-dashboard").await;
    response.assert_status(StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn login_form_without_password_is_a_bad_request() {
    let (server, _state) = spawn_app("stemfolio-login-malformed");
    let response = server.post("/login").form(&[("username", "x")]).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_text("Bad Request");
}
