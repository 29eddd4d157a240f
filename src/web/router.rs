use super::handlers::{auth, classes, dashboards, pages, portfolio, progress, projects};
use super::session;
use super::types::SharedState;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

pub fn create_app(state: SharedState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/showcase", get(pages::showcase))
        .route("/curriculum", get(pages::curriculum))
        .route("/about", get(pages::about))
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/logout", get(auth::logout))
        // dashboards
        .route("/student-dashboard", get(dashboards::student_dashboard))
        .route("/teacher-dashboard", get(dashboards::teacher_dashboard))
        .route("/student-progress", get(dashboards::student_progress))
        // teacher CRUD
        .route("/manage-classes", get(classes::manage_classes))
        .route(
            "/create-class",
            get(classes::create_class_page).post(classes::create_class),
        )
        .route("/manage-lessons", get(classes::manage_lessons))
        .route(
            "/create-lesson",
            get(classes::create_lesson_page).post(classes::create_lesson),
        )
        .route(
            "/create-project",
            get(projects::create_project_page).post(projects::create_project),
        )
        .route("/create-reflection", post(progress::create_reflection))
        .route("/create-portfolio-item", post(portfolio::create_portfolio_item))
        // admin
        .route("/manage-rooms", get(portfolio::manage_rooms))
        .route("/create-room", post(portfolio::create_room))
        .route("/create-codename", post(portfolio::create_codename))
        .route("/create-expo", post(portfolio::create_expo))
        // public portfolio
        .route("/portfolio", get(portfolio::portfolio_index))
        .route("/portfolio/room/{room_number}", get(portfolio::room_page))
        .route("/portfolio/student/{id}", get(portfolio::student_page))
        .route("/portfolio/item/{id}", get(portfolio::item_page))
        // json
        .route("/api/update-progress", post(progress::update_progress))
        .route("/api/featured-project/{id}", post(projects::toggle_featured))
        .route("/api/portfolio/like/{id}", post(portfolio::like_item))
        .layer(middleware::from_fn(session::expire_shown_notice))
        .with_state(state)
}
