use crate::models::Role;
use crate::store::dashboard::{self, ProgressSummary};
use crate::store::{expos, progress, projects};
use crate::web::error::WebError;
use crate::web::handlers::pages::project_card;
use crate::web::render::{self, escape, opt};
use crate::web::session::{LoginRequired, TeacherRequired};
use crate::web::types::SharedState;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use std::fmt::Write;

pub async fn student_dashboard(
    State(app): State<SharedState>,
    current: LoginRequired,
) -> Result<Response, WebError> {
    if current.user.role != Role::Student {
        return Ok(Redirect::to("/").into_response());
    }
    let uid = current.user.id;
    let (rows, own_projects) = app.with_db(|conn| {
        Ok((
            progress::list_for_student(conn, uid)?,
            projects::list_by_creator(conn, uid)?,
        ))
    })?;
    let summary = ProgressSummary::from_rows(&rows);

    let mut body = String::new();
    let _ = write!(
        body,
        r#"<section id="summary"><span class="completed">{} completed</span> of <span class="total">{} lessons</span>, average <span class="avg">{:.1}%</span></section>"#,
        summary.completed_lessons, summary.total_lessons, summary.avg_completion
    );
    let _ = write!(
        body,
        r#"<section id="progress"><h2>My Lessons</h2>{}</section>"#,
        render::list(
            rows.iter().map(|p| format!(
                "Lesson {}: {} ({}%)",
                p.lesson_id,
                escape(&p.status),
                p.completion_percentage
            )),
            "No lessons started yet."
        )
    );
    let _ = write!(
        body,
        r#"<section id="projects"><h2>My Projects</h2>{}</section><p><a href="/create-project">New project</a></p>"#,
        render::list(own_projects.iter().map(project_card), "No projects yet.")
    );

    Ok(render::page(
        "Student Dashboard",
        Some(&current.user),
        current.flash.as_ref(),
        &body,
    )
    .into_response())
}

pub async fn teacher_dashboard(
    State(app): State<SharedState>,
    current: TeacherRequired,
) -> Result<Response, WebError> {
    let (overview, recent_progress, recent_projects, performance, reflections) =
        app.with_db(|conn| {
            Ok((
                dashboard::teacher_overview(conn)?,
                progress::recent_progress(conn, 10)?,
                projects::recently_updated(conn, 5)?,
                dashboard::class_performance(conn)?,
                expos::recent_reflections(conn, 5)?,
            ))
        })?;

    let mut body = String::new();
    let _ = write!(
        body,
        r#"<section id="overview"><span>{} students</span> <span>{} classes</span> <span>{} lessons</span> <span>{} projects</span></section>"#,
        overview.total_students, overview.total_classes, overview.total_lessons, overview.total_projects
    );
    let _ = write!(
        body,
        r#"<section id="class-performance"><h2>Class Performance</h2>{}</section>"#,
        render::list(
            performance.iter().map(|c| format!(
                "{}: {} students, {:.1}% average",
                escape(&c.class.class_name),
                c.student_count,
                c.avg_completion
            )),
            "No classes yet."
        )
    );
    let _ = write!(
        body,
        r#"<section id="recent-progress"><h2>Recent Progress</h2>{}</section>"#,
        render::list(
            recent_progress.iter().map(|p| format!(
                "Student {} / lesson {}: {} ({}%)",
                p.student_id,
                p.lesson_id,
                escape(&p.status),
                p.completion_percentage
            )),
            "No progress recorded yet."
        )
    );
    let _ = write!(
        body,
        r#"<section id="recent-projects"><h2>Recent Projects</h2>{}</section>"#,
        render::list(recent_projects.iter().map(project_card), "No projects yet.")
    );
    let _ = write!(
        body,
        r#"<section id="reflections"><h2>Reflections</h2>{}</section>"#,
        render::list(
            reflections.iter().map(|r| format!(
                "{}: {}",
                escape(&r.date),
                escape(&r.reflection_content)
            )),
            "No reflections yet."
        )
    );

    Ok(render::page(
        "Teacher Dashboard",
        Some(&current.user),
        current.flash.as_ref(),
        &body,
    )
    .into_response())
}

pub async fn student_progress(
    State(app): State<SharedState>,
    current: TeacherRequired,
) -> Result<Response, WebError> {
    let lines = app.with_db(dashboard::student_progress_lines)?;
    let body = render::list(
        lines.iter().map(|l| {
            format!(
                r#"<span class="student">{}</span> {}/{} completed, {:.1}% average, last activity {}"#,
                escape(&l.student.username),
                l.summary.completed_lessons,
                l.summary.total_lessons,
                l.summary.avg_completion,
                opt(&l.recent_activity)
            )
        }),
        "No students yet.",
    );
    Ok(render::page(
        "Student Progress",
        Some(&current.user),
        current.flash.as_ref(),
        &body,
    )
    .into_response())
}
