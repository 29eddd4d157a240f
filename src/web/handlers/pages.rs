use crate::models::{Project, Quarter, Role};
use crate::store::{classes, expos, projects, users};
use crate::web::error::WebError;
use crate::web::render::{self, escape, opt};
use crate::web::session::Viewer;
use crate::web::types::SharedState;
use axum::extract::State;
use axum::response::Html;
use std::fmt::Write;

#[derive(Debug)]
struct HomeStats {
    total_students: i64,
    total_projects: i64,
    active_classes: i64,
    lesson_plans: i64,
}

pub(crate) fn project_card(p: &Project) -> String {
    let mut out = format!(
        r#"<span class="project" data-id="{}">{}</span> <em>{}</em> {}"#,
        p.id,
        escape(&p.title),
        opt(&p.project_type),
        opt(&p.quarter),
    );
    if p.is_featured {
        out.push_str(r#" <span class="badge">Featured</span>"#);
    }
    out
}

pub async fn index(State(app): State<SharedState>, viewer: Viewer) -> Result<Html<String>, WebError> {
    let today = chrono::Local::now().date_naive();
    let (featured, recent, stats, upcoming) = app.with_db(|conn| {
        let featured = projects::featured_public(conn, 6)?;
        let recent = projects::recent_public(conn, 8)?;
        let stats = HomeStats {
            total_students: users::count_by_role(conn, Role::Student)?,
            total_projects: projects::count_public(conn)?,
            active_classes: classes::count_classes(conn)?,
            lesson_plans: classes::count_lessons(conn)?,
        };
        let upcoming = expos::upcoming_expo(conn, today)?;
        Ok((featured, recent, stats, upcoming))
    })?;

    let mut body = String::new();
    let _ = write!(
        body,
        r#"<section id="stats"><span>{} students</span> <span>{} projects</span> <span>{} classes</span> <span>{} lesson plans</span></section>"#,
        stats.total_students, stats.total_projects, stats.active_classes, stats.lesson_plans
    );
    if let Some(expo) = upcoming {
        let _ = write!(
            body,
            r#"<section id="upcoming-expo"><h2>Upcoming Expo</h2><p>{} ({}) on {}</p></section>"#,
            escape(&expo.title),
            escape(&expo.quarter),
            escape(&expo.date)
        );
    }
    let _ = write!(
        body,
        r#"<section id="featured"><h2>Featured Projects</h2>{}</section>"#,
        render::list(featured.iter().map(project_card), "No featured projects yet.")
    );
    let _ = write!(
        body,
        r#"<section id="recent"><h2>Recent Projects</h2>{}</section>"#,
        render::list(recent.iter().map(project_card), "No public projects yet.")
    );

    Ok(render::page(
        "STEM Program Showcase",
        viewer.user.as_ref(),
        viewer.flash.as_ref(),
        &body,
    ))
}

pub async fn showcase(State(app): State<SharedState>, viewer: Viewer) -> Result<Html<String>, WebError> {
    let by_quarter = app.with_db(|conn| {
        Quarter::ALL
            .iter()
            .map(|q| Ok((*q, projects::public_by_quarter(conn, q.as_str())?)))
            .collect::<anyhow::Result<Vec<_>>>()
    })?;

    let mut body = String::new();
    for (quarter, items) in by_quarter {
        let _ = write!(
            body,
            r#"<section id="{q}"><h2>{q}: {theme}</h2>{list}</section>"#,
            q = quarter.as_str(),
            theme = escape(quarter.theme()),
            list = render::list(items.iter().map(project_card), "No projects shared yet."),
        );
    }
    Ok(render::page(
        "Project Showcase",
        viewer.user.as_ref(),
        viewer.flash.as_ref(),
        &body,
    ))
}

pub async fn curriculum(viewer: Viewer) -> Html<String> {
    let mut body = String::from("<p>Our year moves through four themed quarters.</p>");
    body.push_str(&render::list(
        Quarter::ALL
            .iter()
            .map(|q| format!("{}: {}", q.as_str(), escape(q.theme()))),
        "",
    ));
    render::page("Curriculum", viewer.user.as_ref(), viewer.flash.as_ref(), &body)
}

pub async fn about(viewer: Viewer) -> Html<String> {
    let body = "<p>A hands-on STEM program where students design, build, code, and share their work at quarterly expos.</p>";
    render::page("About the Program", viewer.user.as_ref(), viewer.flash.as_ref(), body)
}
