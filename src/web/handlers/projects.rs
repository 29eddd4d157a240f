use crate::models::{NewProject, Quarter, Role};
use crate::store::projects;
use crate::web::error::WebError;
use crate::web::form::FormFields;
use crate::web::notice::Notice;
use crate::web::render;
use crate::web::session::{self, LoginRequired, TeacherRequired};
use crate::web::types::SharedState;
use axum::extract::{Path, State};
use axum::response::{Html, Response};
use axum::{Form, Json};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write;

#[derive(Debug, Serialize)]
pub struct FeaturedToggled {
    pub success: bool,
    pub featured: bool,
    pub message: &'static str,
}

pub async fn create_project_page(current: LoginRequired) -> Html<String> {
    let mut quarter_options = String::new();
    for q in Quarter::ALL {
        let _ = write!(
            quarter_options,
            r#"<option value="{q}">{q}: {}</option>"#,
            render::escape(q.theme()),
            q = q.as_str()
        );
    }
    let grade_field = if current.user.role == Role::Student {
        String::new()
    } else {
        r#"<label>Grade level <input name="grade_level"></label>"#.to_string()
    };
    let body = format!(
        r#"<form method="post" action="/create-project">
<label>Title <input name="title" required></label>
<label>Description <textarea name="description"></textarea></label>
<label>Project type <input name="project_type"></label>
<label>Quarter <select name="quarter">{quarter_options}</select></label>
<label>Tinkercad link <input name="tinkercad_link"></label>
<label>Scratch link <input name="scratch_link"></label>
<label>Project URL <input name="project_url"></label>
{grade_field}
<label>Subject areas <input name="subject_areas"></label>
<label>Skills used <input name="skills_used"></label>
<label>Learning goals met <textarea name="learning_goals_met"></textarea></label>
<label><input type="checkbox" name="is_public" value="on"> Share publicly</label>
<label><input type="checkbox" name="expo_ready" value="on"> Ready for the expo</label>
<button type="submit">Create project</button>
</form>"#
    );
    render::page("Create Project", Some(&current.user), current.flash.as_ref(), &body)
}

pub async fn create_project(
    State(app): State<SharedState>,
    current: LoginRequired,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, WebError> {
    let fields = FormFields::from(fields);
    let is_student = current.user.role == Role::Student;
    let grade_level = if is_student {
        current.user.grade_level.clone().unwrap_or_default()
    } else {
        fields.optional("grade_level")
    };
    let new = NewProject {
        title: fields.required("title")?,
        description: fields.optional("description"),
        creator_id: current.user.id,
        project_type: fields.optional("project_type"),
        quarter: fields.optional_or("quarter", Quarter::Q1.as_str()),
        tinkercad_link: fields.optional("tinkercad_link"),
        scratch_link: fields.optional("scratch_link"),
        project_url: fields.optional("project_url"),
        grade_level,
        subject_areas: fields.optional("subject_areas"),
        skills_used: fields.optional("skills_used"),
        learning_goals_met: fields.optional("learning_goals_met"),
        is_public: fields.flag("is_public"),
        is_featured: false,
        expo_ready: fields.flag("expo_ready"),
    };
    let id = app.with_db(|conn| projects::create_project(conn, &new))?;
    tracing::info!(project_id = id, user_id = current.user.id, "project created");

    let to = if is_student {
        "/student-dashboard"
    } else {
        "/teacher-dashboard"
    };
    Ok(session::flash_redirect(to, Notice::ProjectCreated))
}

pub async fn toggle_featured(
    State(app): State<SharedState>,
    current: TeacherRequired,
    Path(id): Path<i64>,
) -> Result<Json<FeaturedToggled>, WebError> {
    let featured = app
        .with_db(|conn| projects::toggle_featured(conn, id))?
        .ok_or(WebError::NotFound)?;
    tracing::info!(project_id = id, featured, user_id = current.user.id, "featured flag toggled");
    Ok(Json(FeaturedToggled {
        success: true,
        featured,
        message: if featured {
            "Project featured successfully"
        } else {
            "Project unfeatured successfully"
        },
    }))
}
