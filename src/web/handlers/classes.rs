use crate::models::{NewClass, NewLesson, Quarter};
use crate::store::classes;
use crate::web::error::WebError;
use crate::web::form::FormFields;
use crate::web::notice::Notice;
use crate::web::render::{self, escape, opt};
use crate::web::session::{self, TeacherRequired};
use crate::web::types::SharedState;
use axum::extract::State;
use axum::response::{Html, Response};
use axum::Form;
use std::collections::HashMap;
use std::fmt::Write;

pub async fn manage_classes(
    State(app): State<SharedState>,
    current: TeacherRequired,
) -> Result<Html<String>, WebError> {
    let all = app.with_db(classes::list_classes)?;
    let mut body = String::from(r#"<p><a href="/create-class">New class</a></p>"#);
    body.push_str(&render::list(
        all.iter().map(|c| {
            format!(
                r#"<span class="class" data-id="{}">{}</span> with {} ({})"#,
                c.id,
                escape(&c.class_name),
                escape(&c.teacher_first_name),
                escape(&c.grade_level)
            )
        }),
        "No classes yet.",
    ));
    Ok(render::page(
        "Manage Classes",
        Some(&current.user),
        current.flash.as_ref(),
        &body,
    ))
}

pub async fn create_class_page(current: TeacherRequired) -> Html<String> {
    let body = r#"<form method="post" action="/create-class">
<label>Class name <input name="class_name" required></label>
<label>Teacher first name <input name="teacher_first_name" required></label>
<label>Grade level <input name="grade_level" required></label>
<label>Tinkercad class link <input name="tinkercad_class_link"></label>
<label>Description <textarea name="description"></textarea></label>
<button type="submit">Create class</button>
</form>"#;
    render::page("Create Class", Some(&current.user), current.flash.as_ref(), body)
}

pub async fn create_class(
    State(app): State<SharedState>,
    current: TeacherRequired,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, WebError> {
    let fields = FormFields::from(fields);
    let new = NewClass {
        class_name: fields.required("class_name")?,
        teacher_first_name: fields.required("teacher_first_name")?,
        grade_level: fields.required("grade_level")?,
        tinkercad_class_link: fields.optional("tinkercad_class_link"),
        description: fields.optional("description"),
    };
    let id = app.with_db(|conn| classes::create_class(conn, &new))?;
    tracing::info!(class_id = id, user_id = current.user.id, "class created");
    Ok(session::flash_redirect("/manage-classes", Notice::ClassCreated))
}

pub async fn manage_lessons(
    State(app): State<SharedState>,
    current: TeacherRequired,
) -> Result<Html<String>, WebError> {
    let all = app.with_db(classes::list_lessons)?;
    let mut body = String::from(r#"<p><a href="/create-lesson">New lesson plan</a></p>"#);
    body.push_str(&render::list(
        all.iter().map(|l| {
            format!(
                r#"<span class="lesson" data-id="{}">{}</span> {} {} min"#,
                l.id,
                escape(&l.title),
                opt(&l.quarter),
                l.duration_minutes.unwrap_or_default()
            )
        }),
        "No lesson plans yet.",
    ));
    Ok(render::page(
        "Manage Lessons",
        Some(&current.user),
        current.flash.as_ref(),
        &body,
    ))
}

pub async fn create_lesson_page(
    State(app): State<SharedState>,
    current: TeacherRequired,
) -> Result<Html<String>, WebError> {
    let all = app.with_db(classes::list_classes)?;
    let mut class_options = String::new();
    for c in &all {
        let _ = write!(
            class_options,
            r#"<option value="{}">{}</option>"#,
            c.id,
            escape(&c.class_name)
        );
    }
    let mut quarter_options = String::new();
    for q in Quarter::ALL {
        let _ = write!(
            quarter_options,
            r#"<option value="{q}">{q}: {}</option>"#,
            escape(q.theme()),
            q = q.as_str()
        );
    }
    let body = format!(
        r#"<form method="post" action="/create-lesson">
<label>Title <input name="title" required></label>
<label>Class <select name="class_id">{class_options}</select></label>
<label>Subject area <input name="subject_area"></label>
<label>Quarter <select name="quarter">{quarter_options}</select></label>
<label>Duration (minutes) <input name="duration_minutes" type="number" required></label>
<label>Learning objectives <textarea name="learning_objectives"></textarea></label>
<label>Materials needed <textarea name="materials_needed"></textarea></label>
<label>Lesson content <textarea name="lesson_content"></textarea></label>
<label>Assessment method <input name="assessment_method"></label>
<label>Standards alignment <input name="standards_alignment"></label>
<label>Difficulty level <input name="difficulty_level"></label>
<button type="submit">Create lesson plan</button>
</form>"#
    );
    Ok(render::page(
        "Create Lesson Plan",
        Some(&current.user),
        current.flash.as_ref(),
        &body,
    ))
}

pub async fn create_lesson(
    State(app): State<SharedState>,
    current: TeacherRequired,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, WebError> {
    let fields = FormFields::from(fields);
    let new = NewLesson {
        title: fields.required("title")?,
        class_id: fields.required_i64("class_id")?,
        subject_area: fields.optional("subject_area"),
        quarter: fields.optional_or("quarter", Quarter::Q1.as_str()),
        duration_minutes: fields.required_i64("duration_minutes")?,
        learning_objectives: fields.optional("learning_objectives"),
        materials_needed: fields.optional("materials_needed"),
        lesson_content: fields.optional("lesson_content"),
        assessment_method: fields.optional("assessment_method"),
        standards_alignment: fields.optional("standards_alignment"),
        difficulty_level: fields.optional("difficulty_level"),
    };
    let id = app.with_db(|conn| {
        if classes::get_class(conn, new.class_id)?.is_none() {
            return Ok(None);
        }
        classes::create_lesson(conn, &new).map(Some)
    })?;
    let Some(id) = id else {
        return Err(WebError::bad_request(format!(
            "class {} does not exist",
            new.class_id
        )));
    };
    tracing::info!(lesson_id = id, user_id = current.user.id, "lesson plan created");
    Ok(session::flash_redirect("/manage-lessons", Notice::LessonCreated))
}
