use crate::models::{NewReflection, ProgressPatch};
use crate::store::{classes, expos, progress, users};
use crate::web::error::WebError;
use crate::web::form::FormFields;
use crate::web::notice::Notice;
use crate::web::session::{self, TeacherRequired};
use crate::web::types::SharedState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Response;
use axum::{Form, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct UpdateProgressRequest {
    pub student_id: i64,
    pub lesson_id: i64,
    pub class_id: i64,
    #[serde(flatten)]
    pub patch: ProgressPatch,
}

#[derive(Debug, Serialize)]
pub struct ApiAck {
    pub success: bool,
    pub message: &'static str,
}

pub async fn update_progress(
    State(app): State<SharedState>,
    current: TeacherRequired,
    body: Result<Json<UpdateProgressRequest>, JsonRejection>,
) -> Result<Json<ApiAck>, WebError> {
    let Json(req) = body.map_err(|e| WebError::bad_request(e.body_text()))?;
    let row = app.with_db(|conn| {
        let existing = progress::find_progress(conn, req.student_id, req.lesson_id)?.is_some();
        // class_id is only written when the row is created
        let known = users::get_user(conn, req.student_id)?.is_some()
            && classes::get_lesson(conn, req.lesson_id)?.is_some()
            && (existing || classes::get_class(conn, req.class_id)?.is_some());
        if !known {
            return Ok(None);
        }
        progress::upsert_progress(conn, req.student_id, req.lesson_id, req.class_id, &req.patch)
            .map(Some)
    })?;
    let row = row.ok_or_else(|| {
        WebError::bad_request(format!(
            "unknown student {}, lesson {} or class {}",
            req.student_id, req.lesson_id, req.class_id
        ))
    })?;
    tracing::info!(
        progress_id = row.id,
        student_id = row.student_id,
        lesson_id = row.lesson_id,
        status = %row.status,
        user_id = current.user.id,
        "progress updated"
    );
    Ok(Json(ApiAck {
        success: true,
        message: "Progress updated successfully",
    }))
}

pub(crate) fn parse_date(fields: &FormFields, name: &str) -> Result<String, WebError> {
    let raw = fields.required(name)?;
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| WebError::bad_request(format!("form field {name} is not a YYYY-MM-DD date")))
}

pub async fn create_reflection(
    State(app): State<SharedState>,
    current: TeacherRequired,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, WebError> {
    let fields = FormFields::from(fields);
    let new = NewReflection {
        date: parse_date(&fields, "date")?,
        lesson_id: fields.optional_i64("lesson_id")?,
        class_id: fields.optional_i64("class_id")?,
        reflection_content: fields.required("reflection_content")?,
        what_worked_well: fields.optional("what_worked_well"),
        challenges_faced: fields.optional("challenges_faced"),
        modifications_needed: fields.optional("modifications_needed"),
        student_engagement_level: fields.optional_i64("student_engagement_level")?,
    };
    let id = app.with_db(|conn| expos::create_reflection(conn, &new))?;
    tracing::info!(reflection_id = id, user_id = current.user.id, "reflection recorded");
    Ok(session::flash_redirect("/teacher-dashboard", Notice::ReflectionSaved))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_splits_ids_from_patch() {
        let req: UpdateProgressRequest = serde_json::from_value(serde_json::json!({
            "student_id": 3,
            "lesson_id": 7,
            "class_id": 1,
            "status": "completed",
            "shared_publicly": true,
        }))
        .unwrap();
        assert_eq!((req.student_id, req.lesson_id, req.class_id), (3, 7, 1));
        assert_eq!(req.patch.status.as_deref(), Some("completed"));
        assert_eq!(req.patch.shared_publicly, Some(true));
        assert!(req.patch.completion_percentage.is_none());
        assert!(req.patch.notes.is_none());
    }

    #[test]
    fn ack_serialises_to_api_shape() {
        let ack = ApiAck {
            success: true,
            message: "Progress updated successfully",
        };
        assert_eq!(
            serde_json::to_value(&ack).unwrap(),
            serde_json::json!({"success": true, "message": "Progress updated successfully"})
        );
    }
}
