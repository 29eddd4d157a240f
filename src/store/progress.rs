use crate::db::now_rfc3339;
use crate::models::{ProgressPatch, StudentProgress};
use rusqlite::{Connection, OptionalExtension, Row};

const PROGRESS_COLUMNS: &str = "id, student_id, lesson_id, class_id, status, completion_percentage,
     time_spent_minutes, skill_demonstration, notes, teacher_feedback, shared_publicly,
     showcase_ready, started_at, completed_at, last_updated";

fn progress_from_row(row: &Row<'_>) -> rusqlite::Result<StudentProgress> {
    Ok(StudentProgress {
        id: row.get(0)?,
        student_id: row.get(1)?,
        lesson_id: row.get(2)?,
        class_id: row.get(3)?,
        status: row.get(4)?,
        completion_percentage: row.get(5)?,
        time_spent_minutes: row.get(6)?,
        skill_demonstration: row.get(7)?,
        notes: row.get(8)?,
        teacher_feedback: row.get(9)?,
        shared_publicly: row.get(10)?,
        showcase_ready: row.get(11)?,
        started_at: row.get(12)?,
        completed_at: row.get(13)?,
        last_updated: row.get(14)?,
    })
}

/// Lowest id wins when the same (student, lesson) pair was stored twice.
pub fn find_progress(
    conn: &Connection,
    student_id: i64,
    lesson_id: i64,
) -> anyhow::Result<Option<StudentProgress>> {
    let sql = format!(
        "SELECT {PROGRESS_COLUMNS} FROM student_progress
         WHERE student_id = ? AND lesson_id = ?
         ORDER BY id LIMIT 1"
    );
    Ok(conn
        .query_row(&sql, [student_id, lesson_id], progress_from_row)
        .optional()?)
}

/// Plain insert with column defaults; no check for an existing pair.
pub fn insert_progress(
    conn: &Connection,
    student_id: i64,
    lesson_id: i64,
    class_id: i64,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO student_progress(student_id, lesson_id, class_id, last_updated)
         VALUES(?, ?, ?, ?)",
        (student_id, lesson_id, class_id, now_rfc3339()),
    )?;
    Ok(conn.last_insert_rowid())
}

/// Find-or-create the row for (student, lesson) and merge `patch` into it.
/// `class_id` is only used when the row has to be created.
pub fn upsert_progress(
    conn: &Connection,
    student_id: i64,
    lesson_id: i64,
    class_id: i64,
    patch: &ProgressPatch,
) -> anyhow::Result<StudentProgress> {
    let tx = conn.unchecked_transaction()?;

    let mut row = match find_progress(&tx, student_id, lesson_id)? {
        Some(r) => r,
        None => {
            let id = insert_progress(&tx, student_id, lesson_id, class_id)?;
            let sql = format!("SELECT {PROGRESS_COLUMNS} FROM student_progress WHERE id = ?");
            tx.query_row(&sql, [id], progress_from_row)?
        }
    };

    patch.apply(&mut row, &now_rfc3339());

    tx.execute(
        "UPDATE student_progress SET
            status = ?, completion_percentage = ?, skill_demonstration = ?, notes = ?,
            teacher_feedback = ?, shared_publicly = ?, showcase_ready = ?, started_at = ?,
            completed_at = ?, last_updated = ?
         WHERE id = ?",
        (
            &row.status,
            row.completion_percentage,
            &row.skill_demonstration,
            &row.notes,
            &row.teacher_feedback,
            row.shared_publicly,
            row.showcase_ready,
            &row.started_at,
            &row.completed_at,
            &row.last_updated,
            row.id,
        ),
    )?;
    tx.commit()?;
    Ok(row)
}

pub fn list_for_student(conn: &Connection, student_id: i64) -> anyhow::Result<Vec<StudentProgress>> {
    let sql = format!("SELECT {PROGRESS_COLUMNS} FROM student_progress WHERE student_id = ? ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([student_id], progress_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn recent_progress(conn: &Connection, limit: i64) -> anyhow::Result<Vec<StudentProgress>> {
    let sql = format!(
        "SELECT {PROGRESS_COLUMNS} FROM student_progress
         ORDER BY last_updated DESC, id DESC LIMIT ?"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([limit], progress_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
