use crate::db::now_rfc3339;
use crate::models::{Expo, NewExpo, NewReflection, TeacherReflection};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row};

const EXPO_COLUMNS: &str =
    "id, title, quarter, date, description, focus_area, location, attendee_count";

const REFLECTION_COLUMNS: &str = "id, date, lesson_id, class_id, reflection_content,
     what_worked_well, challenges_faced, modifications_needed, student_engagement_level";

fn expo_from_row(row: &Row<'_>) -> rusqlite::Result<Expo> {
    Ok(Expo {
        id: row.get(0)?,
        title: row.get(1)?,
        quarter: row.get(2)?,
        date: row.get(3)?,
        description: row.get(4)?,
        focus_area: row.get(5)?,
        location: row.get(6)?,
        attendee_count: row.get(7)?,
    })
}

fn reflection_from_row(row: &Row<'_>) -> rusqlite::Result<TeacherReflection> {
    Ok(TeacherReflection {
        id: row.get(0)?,
        date: row.get(1)?,
        lesson_id: row.get(2)?,
        class_id: row.get(3)?,
        reflection_content: row.get(4)?,
        what_worked_well: row.get(5)?,
        challenges_faced: row.get(6)?,
        modifications_needed: row.get(7)?,
        student_engagement_level: row.get(8)?,
    })
}

/// `new.date` must be `YYYY-MM-DD`; it is normalised before storage so
/// string comparison orders dates correctly.
pub fn create_expo(conn: &Connection, new: &NewExpo) -> anyhow::Result<i64> {
    let date = NaiveDate::parse_from_str(new.date.trim(), "%Y-%m-%d")?;
    conn.execute(
        "INSERT INTO expos(
            title, quarter, date, description, focus_area, location, attendee_count, created_at
         ) VALUES(?, ?, ?, ?, ?, ?, ?, ?)",
        (
            &new.title,
            &new.quarter,
            date.format("%Y-%m-%d").to_string(),
            &new.description,
            &new.focus_area,
            &new.location,
            new.attendee_count,
            now_rfc3339(),
        ),
    )?;
    Ok(conn.last_insert_rowid())
}

/// Earliest expo dated on or after `today`.
pub fn upcoming_expo(conn: &Connection, today: NaiveDate) -> anyhow::Result<Option<Expo>> {
    let sql = format!(
        "SELECT {EXPO_COLUMNS} FROM expos WHERE date >= ? ORDER BY date, id LIMIT 1"
    );
    Ok(conn
        .query_row(&sql, [today.format("%Y-%m-%d").to_string()], expo_from_row)
        .optional()?)
}

pub fn list_expos(conn: &Connection) -> anyhow::Result<Vec<Expo>> {
    let sql = format!("SELECT {EXPO_COLUMNS} FROM expos ORDER BY date, id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], expo_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn create_reflection(conn: &Connection, new: &NewReflection) -> anyhow::Result<i64> {
    let date = NaiveDate::parse_from_str(new.date.trim(), "%Y-%m-%d")?;
    conn.execute(
        "INSERT INTO teacher_reflections(
            date, lesson_id, class_id, reflection_content, what_worked_well,
            challenges_faced, modifications_needed, student_engagement_level, created_at
         ) VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?)",
        (
            date.format("%Y-%m-%d").to_string(),
            new.lesson_id,
            new.class_id,
            &new.reflection_content,
            &new.what_worked_well,
            &new.challenges_faced,
            &new.modifications_needed,
            new.student_engagement_level,
            now_rfc3339(),
        ),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn recent_reflections(conn: &Connection, limit: i64) -> anyhow::Result<Vec<TeacherReflection>> {
    let sql = format!(
        "SELECT {REFLECTION_COLUMNS} FROM teacher_reflections ORDER BY date DESC, id DESC LIMIT ?"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([limit], reflection_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
