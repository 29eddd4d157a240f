use crate::db::now_rfc3339;
use crate::models::{LessonPlan, NewClass, NewLesson, StemClass};
use anyhow::Context;
use rusqlite::{Connection, OptionalExtension, Row};

const CLASS_COLUMNS: &str =
    "id, class_name, teacher_first_name, grade_level, tinkercad_class_link, description, created_at";

const LESSON_COLUMNS: &str = "id, title, class_id, subject_area, quarter, duration_minutes,
     learning_objectives, materials_needed, lesson_content, assessment_method,
     standards_alignment, difficulty_level, created_at, updated_at";

fn class_from_row(row: &Row<'_>) -> rusqlite::Result<StemClass> {
    Ok(StemClass {
        id: row.get(0)?,
        class_name: row.get(1)?,
        teacher_first_name: row.get(2)?,
        grade_level: row.get(3)?,
        tinkercad_class_link: row.get(4)?,
        description: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn lesson_from_row(row: &Row<'_>) -> rusqlite::Result<LessonPlan> {
    Ok(LessonPlan {
        id: row.get(0)?,
        title: row.get(1)?,
        class_id: row.get(2)?,
        subject_area: row.get(3)?,
        quarter: row.get(4)?,
        duration_minutes: row.get(5)?,
        learning_objectives: row.get(6)?,
        materials_needed: row.get(7)?,
        lesson_content: row.get(8)?,
        assessment_method: row.get(9)?,
        standards_alignment: row.get(10)?,
        difficulty_level: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

pub fn create_class(conn: &Connection, new: &NewClass) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO stem_classes(
            class_name, teacher_first_name, grade_level, tinkercad_class_link,
            description, created_at
         ) VALUES(?, ?, ?, ?, ?, ?)",
        (
            &new.class_name,
            &new.teacher_first_name,
            &new.grade_level,
            &new.tinkercad_class_link,
            &new.description,
            now_rfc3339(),
        ),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_class(conn: &Connection, id: i64) -> anyhow::Result<Option<StemClass>> {
    let sql = format!("SELECT {CLASS_COLUMNS} FROM stem_classes WHERE id = ?");
    Ok(conn.query_row(&sql, [id], class_from_row).optional()?)
}

pub fn list_classes(conn: &Connection) -> anyhow::Result<Vec<StemClass>> {
    let sql = format!("SELECT {CLASS_COLUMNS} FROM stem_classes ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], class_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn count_classes(conn: &Connection) -> anyhow::Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM stem_classes", [], |r| r.get(0))?)
}

/// Deletes a class and its lesson plans. Progress rows pointing at the class
/// or its lessons go too; reflections keep their text but lose the link.
pub fn delete_class(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    if get_class(conn, id)?.is_none() {
        return Ok(false);
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "DELETE FROM student_progress
         WHERE class_id = ?1
            OR lesson_id IN (SELECT id FROM lesson_plans WHERE class_id = ?1)",
        [id],
    )
    .context("delete student_progress")?;
    tx.execute(
        "UPDATE teacher_reflections SET lesson_id = NULL
         WHERE lesson_id IN (SELECT id FROM lesson_plans WHERE class_id = ?)",
        [id],
    )
    .context("unlink reflection lessons")?;
    tx.execute(
        "UPDATE teacher_reflections SET class_id = NULL WHERE class_id = ?",
        [id],
    )
    .context("unlink reflection classes")?;
    // lesson_plans cascade
    tx.execute("DELETE FROM stem_classes WHERE id = ?", [id])
        .context("delete stem_classes")?;
    tx.commit()?;
    Ok(true)
}

/// Fails when `class_id` does not reference an existing class.
pub fn create_lesson(conn: &Connection, new: &NewLesson) -> anyhow::Result<i64> {
    let now = now_rfc3339();
    conn.execute(
        "INSERT INTO lesson_plans(
            title, class_id, subject_area, quarter, duration_minutes,
            learning_objectives, materials_needed, lesson_content, assessment_method,
            standards_alignment, difficulty_level, created_at, updated_at
         ) VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        (
            &new.title,
            new.class_id,
            &new.subject_area,
            &new.quarter,
            new.duration_minutes,
            &new.learning_objectives,
            &new.materials_needed,
            &new.lesson_content,
            &new.assessment_method,
            &new.standards_alignment,
            &new.difficulty_level,
            &now,
            &now,
        ),
    )
    .with_context(|| format!("failed to create lesson for class {}", new.class_id))?;
    Ok(conn.last_insert_rowid())
}

pub fn get_lesson(conn: &Connection, id: i64) -> anyhow::Result<Option<LessonPlan>> {
    let sql = format!("SELECT {LESSON_COLUMNS} FROM lesson_plans WHERE id = ?");
    Ok(conn.query_row(&sql, [id], lesson_from_row).optional()?)
}

/// Newest first.
pub fn list_lessons(conn: &Connection) -> anyhow::Result<Vec<LessonPlan>> {
    let sql = format!("SELECT {LESSON_COLUMNS} FROM lesson_plans ORDER BY created_at DESC, id DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], lesson_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn count_lessons(conn: &Connection) -> anyhow::Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM lesson_plans", [], |r| r.get(0))?)
}
