use crate::models::{ProgressStatus, Role, StemClass, StudentProgress, User};
use crate::store::{classes, progress, projects, users};
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ProgressSummary {
    pub completed_lessons: usize,
    pub total_lessons: usize,
    pub avg_completion: f64,
}

impl ProgressSummary {
    pub fn from_rows(rows: &[StudentProgress]) -> Self {
        let completed_lessons = rows
            .iter()
            .filter(|p| p.status.parse::<ProgressStatus>().ok() == Some(ProgressStatus::Completed))
            .count();
        let avg_completion = if rows.is_empty() {
            0.0
        } else {
            let sum: i64 = rows.iter().map(|p| p.completion_percentage).sum();
            round1(sum as f64 / rows.len() as f64)
        };
        ProgressSummary {
            completed_lessons,
            total_lessons: rows.len(),
            avg_completion,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassPerformance {
    pub class: StemClass,
    pub student_count: i64,
    pub avg_completion: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeacherOverview {
    pub total_students: i64,
    pub total_classes: i64,
    pub total_lessons: i64,
    pub total_projects: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentProgressLine {
    pub student: User,
    pub summary: ProgressSummary,
    pub recent_activity: Option<String>,
}

pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub fn teacher_overview(conn: &Connection) -> anyhow::Result<TeacherOverview> {
    Ok(TeacherOverview {
        total_students: users::count_by_role(conn, Role::Student)?,
        total_classes: classes::count_classes(conn)?,
        total_lessons: classes::count_lessons(conn)?,
        total_projects: projects::count_all(conn)?,
    })
}

/// Distinct students with progress in each class and their mean completion.
pub fn class_performance(conn: &Connection) -> anyhow::Result<Vec<ClassPerformance>> {
    let mut stmt = conn.prepare(
        "SELECT
           (SELECT COUNT(DISTINCT p.student_id) FROM student_progress p WHERE p.class_id = ?1),
           (SELECT AVG(COALESCE(p.completion_percentage, 0)) FROM student_progress p WHERE p.class_id = ?1)",
    )?;
    let mut out = Vec::new();
    for class in classes::list_classes(conn)? {
        let (student_count, avg): (i64, Option<f64>) =
            stmt.query_row([class.id], |r| Ok((r.get(0)?, r.get(1)?)))?;
        out.push(ClassPerformance {
            class,
            student_count,
            avg_completion: round1(avg.unwrap_or(0.0)),
        });
    }
    Ok(out)
}

pub fn student_progress_lines(conn: &Connection) -> anyhow::Result<Vec<StudentProgressLine>> {
    let mut out = Vec::new();
    for student in users::list_by_role(conn, Role::Student)? {
        let rows = progress::list_for_student(conn, student.id)?;
        let recent_activity = rows.iter().map(|p| p.last_updated.clone()).max();
        out.push(StudentProgressLine {
            summary: ProgressSummary::from_rows(&rows),
            student,
            recent_activity,
        });
    }
    Ok(out)
}
