use crate::db::now_rfc3339;
use crate::models::{NewProject, Project};
use rusqlite::{Connection, OptionalExtension, Row};

const PROJECT_COLUMNS: &str = "id, title, description, creator_id, project_type, quarter,
     tinkercad_link, scratch_link, project_url, grade_level, subject_areas, skills_used,
     learning_goals_met, is_public, is_featured, expo_ready, created_at, updated_at";

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        creator_id: row.get(3)?,
        project_type: row.get(4)?,
        quarter: row.get(5)?,
        tinkercad_link: row.get(6)?,
        scratch_link: row.get(7)?,
        project_url: row.get(8)?,
        grade_level: row.get(9)?,
        subject_areas: row.get(10)?,
        skills_used: row.get(11)?,
        learning_goals_met: row.get(12)?,
        is_public: row.get(13)?,
        is_featured: row.get(14)?,
        expo_ready: row.get(15)?,
        created_at: row.get(16)?,
        updated_at: row.get(17)?,
    })
}

fn query_projects(
    conn: &Connection,
    where_and_order: &str,
    params: impl rusqlite::Params,
) -> anyhow::Result<Vec<Project>> {
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects {where_and_order}");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params, project_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn create_project(conn: &Connection, new: &NewProject) -> anyhow::Result<i64> {
    let now = now_rfc3339();
    conn.execute(
        "INSERT INTO projects(
            title, description, creator_id, project_type, quarter, tinkercad_link,
            scratch_link, project_url, grade_level, subject_areas, skills_used,
            learning_goals_met, is_public, is_featured, expo_ready, created_at, updated_at
         ) VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        rusqlite::params![
            &new.title,
            &new.description,
            new.creator_id,
            &new.project_type,
            &new.quarter,
            &new.tinkercad_link,
            &new.scratch_link,
            &new.project_url,
            &new.grade_level,
            &new.subject_areas,
            &new.skills_used,
            &new.learning_goals_met,
            new.is_public,
            new.is_featured,
            new.expo_ready,
            &now,
            &now,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_project(conn: &Connection, id: i64) -> anyhow::Result<Option<Project>> {
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?");
    Ok(conn.query_row(&sql, [id], project_from_row).optional()?)
}

/// Homepage feature strip: public and featured only.
pub fn featured_public(conn: &Connection, limit: i64) -> anyhow::Result<Vec<Project>> {
    query_projects(
        conn,
        "WHERE is_featured = 1 AND is_public = 1 ORDER BY id LIMIT ?",
        [limit],
    )
}

pub fn recent_public(conn: &Connection, limit: i64) -> anyhow::Result<Vec<Project>> {
    query_projects(
        conn,
        "WHERE is_public = 1 ORDER BY created_at DESC, id DESC LIMIT ?",
        [limit],
    )
}

pub fn public_by_quarter(conn: &Connection, quarter: &str) -> anyhow::Result<Vec<Project>> {
    query_projects(conn, "WHERE quarter = ? AND is_public = 1 ORDER BY id", [quarter])
}

pub fn list_by_creator(conn: &Connection, creator_id: i64) -> anyhow::Result<Vec<Project>> {
    query_projects(conn, "WHERE creator_id = ? ORDER BY id", [creator_id])
}

pub fn recently_updated(conn: &Connection, limit: i64) -> anyhow::Result<Vec<Project>> {
    query_projects(conn, "ORDER BY updated_at DESC, id DESC LIMIT ?", [limit])
}

pub fn count_all(conn: &Connection) -> anyhow::Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM projects", [], |r| r.get(0))?)
}

pub fn count_public(conn: &Connection) -> anyhow::Result<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM projects WHERE is_public = 1",
        [],
        |r| r.get(0),
    )?)
}

/// Flips `is_featured` in one statement and returns the new value, or `None`
/// when the project does not exist.
pub fn toggle_featured(conn: &Connection, id: i64) -> anyhow::Result<Option<bool>> {
    let featured: Option<bool> = conn
        .query_row(
            "UPDATE projects SET is_featured = NOT is_featured, updated_at = ?
             WHERE id = ? RETURNING is_featured",
            (now_rfc3339(), id),
            |r| r.get(0),
        )
        .optional()?;
    Ok(featured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::Role;
    use crate::store::fixtures::{new_user, sample_project};
    use crate::store::users;

    #[test]
    fn featured_list_is_public_and_featured_only() {
        let conn = db::open_in_memory().unwrap();
        let uid = users::create_user(&conn, &new_user("emma_k", Role::Student)).unwrap();
        for (public, featured) in [(true, true), (true, false), (false, true), (false, false)] {
            create_project(&conn, &sample_project(uid, public, featured)).unwrap();
        }

        let featured = featured_public(&conn, 6).unwrap();
        assert_eq!(featured.len(), 1);
        assert!(featured.iter().all(|p| p.is_public && p.is_featured));
        assert_eq!(count_public(&conn).unwrap(), 2);
        assert_eq!(count_all(&conn).unwrap(), 4);
    }

    #[test]
    fn toggle_featured_flips_and_reports() {
        let conn = db::open_in_memory().unwrap();
        let uid = users::create_user(&conn, &new_user("emma_k", Role::Student)).unwrap();
        let pid = create_project(&conn, &sample_project(uid, true, false)).unwrap();

        assert_eq!(toggle_featured(&conn, pid).unwrap(), Some(true));
        assert_eq!(toggle_featured(&conn, pid).unwrap(), Some(false));
        assert_eq!(toggle_featured(&conn, pid + 100).unwrap(), None);
        assert!(!get_project(&conn, pid).unwrap().unwrap().is_featured);
    }

    #[test]
    fn quarter_filter_hides_private_projects() {
        let conn = db::open_in_memory().unwrap();
        let uid = users::create_user(&conn, &new_user("emma_k", Role::Student)).unwrap();
        create_project(&conn, &sample_project(uid, true, false)).unwrap();
        create_project(&conn, &sample_project(uid, false, false)).unwrap();
        assert_eq!(public_by_quarter(&conn, "Q1").unwrap().len(), 1);
        assert!(public_by_quarter(&conn, "Q2").unwrap().is_empty());
        assert_eq!(list_by_creator(&conn, uid).unwrap().len(), 2);
    }
}
