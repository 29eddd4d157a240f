use crate::auth;
use crate::db::now_rfc3339;
use crate::models::{NewUser, Role, User};
use anyhow::Context;
use rusqlite::{Connection, OptionalExtension, Row};

const USER_COLUMNS: &str = "id, username, email, password_hash, role, first_name, last_name,
     grade_level, parent_email, tinkercad_username, created_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let role: String = row.get(4)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        // Unknown roles fall back to the column default.
        role: role.parse().unwrap_or(Role::Student),
        first_name: row.get(5)?,
        last_name: row.get(6)?,
        grade_level: row.get(7)?,
        parent_email: row.get(8)?,
        tinkercad_username: row.get(9)?,
        created_at: row.get(10)?,
    })
}

/// Fails when the username or email is already taken.
pub fn create_user(conn: &Connection, new: &NewUser) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO users(
            username, email, password_hash, role, first_name, last_name,
            grade_level, parent_email, tinkercad_username, created_at
         ) VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        (
            &new.username,
            &new.email,
            auth::hash_password(&new.password),
            new.role.as_str(),
            &new.first_name,
            &new.last_name,
            &new.grade_level,
            &new.parent_email,
            &new.tinkercad_username,
            now_rfc3339(),
        ),
    )
    .with_context(|| format!("failed to create user {}", new.username))?;
    Ok(conn.last_insert_rowid())
}

pub fn get_user(conn: &Connection, id: i64) -> anyhow::Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
    Ok(conn.query_row(&sql, [id], user_from_row).optional()?)
}

pub fn find_by_username(conn: &Connection, username: &str) -> anyhow::Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?");
    Ok(conn.query_row(&sql, [username], user_from_row).optional()?)
}

/// Returns the user only when the password matches. Unknown user and wrong
/// password are indistinguishable to the caller.
pub fn authenticate(
    conn: &Connection,
    username: &str,
    password: &str,
) -> anyhow::Result<Option<User>> {
    let user = find_by_username(conn, username)?;
    Ok(user.filter(|u| auth::verify_password(&u.password_hash, password)))
}

pub fn list_by_role(conn: &Connection, role: Role) -> anyhow::Result<Vec<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE role = ? ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([role.as_str()], user_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn count_by_role(conn: &Connection, role: Role) -> anyhow::Result<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM users WHERE role = ?",
        [role.as_str()],
        |r| r.get(0),
    )?)
}

pub fn delete_user(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let n = conn.execute("DELETE FROM users WHERE id = ?", [id])?;
    Ok(n > 0)
}
