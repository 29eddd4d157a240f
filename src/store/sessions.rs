use crate::db::now_rfc3339;
use crate::models::User;
use crate::store::users;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

/// Sessions older than this no longer resolve and are pruned on the next login.
pub const SESSION_MAX_AGE_DAYS: i64 = 30;

fn expiry_cutoff() -> String {
    (chrono::Utc::now() - chrono::Duration::days(SESSION_MAX_AGE_DAYS))
        .to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

pub fn create_session(conn: &Connection, user_id: i64) -> anyhow::Result<String> {
    conn.execute(
        "DELETE FROM sessions WHERE created_at < ?",
        [expiry_cutoff()],
    )?;
    let token = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO sessions(token, user_id, created_at) VALUES(?, ?, ?)",
        (&token, user_id, now_rfc3339()),
    )?;
    Ok(token)
}

pub fn session_user(conn: &Connection, token: &str) -> anyhow::Result<Option<User>> {
    let user_id: Option<i64> = conn
        .query_row(
            "SELECT user_id FROM sessions WHERE token = ? AND created_at >= ?",
            (token, expiry_cutoff()),
            |r| r.get(0),
        )
        .optional()?;
    match user_id {
        Some(id) => users::get_user(conn, id),
        None => Ok(None),
    }
}

pub fn delete_session(conn: &Connection, token: &str) -> anyhow::Result<()> {
    conn.execute("DELETE FROM sessions WHERE token = ?", [token])?;
    Ok(())
}
