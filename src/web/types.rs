use super::error::WebError;
use anyhow::anyhow;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Service object handed to every handler. Owns the only database handle.
pub struct AppState {
    db: Mutex<Connection>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(conn: Connection) -> SharedState {
        Arc::new(AppState {
            db: Mutex::new(conn),
        })
    }

    /// Runs `f` with exclusive access to the connection. The lock is released
    /// before this returns, so callers may `.await` afterwards.
    pub fn with_db<T>(
        &self,
        f: impl FnOnce(&Connection) -> anyhow::Result<T>,
    ) -> Result<T, WebError> {
        let conn = self
            .db
            .lock()
            .map_err(|_| anyhow!("database mutex poisoned"))?;
        Ok(f(&conn)?)
    }
}
