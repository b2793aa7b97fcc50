use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, error, info, warn};

use crate::{
    config::Config,
    error::{StoreError, StoreResult},
    models::Session,
};

const TABLE_NAME: &str = "CodingSession";

const CREATE_TABLE_SQL: &str = "CREATE TABLE CodingSession (
    Id INTEGER PRIMARY KEY AUTOINCREMENT,
    SessionStart TEXT NOT NULL,
    SessionEnd TEXT NOT NULL,
    Duration TEXT NOT NULL
);";

/// Owner of the single sqlite connection.
///
/// Built once at startup and passed by reference to everything that reads or
/// writes sessions. `open` and `close` are both idempotent.
pub struct SessionStore {
    path: PathBuf,
    conn: Option<Connection>,
}

impl SessionStore {
    pub fn new(config: &Config) -> Self {
        SessionStore {
            path: config.database_path.clone(),
            conn: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensures the file and table exist and opens the connection.
    ///
    /// A live connection is reused. Failures here are fatal for the caller.
    pub fn open(&mut self) -> StoreResult<()> {
        if self.conn.is_some() {
            debug!(path = %self.path.display(), "Store already open");
            return Ok(());
        }

        ensure_database_file(&self.path)?;
        let conn = Connection::open(&self.path)?;
        if ensure_table(&conn)? {
            info!(path = %self.path.display(), table = TABLE_NAME, "Created session table");
        }
        self.conn = Some(conn);
        Ok(())
    }

    /// Inserts one session; `true` when exactly one row was written.
    ///
    /// Storage failures are logged, never returned.
    pub fn create(&self, session: &Session) -> bool {
        match self.insert(session) {
            Ok(rows) => rows == 1,
            Err(err) => {
                error!(error = %err, "Database error inserting session");
                false
            }
        }
    }

    /// Every stored session in storage order. Errors are logged and yield an
    /// empty list; use [`SessionStore::try_get_all`] to tell them apart.
    pub fn get_all(&self) -> Vec<Session> {
        self.try_get_all().unwrap_or_else(|err| {
            error!(error = %err, "Database error retrieving sessions");
            Vec::new()
        })
    }

    pub fn try_get_all(&self) -> StoreResult<Vec<Session>> {
        let conn = self.connection()?;
        let mut stmt =
            conn.prepare("SELECT Id, SessionStart, SessionEnd, Duration FROM CodingSession")?;

        let session_iter = stmt.query_map([], |row| {
            Ok(Session::from_row(
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
            ))
        })?;
        Ok(session_iter.collect::<Result<Vec<Session>, _>>()?)
    }

    /// Releases the connection. Safe to call on a closed store.
    pub fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err((_, err)) = conn.close() {
                warn!(error = %err, "Failed to close database connection cleanly");
            }
        }
    }

    fn insert(&self, session: &Session) -> StoreResult<usize> {
        let conn = self.connection()?;
        let rows = conn.execute(
            "INSERT INTO CodingSession (SessionStart, SessionEnd, Duration) VALUES (?1, ?2, ?3)",
            params![session.start(), session.end(), session.duration()],
        )?;
        Ok(rows)
    }

    fn connection(&self) -> StoreResult<&Connection> {
        self.conn.as_ref().ok_or(StoreError::NotInitialized)
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.close();
    }
}

fn ensure_database_file(path: &Path) -> std::io::Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().write(true).create(true).open(path)?;
    Ok(())
}

/// Creates the session table if the catalog does not list it.
/// Returns whether the table was created.
fn ensure_table(conn: &Connection) -> rusqlite::Result<bool> {
    let existing: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [TABLE_NAME],
            |row| row.get(0),
        )
        .optional()?;

    if existing.is_some() {
        return Ok(false);
    }
    conn.execute_batch(CREATE_TABLE_SQL)?;
    Ok(true)
}
