//! Database connection management.
//!
//! The catalog lives in a single SQLite file holding base entities and
//! their published revisions. Opening a connection always brings the schema
//! up to date.

use std::path::Path;

use diesel::{sql_query, Connection, RunQueryDsl, SqliteConnection};
use tracing::debug;

use crate::{error::Result, migration::apply_migrations};

/// Database connection wrapper with migration support.
pub struct DbConnection {
    conn: SqliteConnection,
}

impl DbConnection {
    /// Opens a database connection and runs migrations.
    ///
    /// Parent directories of `path` are not created here.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails or migrations fail.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy();
        let mut conn = SqliteConnection::establish(&path_str)?;

        // WAL mode for concurrent readers
        sql_query("PRAGMA journal_mode = WAL;").execute(&mut conn)?;

        Self::prepare(conn, &path_str)
    }

    /// Opens a private in-memory catalog, used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = SqliteConnection::establish(":memory:")?;
        Self::prepare(conn, ":memory:")
    }

    fn prepare(mut conn: SqliteConnection, location: &str) -> Result<Self> {
        sql_query("PRAGMA foreign_keys = ON;").execute(&mut conn)?;

        let applied = apply_migrations(&mut conn)?;
        debug!(location = location, applied = applied, "catalog database ready");

        Ok(Self { conn })
    }

    /// Gets a mutable reference to the underlying connection.
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }
}

impl std::ops::Deref for DbConnection {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl std::ops::DerefMut for DbConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}
