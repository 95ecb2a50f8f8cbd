//! Database connection management.

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use charmstore_db::connection::DbConnection;
use diesel::{Connection as DieselConnection, SqliteConnection};

use crate::{error::CatalogError, CatalogResult};

/// Thread-safe handle to the catalog database.
pub struct DieselDatabase {
    conn: Arc<Mutex<DbConnection>>,
}

impl DieselDatabase {
    /// Opens the catalog database, creating parent directories and running
    /// migrations.
    pub fn open<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|err| {
                    CatalogError::IoError {
                        action: format!("creating database directory {}", parent.display()),
                        source: err,
                    }
                })?;
            }
        }

        let conn = DbConnection::open(path)?;
        Ok(Self::from_connection(conn))
    }

    /// Opens a private in-memory catalog.
    pub fn open_in_memory() -> CatalogResult<Self> {
        let conn = DbConnection::open_in_memory()?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: DbConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Locks the connection and returns the guard.
    pub fn conn(&self) -> CatalogResult<MutexGuard<'_, DbConnection>> {
        self.conn.lock().map_err(|_| CatalogError::PoisonError)
    }

    /// Executes a function with the connection.
    pub fn with_conn<F, T>(&self, f: F) -> CatalogResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> diesel::QueryResult<T>,
    {
        let mut conn = self.conn()?;
        Ok(f(conn.conn())?)
    }

    /// Executes a function within a transaction, rolling back on any error.
    pub fn transaction<F, T>(&self, f: F) -> CatalogResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> CatalogResult<T>,
    {
        let mut conn = self.conn()?;
        conn.conn().transaction(f)
    }
}

impl Clone for DieselDatabase {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}
