use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::debug;

use crate::error::{DbError, Result};

pub const CATALOG_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Runs every pending embedded migration, returning how many were applied.
pub fn apply_migrations(conn: &mut SqliteConnection) -> Result<usize> {
    let applied = conn
        .run_pending_migrations(CATALOG_MIGRATIONS)
        .map_err(|e| DbError::MigrationError(e.to_string()))?;

    for version in &applied {
        debug!(version = %version, "applied catalog migration");
    }

    Ok(applied.len())
}
