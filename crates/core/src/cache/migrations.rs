//! Schema migrations for the store database.
//!
//! Applied versions are recorded in a `_migrations` table; on open, every
//! migration newer than the recorded maximum runs inside the same
//! connection call. Each step is a plain SQL batch shipped with the crate.

use super::Error;
use tokio_rusqlite::{Connection, params};

/// Ordered migration steps. Versions are monotonically increasing and a
/// step never changes once released; schema changes get a new entry.
const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../../migrations/001_stores.sql"))];

/// Bring the schema up to date, applying any steps newer than the
/// recorded version.
///
/// # Errors
///
/// Returns an error if a migration batch fails to execute.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            )",
        )
        .map_err(Error::from)?;

        let applied: i64 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| {
                row.get(0)
            })
            .map_err(Error::from)?;

        for (version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > applied) {
            tracing::debug!("applying schema migration {}", version);
            conn.execute_batch(sql)?;
            conn.execute(
                "INSERT INTO _migrations (version, applied_at) VALUES (?1, ?2)",
                params![version, chrono::Utc::now().to_rfc3339()],
            )
            .map_err(Error::from)?;
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}
