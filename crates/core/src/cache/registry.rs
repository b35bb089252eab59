//! Named store registry.
//!
//! Stores are created lazily on first open and live until deleted by
//! name. All stores share the one registry database; a [`Store`] handle
//! is just the database handle paired with the store's name.

use super::connection::StoreDb;
use crate::Error;
use tokio_rusqlite::params;

/// Handle to one named store.
///
/// Cheap to clone. Two handles opened under the same name address the
/// same rows, so writes through one are immediately visible through the
/// other.
#[derive(Clone, Debug)]
pub struct Store {
    pub(crate) db: StoreDb,
    pub(crate) name: String,
}

impl Store {
    /// The store's registry name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl StoreDb {
    /// Open the store named `name`, creating it if absent.
    ///
    /// Idempotent: reopening an existing name leaves its entries alone
    /// and returns a handle to the same underlying store.
    pub async fn open_store(&self, name: &str) -> Result<Store, Error> {
        if name.is_empty() {
            return Err(Error::InvalidInput("store name cannot be empty".into()));
        }

        let owned = name.to_string();
        let created_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO stores (name, created_at) VALUES (?1, ?2)
                     ON CONFLICT(name) DO NOTHING",
                    params![owned, created_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;

        Ok(Store { db: self.clone(), name: name.to_string() })
    }

    /// Enumerate all store names, sorted.
    ///
    /// Includes stores that are currently empty; a store exists from the
    /// moment it is first opened.
    pub async fn store_names(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM stores ORDER BY name")?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                let mut names = Vec::new();
                for name in rows {
                    names.push(name?);
                }
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete the store named `name` and every entry it holds.
    ///
    /// Returns true if the store existed. Entry removal rides on the
    /// foreign-key cascade.
    pub async fn delete_store(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let deleted = conn.execute("DELETE FROM stores WHERE name = ?1", params![name])?;
                Ok(deleted > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Store names with their entry counts, sorted by name.
    pub async fn store_stats(&self) -> Result<Vec<(String, u64)>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<(String, u64)>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT s.name, COUNT(r.url)
                     FROM stores s LEFT JOIN responses r ON r.store = s.name
                     GROUP BY s.name ORDER BY s.name",
                )?;
                let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;
                let mut stats = Vec::new();
                for row in rows {
                    let (name, count) = row?;
                    stats.push((name, count as u64));
                }
                Ok(stats)
            })
            .await
            .map_err(Error::from)
    }
}
