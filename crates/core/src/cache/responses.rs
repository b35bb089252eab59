//! Store entry operations.
//!
//! Provides lookup, write, enumeration, and deletion of stored responses
//! within one named store, plus the key and response types themselves.

use super::registry::Store;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// Canonical identity of an outbound request: method plus canonical URL.
///
/// Callers are expected to canonicalize the URL before building a key so
/// that lookups and eviction comparisons agree on one spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestKey {
    method: String,
    url: String,
}

impl RequestKey {
    pub fn new(method: &str, url: &str) -> Self {
        Self { method: method.to_uppercase(), url: url.to_string() }
    }

    /// Key for a GET of `url`, the only method the page issues.
    pub fn get(url: &str) -> Self {
        Self::new("GET", url)
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl std::fmt::Display for RequestKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// An immutable snapshot of a network response captured at write time.
///
/// Once stored it is only ever replaced wholesale or deleted, never
/// mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResponse {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub fetched_at: String,
}

impl StoredResponse {
    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl Store {
    /// Look up the stored response for `key`.
    ///
    /// Returns None if this store has no entry for the key.
    pub async fn match_request(&self, key: &RequestKey) -> Result<Option<StoredResponse>, Error> {
        let store = self.name.clone();
        let method = key.method().to_string();
        let url = key.url().to_string();
        self.db
            .conn
            .call(move |conn| -> Result<Option<StoredResponse>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT url, status, content_type, headers_json, body, fetched_at
                     FROM responses WHERE store = ?1 AND method = ?2 AND url = ?3",
                )?;

                let result = stmt.query_row(params![store, method, url], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, Vec<u8>>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                });

                match result {
                    Ok((url, status, content_type, headers_json, body, fetched_at)) => {
                        // Headers are auxiliary metadata; a corrupt row must not fail the lookup.
                        let headers = serde_json::from_str(&headers_json).unwrap_or_default();
                        Ok(Some(StoredResponse {
                            url,
                            status: status as u16,
                            content_type,
                            headers,
                            body,
                            fetched_at,
                        }))
                    }
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Write `response` under `key`, replacing any existing entry.
    ///
    /// Uses UPSERT semantics; racing writers resolve to last write wins.
    pub async fn put(&self, key: &RequestKey, response: &StoredResponse) -> Result<(), Error> {
        let store = self.name.clone();
        let method = key.method().to_string();
        let url = key.url().to_string();
        let response = response.clone();
        let headers_json = serde_json::to_string(&response.headers).unwrap_or_else(|_| "[]".to_string());
        self.db
            .conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO responses (
                        store, method, url, status, content_type, headers_json, body, fetched_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    ON CONFLICT(store, method, url) DO UPDATE SET
                        status = excluded.status,
                        content_type = excluded.content_type,
                        headers_json = excluded.headers_json,
                        body = excluded.body,
                        fetched_at = excluded.fetched_at",
                    params![
                        store,
                        method,
                        url,
                        response.status as i64,
                        &response.content_type,
                        headers_json,
                        &response.body,
                        &response.fetched_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Enumerate the request keys currently present in this store.
    pub async fn keys(&self) -> Result<Vec<RequestKey>, Error> {
        let store = self.name.clone();
        self.db
            .conn
            .call(move |conn| -> Result<Vec<RequestKey>, Error> {
                let mut stmt = conn.prepare("SELECT method, url FROM responses WHERE store = ?1 ORDER BY url")?;
                let rows =
                    stmt.query_map(params![store], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
                let mut keys = Vec::new();
                for row in rows {
                    let (method, url) = row?;
                    keys.push(RequestKey::new(&method, &url));
                }
                Ok(keys)
            })
            .await
            .map_err(Error::from)
    }

    /// Remove the entry for `key`. Returns true if an entry existed.
    pub async fn delete(&self, key: &RequestKey) -> Result<bool, Error> {
        let store = self.name.clone();
        let method = key.method().to_string();
        let url = key.url().to_string();
        self.db
            .conn
            .call(move |conn| -> Result<bool, Error> {
                let deleted = conn.execute(
                    "DELETE FROM responses WHERE store = ?1 AND method = ?2 AND url = ?3",
                    params![store, method, url],
                )?;
                Ok(deleted > 0)
            })
            .await
            .map_err(Error::from)
    }
}
