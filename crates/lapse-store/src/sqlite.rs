//! SQLite-backed metadata store

use crate::StoreError;
use async_trait::async_trait;
use lapse_domain::{ExpirableRecord, MetadataStore, RecordId};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS records (
    id BLOB PRIMARY KEY NOT NULL,
    blob_id TEXT NOT NULL,
    created_at_ns INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_records_created_at ON records (created_at_ns);
";

/// SQLite-based implementation of [`MetadataStore`]
///
/// Rows carry the record id, the blob reference and the insertion time in
/// nanoseconds since the Unix epoch. Expiry lookups use the
/// `created_at_ns` index and return the oldest rows first.
///
/// # Thread Safety
///
/// The connection sits behind a mutex and trait calls run on tokio's
/// blocking pool, so one store can be shared by every sweep worker.
#[derive(Clone)]
pub struct SqliteMetadataStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMetadataStore {
    /// Open (or create) a store at `path`
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Insert (or replace) a record row created at `created_at`
    pub fn insert(&self, record: &ExpirableRecord, created_at: SystemTime) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute(
            "INSERT OR REPLACE INTO records (id, blob_id, created_at_ns) VALUES (?1, ?2, ?3)",
            params![
                record_id_to_bytes(record.id),
                record.blob_id.as_str(),
                to_nanos(created_at)
            ],
        )?;
        Ok(())
    }

    /// Number of rows currently stored
    pub fn count(&self) -> Result<usize, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Whether a row for `id` exists
    pub fn contains(&self, id: RecordId) -> Result<bool, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let found: i64 = conn.query_row(
            "SELECT COUNT(*) FROM records WHERE id = ?1",
            params![record_id_to_bytes(id)],
            |row| row.get(0),
        )?;
        Ok(found > 0)
    }

    /// Run `f` against the connection on the blocking pool
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&guard)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

#[async_trait]
impl MetadataStore for SqliteMetadataStore {
    type Error = StoreError;

    async fn lookup_expired(
        &self,
        cutoff: SystemTime,
        limit: usize,
    ) -> Result<Vec<ExpirableRecord>, Self::Error> {
        let cutoff_ns = to_nanos(cutoff);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, blob_id FROM records
                 WHERE created_at_ns <= ?1
                 ORDER BY created_at_ns
                 LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![cutoff_ns, limit], |row| {
                let id: Vec<u8> = row.get(0)?;
                let blob_id: String = row.get(1)?;
                Ok((id, blob_id))
            })?;

            let mut records = Vec::new();
            for row in rows {
                let (id, blob_id) = row?;
                records.push(ExpirableRecord::new(bytes_to_record_id(&id)?, blob_id));
            }
            Ok(records)
        })
        .await
    }

    async fn delete_record(&self, id: RecordId) -> Result<(), Self::Error> {
        self.with_conn(move |conn| {
            conn.execute(
                "DELETE FROM records WHERE id = ?1",
                params![record_id_to_bytes(id)],
            )?;
            Ok(())
        })
        .await
    }
}

fn record_id_to_bytes(id: RecordId) -> Vec<u8> {
    id.value().to_be_bytes().to_vec()
}

fn bytes_to_record_id(bytes: &[u8]) -> Result<RecordId, StoreError> {
    let arr: [u8; 16] = bytes.try_into().map_err(|_| {
        StoreError::InvalidData(format!(
            "Expected 16 bytes for RecordId, got {}",
            bytes.len()
        ))
    })?;
    Ok(RecordId::from_value(u128::from_be_bytes(arr)))
}

/// Nanoseconds since the Unix epoch; instants before the epoch clamp to 0
/// and instants past year 2262 saturate
fn to_nanos(t: SystemTime) -> i64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_nanos()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_bytes_roundtrip() {
        let id = RecordId::new();
        let bytes = record_id_to_bytes(id);
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes_to_record_id(&bytes).unwrap(), id);
    }

    #[test]
    fn test_bytes_to_record_id_rejects_bad_length() {
        assert!(matches!(
            bytes_to_record_id(&[1, 2, 3]),
            Err(StoreError::InvalidData(_))
        ));
    }

    #[test]
    fn test_to_nanos_clamps_pre_epoch() {
        let before = UNIX_EPOCH - std::time::Duration::from_secs(10);
        assert_eq!(to_nanos(before), 0);
        assert_eq!(
            to_nanos(UNIX_EPOCH + std::time::Duration::from_nanos(1_500_250)),
            1_500_250
        );
    }

    #[test]
    fn test_to_nanos_keeps_sub_millisecond_order() {
        let base = UNIX_EPOCH + std::time::Duration::from_secs(1_700_000_000);
        let later = base + std::time::Duration::from_micros(500);
        assert!(to_nanos(later) > to_nanos(base));
    }
}
