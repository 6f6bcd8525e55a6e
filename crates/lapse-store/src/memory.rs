//! In-memory stores

use crate::StoreError;
use async_trait::async_trait;
use lapse_domain::{BlobId, BlobStore, ExpirableRecord, MetadataStore, RecordId};
use std::collections::HashMap;
use std::time::SystemTime;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct Row {
    blob_id: BlobId,
    created_at: SystemTime,
}

/// Metadata store backed by a `HashMap`
///
/// Expired rows are returned oldest first.
#[derive(Debug, Default)]
pub struct MemoryMetadataStore {
    rows: Mutex<HashMap<RecordId, Row>>,
}

impl MemoryMetadataStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a record created at `created_at`
    pub async fn insert(&self, record: ExpirableRecord, created_at: SystemTime) {
        self.rows.lock().await.insert(
            record.id,
            Row {
                blob_id: record.blob_id,
                created_at,
            },
        );
    }

    /// Whether a row for `id` exists
    pub async fn contains(&self, id: RecordId) -> bool {
        self.rows.lock().await.contains_key(&id)
    }

    /// Number of rows currently stored
    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    type Error = StoreError;

    async fn lookup_expired(
        &self,
        cutoff: SystemTime,
        limit: usize,
    ) -> Result<Vec<ExpirableRecord>, Self::Error> {
        let rows = self.rows.lock().await;

        let mut expired: Vec<(&RecordId, &Row)> = rows
            .iter()
            .filter(|(_, row)| row.created_at <= cutoff)
            .collect();
        expired.sort_by_key(|(id, row)| (row.created_at, **id));

        Ok(expired
            .into_iter()
            .take(limit)
            .map(|(id, row)| ExpirableRecord::new(*id, row.blob_id.clone()))
            .collect())
    }

    async fn delete_record(&self, id: RecordId) -> Result<(), Self::Error> {
        self.rows.lock().await.remove(&id);
        Ok(())
    }
}

/// Blob store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<BlobId, Vec<u8>>>,
}

impl MemoryBlobStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a payload under `id`
    pub async fn put(&self, id: BlobId, data: Vec<u8>) {
        self.blobs.lock().await.insert(id, data);
    }

    /// Whether a payload for `id` exists
    pub async fn contains(&self, id: &BlobId) -> bool {
        self.blobs.lock().await.contains_key(id)
    }

    /// Number of payloads currently stored
    pub async fn len(&self) -> usize {
        self.blobs.lock().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.blobs.lock().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    type Error = StoreError;

    async fn delete_blob(&self, id: &BlobId) -> Result<(), Self::Error> {
        self.blobs.lock().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_lookup_returns_oldest_first() {
        let store = MemoryMetadataStore::new();
        let now = SystemTime::now();

        let newer = ExpirableRecord::new(RecordId::new(), "newer");
        let older = ExpirableRecord::new(RecordId::new(), "older");
        store.insert(newer.clone(), now - Duration::from_secs(60)).await;
        store.insert(older.clone(), now - Duration::from_secs(120)).await;

        let expired = store.lookup_expired(now, 10).await.unwrap();
        assert_eq!(expired, vec![older, newer]);
    }

    #[tokio::test]
    async fn test_cutoff_boundary_is_inclusive() {
        let store = MemoryMetadataStore::new();
        let cutoff = SystemTime::now() - Duration::from_secs(3600);

        let at_cutoff = ExpirableRecord::new(RecordId::new(), "at");
        let after_cutoff = ExpirableRecord::new(RecordId::new(), "after");
        store.insert(at_cutoff.clone(), cutoff).await;
        store
            .insert(after_cutoff, cutoff + Duration::from_millis(1))
            .await;

        let expired = store.lookup_expired(cutoff, 10).await.unwrap();
        assert_eq!(expired, vec![at_cutoff]);
    }

    #[tokio::test]
    async fn test_delete_record_is_idempotent() {
        let store = MemoryMetadataStore::new();
        let record = ExpirableRecord::new(RecordId::new(), "blob");
        store.insert(record.clone(), SystemTime::now()).await;

        store.delete_record(record.id).await.unwrap();
        store.delete_record(record.id).await.unwrap();
        assert!(!store.contains(record.id).await);
    }

    #[tokio::test]
    async fn test_delete_missing_blob_succeeds() {
        let store = MemoryBlobStore::new();
        store.put(BlobId::from("present"), vec![1, 2, 3]).await;

        store.delete_blob(&BlobId::from("absent")).await.unwrap();
        store.delete_blob(&BlobId::from("present")).await.unwrap();
        assert!(store.is_empty().await);
    }
}
