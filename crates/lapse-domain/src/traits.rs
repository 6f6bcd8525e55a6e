//! Trait definitions for external collaborators
//!
//! The sweeper only ever talks to storage and configuration through these
//! traits. Implementations live in `lapse-store` (and in test doubles).
//!
//! Stores are shared by every sweep worker, so implementations must tolerate
//! concurrent independent calls and must treat repeated deletes of the same
//! record or blob as success.

use crate::{BlobId, ExpirableRecord, RecordId};
use async_trait::async_trait;
use std::fmt::Display;
use std::time::{Duration, SystemTime};

/// Unstructured payload storage
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Error type for blob operations
    type Error: Display + Send;

    /// Delete a blob. Deleting a blob that does not exist is not an error.
    async fn delete_blob(&self, id: &BlobId) -> Result<(), Self::Error>;
}

/// Structured metadata storage that tracks record insertion times
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Error type for metadata operations
    type Error: Display + Send;

    /// Return at most `limit` records created at or before `cutoff`
    ///
    /// An empty result means nothing is expired; it is not an error.
    async fn lookup_expired(
        &self,
        cutoff: SystemTime,
        limit: usize,
    ) -> Result<Vec<ExpirableRecord>, Self::Error>;

    /// Delete the metadata row for `id`. Missing rows are not an error.
    async fn delete_record(&self, id: RecordId) -> Result<(), Self::Error>;
}

/// Source of system-wide settings, read once at sweeper construction
pub trait ConfigProvider {
    /// Retention window for stored records. `Duration::ZERO` disables expiry.
    fn storage_ttl(&self) -> Duration;
}

impl ConfigProvider for Duration {
    fn storage_ttl(&self) -> Duration {
        *self
    }
}
