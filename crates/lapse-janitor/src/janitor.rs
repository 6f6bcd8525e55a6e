//! Core Janitor implementation: expiry lookup, dual-store deletion, sweep cycle

use crate::{JanitorConfig, JanitorError, JanitorMetrics};
use lapse_domain::{BlobStore, ConfigProvider, ExpirableRecord, MetadataStore};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Janitor service that removes records older than the storage TTL
///
/// A `Janitor` owns no schedule of its own; [`JanitorWorker`](crate::JanitorWorker)
/// drives it on a timer. It can also be driven directly, one cycle at a time.
///
/// # Examples
///
/// ```no_run
/// use lapse_janitor::{Janitor, JanitorConfig};
/// use lapse_store::{MemoryBlobStore, MemoryMetadataStore};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let janitor = Janitor::new(
///     JanitorConfig::default(),
///     &Duration::from_secs(30 * 24 * 3600),
///     Arc::new(MemoryBlobStore::new()),
///     Arc::new(MemoryMetadataStore::new()),
/// )?;
///
/// janitor.run_once().await;
/// println!("{}", janitor.metrics().snapshot().summary());
/// # Ok(())
/// # }
/// ```
pub struct Janitor<B, M> {
    config: JanitorConfig,
    ttl: Duration,
    blobs: Arc<B>,
    metadata: Arc<M>,
    metrics: JanitorMetrics,
}

impl<B, M> Janitor<B, M>
where
    B: BlobStore,
    M: MetadataStore,
{
    /// Create a new Janitor
    ///
    /// The TTL is read from `provider` once, here. A zero TTL builds a janitor
    /// that never deletes anything.
    pub fn new(
        config: JanitorConfig,
        provider: &impl ConfigProvider,
        blobs: Arc<B>,
        metadata: Arc<M>,
    ) -> Result<Self, JanitorError> {
        config.validate()?;
        Ok(Self {
            ttl: provider.storage_ttl(),
            config,
            blobs,
            metadata,
            metrics: JanitorMetrics::new(),
        })
    }

    /// Configured retention window
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether the TTL is the zero "disabled" sentinel
    pub fn is_disabled(&self) -> bool {
        self.ttl.is_zero()
    }

    /// Configuration this janitor was built with
    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Live metrics counters
    pub fn metrics(&self) -> &JanitorMetrics {
        &self.metrics
    }

    /// `now - ttl`, clamped to the Unix epoch
    pub fn cutoff(&self, now: SystemTime) -> SystemTime {
        now.checked_sub(self.ttl)
            .filter(|t| *t >= UNIX_EPOCH)
            .unwrap_or(UNIX_EPOCH)
    }

    /// Fetch at most one batch of records created at or before `cutoff`
    ///
    /// The batch bound is enforced here as well as in the store, so a store
    /// that ignores the limit still cannot inflate a cycle.
    pub async fn find_expired(
        &self,
        cutoff: SystemTime,
    ) -> Result<Vec<ExpirableRecord>, JanitorError> {
        let limit = self.config.batch_size;
        let mut records = self
            .metadata
            .lookup_expired(cutoff, limit)
            .await
            .map_err(|e| JanitorError::Store(e.to_string()))?;
        records.truncate(limit);
        Ok(records)
    }

    /// Delete one record from both stores
    ///
    /// The blob goes first. The metadata row is attempted whatever happened to
    /// the blob; neither failure is retried here.
    pub async fn delete_record(&self, record: &ExpirableRecord) {
        match self.blobs.delete_blob(&record.blob_id).await {
            Ok(()) => self.metrics.record_blob(true),
            Err(e) => {
                self.metrics.record_blob(false);
                if self.config.log_deletion_errors {
                    tracing::warn!("Error deleting blob ({}): {}", record.blob_id, e);
                }
            }
        }

        match self.metadata.delete_record(record.id).await {
            Ok(()) => self.metrics.record_row(true),
            Err(e) => {
                self.metrics.record_row(false);
                if self.config.log_deletion_errors {
                    tracing::warn!("Error deleting record ({}): {}", record.id, e);
                }
            }
        }
    }

    /// Run one sweep cycle
    ///
    /// Looks up a single batch of expired records and deletes each in turn.
    /// A failed lookup ends the cycle with nothing deleted.
    pub async fn run_once(&self) {
        if self.is_disabled() {
            tracing::debug!("TTL is 0; skipping sweep cycle");
            return;
        }

        let cutoff = self.cutoff(SystemTime::now());
        let expired = match self.find_expired(cutoff).await {
            Ok(records) => records,
            Err(e) => {
                self.metrics.record_query_failure();
                self.metrics.record_sweep();
                if self.config.log_deletion_errors {
                    tracing::warn!("Error finding expired records: {}", e);
                }
                return;
            }
        };

        tracing::debug!("Sweep cycle found {} expired records", expired.len());
        self.metrics.record_found(expired.len());

        for record in &expired {
            self.delete_record(record).await;
        }

        self.metrics.record_sweep();
    }
}
