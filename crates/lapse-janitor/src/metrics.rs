//! Metrics collection for Janitor operations
//!
//! Counters are process-local. They are shared by every worker, so they are
//! plain atomics rather than a locked struct.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters updated by sweep cycles
#[derive(Debug, Default)]
pub struct JanitorMetrics {
    sweeps: AtomicU64,
    query_failures: AtomicU64,
    records_found: AtomicU64,
    blobs_deleted: AtomicU64,
    blob_failures: AtomicU64,
    rows_deleted: AtomicU64,
    row_failures: AtomicU64,
}

impl JanitorMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_sweep(&self) {
        self.sweeps.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_query_failure(&self) {
        self.query_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_found(&self, count: usize) {
        self.records_found.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_blob(&self, ok: bool) {
        let counter = if ok { &self.blobs_deleted } else { &self.blob_failures };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_row(&self, ok: bool) {
        let counter = if ok { &self.rows_deleted } else { &self.row_failures };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            sweep_count: self.sweeps.load(Ordering::Relaxed),
            query_failures: self.query_failures.load(Ordering::Relaxed),
            records_found: self.records_found.load(Ordering::Relaxed),
            blobs_deleted: self.blobs_deleted.load(Ordering::Relaxed),
            blob_failures: self.blob_failures.load(Ordering::Relaxed),
            rows_deleted: self.rows_deleted.load(Ordering::Relaxed),
            row_failures: self.row_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`JanitorMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Sweep cycles run, including ones aborted by a failed lookup
    pub sweep_count: u64,

    /// Expiry lookups that failed
    pub query_failures: u64,

    /// Expired records returned by lookups
    pub records_found: u64,

    /// Successful blob deletions
    pub blobs_deleted: u64,

    /// Failed blob deletions
    pub blob_failures: u64,

    /// Successful metadata row deletions
    pub rows_deleted: u64,

    /// Failed metadata row deletions
    pub row_failures: u64,
}

impl MetricsSnapshot {
    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        [
            "Janitor Metrics Summary".to_string(),
            "======================".to_string(),
            format!("Sweep cycles: {}", self.sweep_count),
            format!("Lookup failures: {}", self.query_failures),
            format!("Expired records found: {}", self.records_found),
            format!(
                "Blobs deleted: {} ({} failed)",
                self.blobs_deleted, self.blob_failures
            ),
            format!(
                "Rows deleted: {} ({} failed)",
                self.rows_deleted, self.row_failures
            ),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = JanitorMetrics::new();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_counters_accumulate_across_snapshots() {
        let metrics = JanitorMetrics::new();
        metrics.record_sweep();
        metrics.record_found(3);
        let first = metrics.snapshot();

        metrics.record_sweep();
        metrics.record_found(2);
        let second = metrics.snapshot();

        assert_eq!(first.sweep_count, 1);
        assert_eq!(second.sweep_count, 2);
        assert_eq!(second.records_found, 5);
    }

    #[test]
    fn test_record_deletions() {
        let metrics = JanitorMetrics::new();
        metrics.record_found(3);
        metrics.record_blob(true);
        metrics.record_blob(false);
        metrics.record_row(true);
        metrics.record_row(true);

        let snap = metrics.snapshot();
        assert_eq!(snap.records_found, 3);
        assert_eq!(snap.blobs_deleted, 1);
        assert_eq!(snap.blob_failures, 1);
        assert_eq!(snap.rows_deleted, 2);
        assert_eq!(snap.row_failures, 0);
    }

    #[test]
    fn test_summary() {
        let metrics = JanitorMetrics::new();
        metrics.record_sweep();
        metrics.record_found(5);
        metrics.record_blob(true);
        metrics.record_row(false);

        let summary = metrics.snapshot().summary();
        assert!(summary.contains("Sweep cycles: 1"));
        assert!(summary.contains("Expired records found: 5"));
        assert!(summary.contains("Blobs deleted: 1 (0 failed)"));
        assert!(summary.contains("Rows deleted: 0 (1 failed)"));
    }
}
