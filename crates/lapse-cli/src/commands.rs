//! Command implementations.

use crate::config::LapseConfig;
use crate::error::Result;
use lapse_janitor::{Janitor, JanitorWorker, MetricsSnapshot, WorkerState};
use lapse_store::{FsBlobStore, SqliteMetadataStore};
use std::sync::Arc;

/// Janitor wired to the on-disk stores
pub type DiskJanitor = Janitor<FsBlobStore, SqliteMetadataStore>;

/// Open both stores named in `config` and build a janitor over them
pub fn build_janitor(config: &LapseConfig) -> Result<DiskJanitor> {
    let blobs = Arc::new(FsBlobStore::new(&config.storage.blob_dir)?);
    let metadata = Arc::new(SqliteMetadataStore::new(&config.storage.database_path)?);
    Ok(Janitor::new(config.janitor.clone(), config, blobs, metadata)?)
}

/// Run the janitor until Ctrl+C, then drain the workers
pub async fn execute_run(config: &LapseConfig) -> Result<()> {
    let mut worker = JanitorWorker::new(build_janitor(config)?);
    worker.start()?;

    if worker.state() == WorkerState::Disabled {
        tracing::info!("Janitor disabled; nothing to run");
        return Ok(());
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping janitor");

    worker.shutdown().await?;
    Ok(())
}

/// Run exactly one sweep cycle
pub async fn execute_sweep_once(config: &LapseConfig) -> Result<MetricsSnapshot> {
    let janitor = build_janitor(config)?;
    if janitor.is_disabled() {
        tracing::warn!("Configured TTL was 0; sweep skipped");
    }

    janitor.run_once().await;
    Ok(janitor.metrics().snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lapse_domain::{ExpirableRecord, RecordId};
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn config_in(dir: &TempDir, ttl_secs: u64) -> LapseConfig {
        let mut config = LapseConfig::default();
        config.storage.ttl_secs = ttl_secs;
        config.storage.database_path = dir.path().join("lapse.db");
        config.storage.blob_dir = dir.path().join("blobs");
        config
    }

    #[tokio::test]
    async fn test_sweep_once_deletes_expired() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, 3600);

        let metadata = SqliteMetadataStore::new(&config.storage.database_path).unwrap();
        let blobs = FsBlobStore::new(&config.storage.blob_dir).unwrap();
        let old = ExpirableRecord::new(RecordId::new(), "old");
        blobs.put(&old.blob_id, b"payload").await.unwrap();
        metadata
            .insert(&old, SystemTime::now() - Duration::from_secs(7200))
            .unwrap();

        let snap = execute_sweep_once(&config).await.unwrap();
        assert_eq!(snap.sweep_count, 1);
        assert_eq!(snap.rows_deleted, 1);
        assert_eq!(metadata.count().unwrap(), 0);
        assert!(!blobs.exists(&old.blob_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_sweep_once_disabled_keeps_everything() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, 0);

        let metadata = SqliteMetadataStore::new(&config.storage.database_path).unwrap();
        let old = ExpirableRecord::new(RecordId::new(), "old");
        metadata
            .insert(&old, SystemTime::now() - Duration::from_secs(7200))
            .unwrap();

        let snap = execute_sweep_once(&config).await.unwrap();
        assert_eq!(snap.sweep_count, 0);
        assert_eq!(metadata.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_run_returns_immediately_when_disabled() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, 0);

        assert!(execute_run(&config).await.is_ok());
    }
}
