//! Lapse Janitor
//!
//! Background sweeper that deletes records older than a configured TTL from
//! a blob store and a metadata store.
//!
//! # Overview
//!
//! - **Expiry query**: fetch at most `batch_size` records created at or
//!   before `now - ttl`
//! - **Record deletion**: delete the blob, then the metadata row, tolerating
//!   either failure independently
//! - **Sweep cycle**: one query followed by sequential deletion of the batch
//! - **Scheduler**: a pool of workers sharing one interval timer and one
//!   cancellation token
//!
//! Deletion is best-effort. Nothing is retried within a cycle; a record that
//! fails to delete is still expired and is found again on a later cycle.
//! A TTL of zero disables the janitor entirely.
//!
//! # Usage
//!
//! ## One-time Sweep
//!
//! ```no_run
//! use lapse_janitor::{Janitor, JanitorConfig};
//! use lapse_store::{FsBlobStore, SqliteMetadataStore};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let janitor = Janitor::new(
//!     JanitorConfig::default(),
//!     &Duration::from_secs(24 * 3600),
//!     Arc::new(FsBlobStore::new("blobs")?),
//!     Arc::new(SqliteMetadataStore::new("lapse.db")?),
//! )?;
//!
//! janitor.run_once().await;
//! println!("{}", janitor.metrics().snapshot().summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Background Worker
//!
//! See [`JanitorWorker`].
//!
//! # Configuration
//!
//! ```toml
//! [janitor]
//! sweep_interval_secs = 600
//! workers = 1
//! batch_size = 10
//! log_deletion_errors = false
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod janitor;
mod metrics;
mod worker;

pub use config::JanitorConfig;
pub use error::JanitorError;
pub use janitor::Janitor;
pub use metrics::{JanitorMetrics, MetricsSnapshot};
pub use worker::{JanitorWorker, WorkerState};
