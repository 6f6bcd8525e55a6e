//! Lapse Storage Layer
//!
//! Concrete implementations of the `BlobStore` and `MetadataStore` traits.
//!
//! # Architecture
//!
//! - [`SqliteMetadataStore`]: record rows with an indexed insertion timestamp
//! - [`FsBlobStore`]: one file per blob under a root directory
//! - [`MemoryMetadataStore`] / [`MemoryBlobStore`]: in-process stores for
//!   tests and embedding
//!
//! Every delete is idempotent: removing a row or blob that is already gone
//! succeeds, because the sweeper may retry the same record on a later cycle.
//!
//! # Examples
//!
//! ```no_run
//! use lapse_store::{FsBlobStore, SqliteMetadataStore};
//!
//! let metadata = SqliteMetadataStore::new("lapse.db").unwrap();
//! let blobs = FsBlobStore::new("blobs").unwrap();
//! ```

#![warn(missing_docs)]

mod fs;
mod memory;
mod sqlite;

pub use fs::FsBlobStore;
pub use memory::{MemoryBlobStore, MemoryMetadataStore};
pub use sqlite::SqliteMetadataStore;

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A previous holder of the connection lock panicked
    #[error("Connection lock poisoned")]
    Poisoned,

    /// Blocking task failed to complete
    #[error("Background task failed: {0}")]
    Task(String),
}
