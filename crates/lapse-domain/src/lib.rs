//! Lapse Domain Layer
//!
//! Core vocabulary shared by every Lapse crate: record identifiers, the
//! expirable record itself, and the trait interfaces for the two backing
//! stores and the configuration source.
//!
//! ## Key Concepts
//!
//! - **Expirable record**: a metadata row plus the blob payload it points at
//! - **TTL**: the maximum age a record may reach before it becomes eligible
//!   for deletion
//! - **Cutoff**: `now - TTL`; records created at or before it are expired
//!
//! ## Architecture
//!
//! - Pure data and trait definitions only
//! - Store implementations live in `lapse-store`
//! - The sweeper lives in `lapse-janitor`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod record;
pub mod traits;

// Re-exports for convenience
pub use record::{BlobId, ExpirableRecord, RecordId};
pub use traits::{BlobStore, ConfigProvider, MetadataStore};
