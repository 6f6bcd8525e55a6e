//! Record module - the unit of cleanup

use std::fmt;

/// Unique identifier for a stored record based on UUIDv7
///
/// UUIDv7 keeps identifiers roughly insertion-ordered, which lets stores
/// index on the id and still get sensible locality for age-based scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(u128);

impl RecordId {
    /// Generate a new UUIDv7-based RecordId
    ///
    /// # Examples
    ///
    /// ```
    /// use lapse_domain::RecordId;
    ///
    /// let id = RecordId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a RecordId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a RecordId from its hyphenated UUID form
    ///
    /// # Examples
    ///
    /// ```
    /// use lapse_domain::RecordId;
    ///
    /// let id = RecordId::new();
    /// let parsed = RecordId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid record id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Millisecond Unix timestamp embedded in the UUIDv7
    pub fn timestamp(&self) -> u64 {
        (self.0 >> 80) as u64
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Reference to a payload held by a [`BlobStore`](crate::BlobStore)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlobId(String);

impl BlobId {
    /// Wrap a blob reference
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the reference as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BlobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A record that may outlive its retention window
///
/// Only the two handles needed for deletion are carried. The record's age is
/// tracked by the metadata store; the sweeper never sees a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpirableRecord {
    /// Identifier of the metadata row
    pub id: RecordId,

    /// Payload stored in the blob store
    pub blob_id: BlobId,
}

impl ExpirableRecord {
    /// Create a new record handle
    pub fn new(id: RecordId, blob_id: impl Into<BlobId>) -> Self {
        Self {
            id,
            blob_id: blob_id.into(),
        }
    }
}
