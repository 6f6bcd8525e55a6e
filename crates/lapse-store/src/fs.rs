//! Filesystem blob store

use crate::StoreError;
use async_trait::async_trait;
use lapse_domain::{BlobId, BlobStore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Blob store keeping one file per blob under a root directory
///
/// Blob ids map directly to file names, so an id must be a single path
/// component (no separators, not `.` or `..`).
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a payload for `id`, replacing any existing one
    pub async fn put(&self, id: &BlobId, data: &[u8]) -> Result<(), StoreError> {
        let path = self.blob_path(id)?;
        tokio::fs::write(path, data).await?;
        Ok(())
    }

    /// Whether a payload for `id` exists
    pub async fn exists(&self, id: &BlobId) -> Result<bool, StoreError> {
        let path = self.blob_path(id)?;
        Ok(tokio::fs::try_exists(path).await?)
    }

    fn blob_path(&self, id: &BlobId) -> Result<PathBuf, StoreError> {
        let name = id.as_str();
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(StoreError::InvalidData(format!(
                "Blob id is not a valid file name: {:?}",
                name
            )));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    type Error = StoreError;

    async fn delete_blob(&self, id: &BlobId) -> Result<(), Self::Error> {
        let path = self.blob_path(id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
