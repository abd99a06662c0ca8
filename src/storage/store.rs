use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// File-store adapter. Paths are relative to the store root; the media
/// lifecycle layer owns the mapping between public references and these
/// relative paths.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Write data to storage
    async fn put(&self, path: &str, data: Bytes) -> Result<()>;

    /// Read data from storage
    async fn get(&self, path: &str) -> Result<Bytes>;

    /// Delete data from storage; deleting a missing file is not an error
    async fn delete(&self, path: &str) -> Result<()>;

    /// Check if a file exists
    async fn exists(&self, path: &str) -> Result<bool>;
}
