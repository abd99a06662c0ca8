use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::storage::MediaStore;

/// An accepted multipart file payload
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl Upload {
    pub fn content_type(&self) -> &str {
        self.content_type
            .as_deref()
            .unwrap_or("application/octet-stream")
    }

    fn extension(&self) -> &str {
        self.file_name
            .as_deref()
            .and_then(|n| std::path::Path::new(n).extension())
            .and_then(|e| e.to_str())
            .unwrap_or("bin")
    }
}

/// Keeps exactly one live physical file behind each media-reference field.
///
/// Persistence and file-store operations are not transactional with each
/// other, so safety comes from ordering alone: the new file is written
/// before the record is updated, and the previous file is deleted only
/// after the update commits. A crash in between leaves an orphaned file,
/// never a dangling reference.
pub struct MediaLifecycle {
    store: Arc<dyn MediaStore>,
    public_prefix: String,
}

impl MediaLifecycle {
    pub fn new(store: Arc<dyn MediaStore>, public_prefix: impl Into<String>) -> Self {
        Self {
            store,
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    /// Public reference for a store-relative path
    pub fn reference_for(&self, rel: &str) -> String {
        format!("{}/{}", self.public_prefix, rel)
    }

    /// Store-relative path for a public reference; `None` if the reference
    /// does not live under this store's prefix. Inverse of `reference_for`.
    pub fn resolve(&self, reference: &str) -> Option<String> {
        reference
            .strip_prefix(&self.public_prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rel| !rel.is_empty())
            .map(|rel| rel.to_string())
    }

    /// Store `upload` under `subdir`, persist the new reference through
    /// `persist`, then delete the previously referenced file.
    ///
    /// If `persist` fails the newly stored file is removed again and the
    /// error is propagated; the record was never changed. If that cleanup
    /// delete itself fails the store holds an orphan we can no longer
    /// account for, which is surfaced as a storage error. Deleting the old
    /// file after a successful persist is best-effort: the record is
    /// already correct, so a failure is only logged.
    pub async fn attach<F, Fut>(
        &self,
        subdir: &str,
        upload: Upload,
        old_reference: &str,
        persist: F,
    ) -> Result<String>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let rel = format!("{}/{}.{}", subdir, Uuid::new_v4(), upload.extension());
        self.store.put(&rel, upload.data).await?;

        let new_reference = self.reference_for(&rel);

        if let Err(persist_err) = persist(new_reference.clone()).await {
            // Record unchanged; remove the file we just wrote.
            if let Err(cleanup_err) = self.store.delete(&rel).await {
                return Err(AppError::Storage(format!(
                    "storage inconsistency: persist failed ({}) and orphan cleanup failed ({})",
                    persist_err, cleanup_err
                )));
            }
            return Err(persist_err);
        }

        if !old_reference.is_empty() && old_reference != new_reference {
            self.discard(old_reference).await;
        }

        Ok(new_reference)
    }

    /// Best-effort delete of every non-empty reference. Used before the
    /// owning record is removed; a missing file is not an error.
    pub async fn delete_all(&self, references: &[&str]) {
        for reference in references {
            if !reference.is_empty() {
                self.discard(reference).await;
            }
        }
    }

    async fn discard(&self, reference: &str) {
        let Some(rel) = self.resolve(reference) else {
            tracing::warn!("Cannot resolve media reference {:?}, skipping delete", reference);
            return;
        };
        if let Err(e) = self.store.delete(&rel).await {
            tracing::warn!("Failed to delete media file {:?}: {}", rel, e);
        }
    }
}
