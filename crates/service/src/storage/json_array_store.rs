use std::{path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};
use tracing::warn;

use crate::errors::ServiceError;

/// Generic JSON file-backed ordered collection store.
///
/// Persists a `Vec<T>` as a single JSON array document and provides the
/// read/mutate primitives the collection services build on. Element order is
/// preserved across save and reload; callers rely on it (item id assignment
/// reads the last element).
///
/// Every mutation rewrites the whole file while still holding the write
/// lock, so a reader never observes memory and disk mid-divergence and two
/// writers cannot interleave their read-modify-write-persist sequences.
#[derive(Clone)]
pub struct JsonArrayStore<T> {
    inner: Arc<RwLock<Vec<T>>>,
    file_path: PathBuf,
}

impl<T> JsonArrayStore<T>
where
    T: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Initialize the store from a path. A missing, unreadable, or malformed
    /// file silently yields an empty collection; the file is first written
    /// when a mutation persists.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let records: Vec<T> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %file_path.display(), error = %e, "ignoring malformed collection file");
                Vec::new()
            }),
            Err(_) => Vec::new(),
        };

        Arc::new(Self { inner: Arc::new(RwLock::new(records)), file_path })
    }

    /// Snapshot of all records in insertion order.
    pub async fn list(&self) -> Vec<T> {
        let records = self.inner.read().await;
        records.clone()
    }

    /// Run a closure against the records under the read lock.
    pub async fn read<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&[T]) -> R,
    {
        let records = self.inner.read().await;
        f(&records)
    }

    /// Apply a mutation and persist the whole collection, all under the
    /// write lock. If the closure fails nothing is written; if the file
    /// write fails the error propagates with no retry.
    pub async fn update<R, F>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, ServiceError>,
    {
        let mut records = self.inner.write().await;
        let out = f(&mut records)?;
        let data = serde_json::to_vec_pretty(&*records)?;
        fs::write(&self.file_path, data).await?;
        Ok(out)
    }
}
