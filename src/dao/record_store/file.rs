use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::future::BoxFuture;
use tokio::{fs, sync::Mutex};
use tracing::debug;

use super::RecordStore;
use crate::dao::storage::{StorageError, StorageResult};

/// Record store persisted as a single JSON object on disk.
///
/// Every batch rewrites the whole file through a temporary sibling that is
/// renamed over the original, so a reader never sees half of a batch.
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    path: Arc<PathBuf>,
    write_gate: Arc<Mutex<()>>,
}

impl FileRecordStore {
    /// Persist records at `path`. The file is created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Location of the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn read_all(&self) -> StorageResult<BTreeMap<String, String>> {
        let contents = match fs::read(self.path.as_path()).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => {
                return Err(StorageError::unavailable(
                    format!("failed to read `{}`", self.path.display()),
                    err,
                ));
            }
        };

        serde_json::from_slice(&contents).map_err(|source| StorageError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|err| {
                StorageError::unavailable(format!("failed to create `{}`", parent.display()), err)
            })?;
        }

        let payload = serde_json::to_vec_pretty(entries).map_err(|source| StorageError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })?;

        let temp = self.temp_path();
        fs::write(&temp, payload).await.map_err(|err| {
            StorageError::unavailable(format!("failed to write `{}`", temp.display()), err)
        })?;
        fs::rename(&temp, self.path.as_path()).await.map_err(|err| {
            StorageError::unavailable(
                format!("failed to replace `{}`", self.path.display()),
                err,
            )
        })
    }
}

impl RecordStore for FileRecordStore {
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>> {
        let store = self.clone();
        let key = key.to_string();
        Box::pin(async move {
            let mut entries = store.read_all().await?;
            Ok(entries.remove(&key))
        })
    }

    fn set(&self, entries: Vec<(String, String)>) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let _gate = store.write_gate.lock().await;
            let mut current = store.read_all().await?;
            let count = entries.len();
            current.extend(entries);
            store.write_all(&current).await?;
            debug!(path = %store.path.display(), count, "persisted record batch");
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.read_all().await.map(|_| ()) })
    }
}
