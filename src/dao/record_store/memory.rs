use std::{
    collections::HashMap,
    io,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use futures::future::BoxFuture;
use tokio::sync::RwLock;

use super::RecordStore;
use crate::dao::storage::{StorageError, StorageResult};

/// Volatile record store. Batches are applied under one write lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryRecordStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, to exercise error paths.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Copy of every stored entry.
    pub async fn entries(&self) -> HashMap<String, String> {
        self.entries.read().await.clone()
    }
}

impl RecordStore for MemoryRecordStore {
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>> {
        let store = self.clone();
        let key = key.to_string();
        Box::pin(async move { Ok(store.entries.read().await.get(&key).cloned()) })
    }

    fn set(&self, entries: Vec<(String, String)>) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            if store.fail_writes.load(Ordering::SeqCst) {
                return Err(StorageError::unavailable(
                    "memory store rejects writes".into(),
                    io::Error::other("writes disabled"),
                ));
            }
            let mut guard = store.entries.write().await;
            guard.extend(entries);
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
