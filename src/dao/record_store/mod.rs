mod file;
mod memory;

use futures::future::BoxFuture;

use crate::dao::storage::StorageResult;

pub use file::FileRecordStore;
pub use memory::MemoryRecordStore;

/// Durable string key-value store holding the best records.
pub trait RecordStore: Send + Sync {
    /// Value stored under `key`.
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>>;
    /// Write every entry, all or nothing.
    fn set(&self, entries: Vec<(String, String)>) -> BoxFuture<'static, StorageResult<()>>;
    /// Probe the backing medium.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
