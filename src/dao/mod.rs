/// Best-record persistence on top of a key-value store.
pub mod best_record;
/// Key-value stores backing the best records.
pub mod record_store;
/// Storage abstraction layer shared by the record stores.
pub mod storage;
