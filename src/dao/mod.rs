/// Local on-device persistence for crash recovery.
pub mod local;
/// Database model definitions.
pub mod models;
/// Shared snapshot store trait and backends.
pub mod snapshot_store;
/// Storage abstraction layer for database operations.
pub mod storage;
