pub mod records;
pub mod store;

pub use records::{SessionRecords, ALIAS_KEY, MONITOR_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore, NullStore, StoreError};
