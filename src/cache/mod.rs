// Cache module for offline storage of server responses.
// Builds cache keys and persists raw response text in a key-value store.

pub mod keys;
pub mod paths;
pub mod store;

pub use keys::{CacheKind, NAMESPACE, cache_key};
pub use paths::{cache_dir, default_store_path};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoredEntry};
