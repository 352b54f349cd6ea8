//! Snapshot cache for offline-friendly startup.
//!
//! This module provides a source-agnostic caching mechanism that:
//! - Stores a whole collection as one timestamped snapshot
//! - Serves the snapshot while it is younger than the TTL (24h by default)
//! - Goes back to the network once it expires, with no partial invalidation
//! - Writes through an injected key-value storage, so tests never need a file

mod layer;
mod storage;
mod traits;

pub use layer::CacheLayer;
pub use storage::{CacheStorage, MemoryStorage, NoopStorage, SqliteStorage};
pub use traits::{CacheResult, CacheSource, Cacheable, Snapshot};
