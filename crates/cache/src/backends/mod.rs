//! Storage backends bundled with splitcache
//!
//! ## Available Backends
//!
//! - **`memory`** - concurrent in-process map, supports compression
//! - **`file`** - one file per entry in a cache directory
//! - **`null`** - discards everything
//!
//! Any other [`CacheBackend`](splitcache_core::CacheBackend) can be added to a
//! [`BackendRegistry`](crate::registry::BackendRegistry) under its own key.

pub mod file;
pub mod memory;
pub mod null;

pub use file::{FileBackend, FileBackendOptions};
pub use memory::{MemoryBackend, MemoryBackendOptions};
pub use null::NullBackend;
