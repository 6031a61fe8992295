//! Capability contract shared by the routing layer and every backend
//!
//! A split cache both consumes and provides [`CacheBackend`], which is what
//! lets levels be composed (or nested) without special-casing callers.

use crate::errors::Result;
use async_trait::async_trait;
use std::fmt::Debug;

/// Core trait for cache backends
///
/// Payloads are opaque bytes; serialization belongs to the cache frontend.
/// Lifetimes are whole seconds and `Some(0)` means "never expires".
#[async_trait]
pub trait CacheBackend: Send + Sync + Debug {
    /// Short name used in diagnostics
    fn name(&self) -> &str;

    /// One-time initialization, run by the factory right after construction
    async fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    /// Store an entry
    ///
    /// `None` asks the backend to apply its own default lifetime.
    async fn set(
        &self,
        id: &str,
        data: &[u8],
        tags: &[String],
        lifetime: Option<u64>,
    ) -> Result<()>;

    /// Load an entry
    ///
    /// Returns `None` if the entry doesn't exist or has expired.
    async fn get(&self, id: &str) -> Result<Option<Vec<u8>>>;

    /// Check if an entry exists
    async fn has(&self, id: &str) -> Result<bool>;

    /// Remove an entry
    ///
    /// Returns `Ok(true)` if an entry was removed, `Ok(false)` if none existed.
    async fn remove(&self, id: &str) -> Result<bool>;

    /// Remove all entries
    async fn flush(&self) -> Result<()>;

    /// Remove all entries carrying `tag`
    async fn flush_by_tag(&self, tag: &str) -> Result<()>;

    /// Identifiers of all entries carrying `tag`
    async fn find_identifiers_by_tag(&self, tag: &str) -> Result<Vec<String>>;

    /// Drop expired entries
    async fn collect_garbage(&self) -> Result<()>;
}

/// The cache frontend a backend stores entries for
pub trait CacheFrontend: Send + Sync + Debug {
    /// Identifier of the cache, used to namespace persistent storage
    fn identifier(&self) -> &str;

    /// Lifetime applied when a caller doesn't pass one
    fn default_lifetime(&self) -> Option<u64> {
        None
    }
}

/// Minimal frontend binding identified by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedFrontend {
    identifier: String,
    default_lifetime: Option<u64>,
}

impl NamedFrontend {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            default_lifetime: None,
        }
    }

    #[must_use]
    pub fn with_default_lifetime(mut self, lifetime: u64) -> Self {
        self.default_lifetime = Some(lifetime);
        self
    }
}

impl CacheFrontend for NamedFrontend {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn default_lifetime(&self) -> Option<u64> {
        self.default_lifetime
    }
}
