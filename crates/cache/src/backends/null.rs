//! Backend that stores nothing

use async_trait::async_trait;
use splitcache_core::{BackendContext, BackendOptions, CacheBackend, CacheError, Result};

/// Accepts every write and never returns an entry
#[derive(Debug, Default)]
pub struct NullBackend;

impl NullBackend {
    /// Registry key
    pub const TYPE: &'static str = "null";

    pub fn new() -> Self {
        Self
    }

    pub fn from_options(_context: &BackendContext, options: &BackendOptions) -> Result<Self> {
        if let Some(key) = options.keys().next() {
            return Err(CacheError::invalid_backend(
                Self::TYPE,
                format!("unsupported option '{key}'"),
            ));
        }
        Ok(Self)
    }
}

#[async_trait]
impl CacheBackend for NullBackend {
    fn name(&self) -> &str {
        Self::TYPE
    }

    async fn set(
        &self,
        _id: &str,
        _data: &[u8],
        _tags: &[String],
        _lifetime: Option<u64>,
    ) -> Result<()> {
        Ok(())
    }

    async fn get(&self, _id: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn has(&self, _id: &str) -> Result<bool> {
        Ok(false)
    }

    async fn remove(&self, _id: &str) -> Result<bool> {
        Ok(false)
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }

    async fn flush_by_tag(&self, _tag: &str) -> Result<()> {
        Ok(())
    }

    async fn find_identifiers_by_tag(&self, _tag: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn collect_garbage(&self) -> Result<()> {
        Ok(())
    }
}
