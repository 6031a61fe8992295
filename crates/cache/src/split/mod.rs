//! Split cache: one backend made of lifetime-ordered levels
//!
//! Writes go to the first level whose threshold admits the entry lifetime.
//! Reads scan levels fastest first and stop at the first hit. Nothing is
//! promoted or demoted between levels, and no operation spans levels
//! atomically.

mod eviction;
mod operations;


use crate::compression::CompressionDefaults;
use crate::config::SplitCacheConfig;
use crate::levels::LevelTable;
use crate::registry::BackendRegistry;
use splitcache_core::{BackendContext, CacheFrontend, Result, DEFAULT_LIFETIME};
use std::fmt;
use std::sync::Arc;

/// Tiered cache backend routing entries to levels by lifetime
pub struct SplitBackend {
    name: String,
    levels: LevelTable,
    default_lifetime: u64,
    eviction_workaround: bool,
    frontend: Arc<dyn CacheFrontend>,
}

impl SplitBackend {
    /// Build a split cache from `config` using the bundled backends
    pub async fn new(config: SplitCacheConfig, frontend: Arc<dyn CacheFrontend>) -> Result<Self> {
        Self::with_registry(config, &BackendRegistry::default(), frontend).await
    }

    /// Build a split cache resolving level backends through `registry`
    pub async fn with_registry(
        config: SplitCacheConfig,
        registry: &BackendRegistry,
        frontend: Arc<dyn CacheFrontend>,
    ) -> Result<Self> {
        let context = BackendContext::new(Arc::clone(&frontend));
        let compression = CompressionDefaults::new(config.compression, config.compression_level);

        let levels = LevelTable::build(config.levels, compression, registry, &context).await?;

        let default_lifetime = config
            .default_lifetime
            .or_else(|| frontend.default_lifetime())
            .unwrap_or(DEFAULT_LIFETIME);

        Ok(Self {
            name: format!("split:{}", frontend.identifier()),
            levels,
            default_lifetime,
            eviction_workaround: config.faster_cache_eviction_workaround,
            frontend,
        })
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    /// Level an entry with `lifetime` seconds is written to
    pub fn route_for(&self, lifetime: u64) -> usize {
        self.levels.route_for(lifetime)
    }

    /// Lifetime applied when `set` gets none
    pub fn default_lifetime(&self) -> u64 {
        self.default_lifetime
    }

    /// Whether writes purge the entry from faster levels first
    pub fn eviction_workaround(&self) -> bool {
        self.eviction_workaround
    }

    pub fn frontend(&self) -> &Arc<dyn CacheFrontend> {
        &self.frontend
    }

    fn resolve_lifetime(&self, lifetime: Option<u64>) -> u64 {
        match lifetime {
            Some(seconds) if seconds > 0 => seconds,
            _ => self.default_lifetime,
        }
    }
}

impl fmt::Debug for SplitBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitBackend")
            .field("name", &self.name)
            .field("levels", &self.levels)
            .field("default_lifetime", &self.default_lifetime)
            .field("eviction_workaround", &self.eviction_workaround)
            .finish()
    }
}
