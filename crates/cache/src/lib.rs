//! Tiered cache backend for splitcache
//!
//! A [`SplitBackend`] owns no storage. It composes an ordered list of cache
//! backends ("levels") and routes every write to the level whose lifetime
//! threshold admits the entry, so short-lived entries land in fast, small
//! stores and long-lived ones in slow, large stores. Callers see the same
//! [`CacheBackend`] contract the levels implement.
//!
//! - Levels and thresholds are fixed at construction ([`LevelTable`])
//! - Backend types are resolved through a [`BackendRegistry`]
//! - Global compression options are pushed down to capable levels
//! - An optional eviction workaround purges stale copies from faster levels

pub mod backends;
pub mod compression;
pub mod config;
pub mod levels;
pub mod registry;
pub mod split;

pub use compression::{CompressionDefaults, CompressionSettings};
pub use config::{
    ConfigSource, LevelConfig, LoadedConfig, SplitCacheConfig, SplitCacheConfigBuilder,
    SplitCacheConfigLoader,
};
pub use levels::{Level, LevelTable, Threshold};
pub use registry::{create_backend, BackendConstructor, BackendRegistration, BackendRegistry};
pub use split::SplitBackend;

pub use splitcache_core::{
    BackendContext, BackendOptions, CacheBackend, CacheError, CacheFrontend, Error,
    NamedFrontend, RecoveryHint, Result,
};
