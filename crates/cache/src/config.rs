//! Split cache configuration with precedence and validation
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use splitcache_core::options::MAX_LIFETIME_OPTION;
use splitcache_core::{
    BackendOptions, CacheError, RecoveryHint, Result,
    SPLITCACHE_COMPRESSION_LEVEL_VAR, SPLITCACHE_COMPRESSION_VAR,
    SPLITCACHE_DEFAULT_LIFETIME_VAR, SPLITCACHE_EVICTION_WORKAROUND_VAR,
};
use std::path::{Path, PathBuf};

/// One configured level: a backend type key, its options, and its threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfig {
    /// Backend type key resolved through the backend registry
    pub backend: String,
    /// Options handed to the backend constructor
    #[serde(default)]
    pub options: BackendOptions,
    /// Longest lifetime (seconds) this level should hold; `None` = no limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lifetime: Option<u64>,
}

impl LevelConfig {
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            options: BackendOptions::new(),
            max_lifetime: None,
        }
    }

    #[must_use]
    pub fn with_max_lifetime(mut self, seconds: u64) -> Self {
        self.max_lifetime = Some(seconds);
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Resolve the requested threshold, moving a `maxLifetime` option out of
    /// the option map so it never reaches the backend
    pub(crate) fn take_max_lifetime(&mut self) -> Result<Option<u64>> {
        let from_options = self.options.remove(MAX_LIFETIME_OPTION);
        if self.max_lifetime.is_some() {
            return Ok(self.max_lifetime);
        }

        from_options
            .map(|value| lifetime_value(&self.backend, &value))
            .transpose()
    }
}

fn lifetime_value(backend: &str, value: &Value) -> Result<u64> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| {
        CacheError::invalid_backend(
            backend,
            format!("{MAX_LIFETIME_OPTION} must be a non-negative integer, got {value}"),
        )
    })
}

/// Complete split cache configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitCacheConfig {
    /// Ordered levels, fastest first
    #[serde(default)]
    pub levels: Vec<LevelConfig>,
    /// Compression flag propagated to compression-capable levels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<bool>,
    /// zlib level in `[-1, 9]` propagated to compression-capable levels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_level: Option<i32>,
    /// Purge an entry from faster levels before writing it to a slower one
    #[serde(
        default,
        alias = "tempCacheContentWorkaround",
        deserialize_with = "deserialize_flag"
    )]
    pub faster_cache_eviction_workaround: bool,
    /// Lifetime used when `set` gets none (or zero)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_lifetime: Option<u64>,
}

/// Accept `true`/`false` as well as the `0`/`1` integers older configs use
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
    })
}

impl SplitCacheConfig {
    /// Parse a JSON configuration document
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read and parse a JSON configuration file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CacheError::Io {
            path: path.to_path_buf(),
            operation: "read config file",
            source: e,
            recovery_hint: RecoveryHint::CheckPermissions {
                path: path.to_path_buf(),
            },
        })?;

        Self::from_json_str(&content)
    }

    pub fn builder() -> SplitCacheConfigBuilder {
        SplitCacheConfigBuilder::new()
    }
}

/// Source of configuration for debugging and precedence tracking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default configuration
    Default,
    /// Configuration file
    ConfigFile(PathBuf),
    /// Environment variable
    EnvironmentVariable(String),
}

/// Configuration together with the source that last changed it
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: SplitCacheConfig,
    pub source: ConfigSource,
}

/// Builder for creating split cache configurations
#[derive(Debug, Default)]
pub struct SplitCacheConfigBuilder {
    config: SplitCacheConfig,
}

impl SplitCacheConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a level; levels are ordered fastest first
    pub fn with_level(mut self, level: LevelConfig) -> Self {
        self.config.levels.push(level);
        self
    }

    /// Set the global compression flag
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.config.compression = Some(enabled);
        self
    }

    /// Set the global compression level
    pub fn with_compression_level(mut self, level: i32) -> Self {
        self.config.compression_level = Some(level);
        self
    }

    /// Enable or disable the faster-cache eviction workaround
    pub fn with_eviction_workaround(mut self, enabled: bool) -> Self {
        self.config.faster_cache_eviction_workaround = enabled;
        self
    }

    /// Set the default lifetime in seconds
    pub fn with_default_lifetime(mut self, seconds: u64) -> Self {
        self.config.default_lifetime = Some(seconds);
        self
    }

    /// Build the configuration
    pub fn build(self) -> SplitCacheConfig {
        self.config
    }
}

/// Configuration loader that handles precedence
///
/// Defaults, then the config file, then `SPLITCACHE_*` environment variables.
pub struct SplitCacheConfigLoader;

impl SplitCacheConfigLoader {
    /// Load configuration from the default config file location
    pub fn load() -> Result<LoadedConfig> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from `path`, which may not exist
    pub fn load_from(path: &Path) -> Result<LoadedConfig> {
        let mut loaded = LoadedConfig {
            config: SplitCacheConfig::default(),
            source: ConfigSource::Default,
        };

        if path.exists() {
            loaded.config = SplitCacheConfig::from_path(path)?;
            loaded.source = ConfigSource::ConfigFile(path.to_path_buf());
        }

        if Self::apply_env(&mut loaded.config) {
            loaded.source = ConfigSource::EnvironmentVariable("SPLITCACHE_*".to_string());
        }

        Ok(loaded)
    }

    /// Override global options from environment variables
    ///
    /// Unparseable values are ignored. Returns whether anything was applied.
    fn apply_env(config: &mut SplitCacheConfig) -> bool {
        let mut has_env_config = false;

        if let Some(enabled) = env_flag(SPLITCACHE_COMPRESSION_VAR) {
            config.compression = Some(enabled);
            has_env_config = true;
        }

        if let Ok(level_str) = std::env::var(SPLITCACHE_COMPRESSION_LEVEL_VAR) {
            if let Ok(level) = level_str.trim().parse::<i32>() {
                config.compression_level = Some(level);
                has_env_config = true;
            }
        }

        if let Some(enabled) = env_flag(SPLITCACHE_EVICTION_WORKAROUND_VAR) {
            config.faster_cache_eviction_workaround = enabled;
            has_env_config = true;
        }

        if let Ok(lifetime_str) = std::env::var(SPLITCACHE_DEFAULT_LIFETIME_VAR) {
            if let Ok(lifetime) = lifetime_str.trim().parse::<u64>() {
                config.default_lifetime = Some(lifetime);
                has_env_config = true;
            }
        }

        has_env_config
    }

    /// Get the configuration file path
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config_home)
        } else {
            dirs::config_dir().ok_or_else(|| {
                CacheError::configuration(
                    "could not determine config directory, set XDG_CONFIG_HOME or HOME",
                )
            })?
        };

        Ok(config_dir.join("splitcache").join("config.json"))
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
