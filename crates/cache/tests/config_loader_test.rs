//! Configuration loading precedence: defaults, file, then environment

mod common;

use common::frontend;
use serial_test::serial;
use splitcache::{
    CacheBackend, ConfigSource, SplitBackend, SplitCacheConfig, SplitCacheConfigLoader,
};
use splitcache_core::{
    SPLITCACHE_COMPRESSION_LEVEL_VAR, SPLITCACHE_COMPRESSION_VAR,
    SPLITCACHE_DEFAULT_LIFETIME_VAR, SPLITCACHE_EVICTION_WORKAROUND_VAR,
};
use std::path::PathBuf;
use tempfile::TempDir;

const VARS: [&str; 4] = [
    SPLITCACHE_COMPRESSION_VAR,
    SPLITCACHE_COMPRESSION_LEVEL_VAR,
    SPLITCACHE_EVICTION_WORKAROUND_VAR,
    SPLITCACHE_DEFAULT_LIFETIME_VAR,
];

/// Clears the loader's environment variables on creation and drop
struct EnvGuard;

impl EnvGuard {
    fn new() -> Self {
        for var in VARS {
            std::env::remove_var(var);
        }
        Self
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in VARS {
            std::env::remove_var(var);
        }
    }
}

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("config.json");
    std::fs::write(&path, content).unwrap();
    path
}

const FILE_CONFIG: &str = r#"{
    "compression": true,
    "compressionLevel": 2,
    "defaultLifetime": 900,
    "levels": [
        { "backend": "memory", "maxLifetime": 60 },
        { "backend": "memory" }
    ]
}"#;

#[test]
#[serial]
fn test_missing_file_yields_defaults() {
    let _env = EnvGuard::new();
    let dir = TempDir::new().unwrap();

    let loaded = SplitCacheConfigLoader::load_from(&dir.path().join("absent.json")).unwrap();
    assert_eq!(loaded.source, ConfigSource::Default);
    assert_eq!(loaded.config, SplitCacheConfig::default());
}

#[test]
#[serial]
fn test_file_values_are_loaded() {
    let _env = EnvGuard::new();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, FILE_CONFIG);

    let loaded = SplitCacheConfigLoader::load_from(&path).unwrap();
    assert_eq!(loaded.source, ConfigSource::ConfigFile(path));
    assert_eq!(loaded.config.compression, Some(true));
    assert_eq!(loaded.config.compression_level, Some(2));
    assert_eq!(loaded.config.default_lifetime, Some(900));
    assert_eq!(loaded.config.levels.len(), 2);
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    let _env = EnvGuard::new();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, FILE_CONFIG);

    std::env::set_var(SPLITCACHE_COMPRESSION_VAR, "off");
    std::env::set_var(SPLITCACHE_COMPRESSION_LEVEL_VAR, "4");
    std::env::set_var(SPLITCACHE_EVICTION_WORKAROUND_VAR, "yes");
    std::env::set_var(SPLITCACHE_DEFAULT_LIFETIME_VAR, " 120 ");

    let loaded = SplitCacheConfigLoader::load_from(&path).unwrap();
    assert!(matches!(loaded.source, ConfigSource::EnvironmentVariable(_)));
    assert_eq!(loaded.config.compression, Some(false));
    assert_eq!(loaded.config.compression_level, Some(4));
    assert!(loaded.config.faster_cache_eviction_workaround);
    assert_eq!(loaded.config.default_lifetime, Some(120));
    // Levels only come from the file
    assert_eq!(loaded.config.levels.len(), 2);
}

#[test]
#[serial]
fn test_unparseable_environment_is_ignored() {
    let _env = EnvGuard::new();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, FILE_CONFIG);

    std::env::set_var(SPLITCACHE_COMPRESSION_VAR, "maybe");
    std::env::set_var(SPLITCACHE_DEFAULT_LIFETIME_VAR, "-5");

    let loaded = SplitCacheConfigLoader::load_from(&path).unwrap();
    assert_eq!(loaded.source, ConfigSource::ConfigFile(path));
    assert_eq!(loaded.config.compression, Some(true));
    assert_eq!(loaded.config.default_lifetime, Some(900));
}

#[test]
#[serial]
fn test_broken_file_is_an_error() {
    let _env = EnvGuard::new();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"{ "levels": [ { "backend": } ] }"#);

    assert!(SplitCacheConfigLoader::load_from(&path).is_err());
}

#[test]
#[serial]
fn test_default_location_follows_xdg_config_home() {
    let _env = EnvGuard::new();
    let dir = TempDir::new().unwrap();
    let previous = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", dir.path());

    let expected = dir.path().join("splitcache").join("config.json");
    assert_eq!(SplitCacheConfigLoader::config_file_path().unwrap(), expected);

    std::fs::create_dir_all(expected.parent().unwrap()).unwrap();
    std::fs::write(&expected, FILE_CONFIG).unwrap();
    let loaded = SplitCacheConfigLoader::load();

    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    let loaded = loaded.unwrap();
    assert_eq!(loaded.source, ConfigSource::ConfigFile(expected));
}

#[tokio::test]
#[serial]
async fn test_loaded_config_builds_cache() {
    let _env = EnvGuard::new();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, FILE_CONFIG);
    std::env::set_var(SPLITCACHE_DEFAULT_LIFETIME_VAR, "30");

    let loaded = SplitCacheConfigLoader::load_from(&path).unwrap();
    let cache = SplitBackend::new(loaded.config, frontend("pages"))
        .await
        .unwrap();

    assert_eq!(cache.default_lifetime(), 30);
    cache.set("teaser", b"short", &[], None).await.unwrap();
    assert!(cache.levels()[0].backend().has("teaser").await.unwrap());
    assert_eq!(
        cache.levels()[0].options().get("compressionLevel"),
        Some(&serde_json::json!(2))
    );
}
