//! In-process memory backend
//!
//! Entries live in a concurrent map and disappear with the process. Payloads
//! are zlib-compressed when the level enables compression.

use crate::compression::CompressionSettings;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;
use splitcache_core::{
    parse_options, BackendContext, BackendOptions, CacheBackend, Result, DEFAULT_LIFETIME,
    UNLIMITED_LIFETIME,
};
use std::time::{Duration, Instant};
use tracing::trace;

/// Options accepted by [`MemoryBackend`]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MemoryBackendOptions {
    #[serde(default)]
    pub compression: bool,
    #[serde(default)]
    pub compression_level: Option<i32>,
    #[serde(default)]
    pub default_lifetime: Option<u64>,
}

#[derive(Debug)]
struct MemoryEntry {
    data: Vec<u8>,
    tags: Vec<String>,
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

/// Memory backend holding entries in a `DashMap`
#[derive(Debug)]
pub struct MemoryBackend {
    name: String,
    entries: DashMap<String, MemoryEntry>,
    compression: CompressionSettings,
    default_lifetime: u64,
}

impl MemoryBackend {
    /// Registry key
    pub const TYPE: &'static str = "memory";

    pub fn new(compression: CompressionSettings) -> Self {
        Self {
            name: Self::TYPE.to_string(),
            entries: DashMap::new(),
            compression,
            default_lifetime: DEFAULT_LIFETIME,
        }
    }

    pub fn from_options(context: &BackendContext, options: &BackendOptions) -> Result<Self> {
        let options: MemoryBackendOptions = parse_options(Self::TYPE, options)?;

        let mut backend = Self::new(CompressionSettings::new(
            options.compression,
            options.compression_level,
        ));
        backend.name = match context.level {
            Some(level) => format!("{}:{}[{level}]", Self::TYPE, context.cache_identifier()),
            None => format!("{}:{}", Self::TYPE, context.cache_identifier()),
        };
        if let Some(lifetime) = options.default_lifetime {
            backend.default_lifetime = lifetime;
        }

        Ok(backend)
    }

    pub fn compression(&self) -> CompressionSettings {
        self.compression
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn deadline(&self, lifetime: Option<u64>) -> Option<Instant> {
        match lifetime.unwrap_or(self.default_lifetime) {
            UNLIMITED_LIFETIME => None,
            seconds => Instant::now().checked_add(Duration::from_secs(seconds)),
        }
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn set(
        &self,
        id: &str,
        data: &[u8],
        tags: &[String],
        lifetime: Option<u64>,
    ) -> Result<()> {
        let entry = MemoryEntry {
            data: self.compression.encode(data)?,
            tags: tags.to_vec(),
            expires_at: self.deadline(lifetime),
        };

        trace!(backend = %self.name, id, bytes = entry.data.len(), "Stored entry");
        self.entries.insert(id.to_string(), entry);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Vec<u8>>> {
        let now = Instant::now();
        match self.entries.get(id) {
            Some(entry) if !entry.is_expired(now) => self.compression.decode(&entry.data).map(Some),
            _ => Ok(None),
        }
    }

    async fn has(&self, id: &str) -> Result<bool> {
        let now = Instant::now();
        Ok(self
            .entries
            .get(id)
            .is_some_and(|entry| !entry.is_expired(now)))
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        Ok(self.entries.remove(id).is_some())
    }

    async fn flush(&self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }

    async fn flush_by_tag(&self, tag: &str) -> Result<()> {
        self.entries
            .retain(|_, entry| !entry.tags.iter().any(|t| t == tag));
        Ok(())
    }

    async fn find_identifiers_by_tag(&self, tag: &str) -> Result<Vec<String>> {
        let now = Instant::now();
        let mut ids: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| !entry.is_expired(now) && entry.tags.iter().any(|t| t == tag))
            .map(|entry| entry.key().clone())
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn collect_garbage(&self) -> Result<()> {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        trace!(
            backend = %self.name,
            removed = before.saturating_sub(self.entries.len()),
            "Collected expired entries"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use splitcache_core::{CacheError, NamedFrontend};
    use std::sync::Arc;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn test_basic_operations() -> Result<()> {
        let backend = MemoryBackend::new(CompressionSettings::default());

        backend.set("key1", b"value1", &[], Some(60)).await?;
        assert_eq!(backend.get("key1").await?, Some(b"value1".to_vec()));
        assert!(backend.has("key1").await?);
        assert!(!backend.has("key2").await?);

        assert!(backend.remove("key1").await?);
        assert!(!backend.remove("key1").await?);
        assert_eq!(backend.get("key1").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_expiration_and_garbage_collection() -> Result<()> {
        let backend = MemoryBackend::new(CompressionSettings::default());

        backend.set("short", b"soon", &[], Some(1)).await?;
        backend.set("forever", b"kept", &[], Some(UNLIMITED_LIFETIME)).await?;
        assert!(backend.has("short").await?);

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert!(!backend.has("short").await?);
        assert_eq!(backend.get("short").await?, None);
        assert_eq!(backend.len(), 2);

        backend.collect_garbage().await?;
        assert_eq!(backend.len(), 1);
        assert!(backend.has("forever").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_tags() -> Result<()> {
        let backend = MemoryBackend::new(CompressionSettings::default());

        backend.set("a", b"1", &tags(&["pages"]), None).await?;
        backend.set("b", b"2", &tags(&["pages", "menu"]), None).await?;
        backend.set("c", b"3", &tags(&["menu"]), None).await?;

        assert_eq!(backend.find_identifiers_by_tag("pages").await?, vec!["a", "b"]);

        backend.flush_by_tag("menu").await?;
        assert!(backend.has("a").await?);
        assert!(!backend.has("b").await?);
        assert!(!backend.has("c").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_compressed_storage() -> Result<()> {
        let context = BackendContext::new(Arc::new(NamedFrontend::new("pages")));
        let mut options = BackendOptions::new();
        options.insert("compression".to_string(), json!(true));
        options.insert("compressionLevel".to_string(), json!(9));

        let backend = MemoryBackend::from_options(&context, &options)?;
        assert_eq!(backend.compression(), CompressionSettings::new(true, Some(9)));
        assert_eq!(backend.name(), "memory:pages");

        let payload = vec![b'x'; 2048];
        backend.set("big", &payload, &[], None).await?;
        assert!(backend.entries.get("big").unwrap().data.len() < payload.len());
        assert_eq!(backend.get("big").await?, Some(payload));
        Ok(())
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let context = BackendContext::new(Arc::new(NamedFrontend::new("pages")));
        let mut options = BackendOptions::new();
        options.insert("servers".to_string(), json!(["localhost"]));

        let err = MemoryBackend::from_options(&context, &options).unwrap_err();
        assert!(matches!(err, CacheError::InvalidBackend { .. }));
    }
}
