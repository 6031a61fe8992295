//! File system backend
//!
//! One file per entry under the cache directory. The file name is the
//! hex-encoded SHA-256 of the identifier and the content a bincode envelope
//! carrying the identifier, expiry time and tags along with the payload.
//! Payloads are stored as given: this backend does not take part in
//! compression propagation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use splitcache_core::{
    parse_options, BackendContext, BackendOptions, CacheBackend, CacheError, Result,
    DEFAULT_LIFETIME, UNLIMITED_LIFETIME,
};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;
use tracing::{debug, trace};

const ENTRY_EXTENSION: &str = "entry";

/// Options accepted by [`FileBackend`]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileBackendOptions {
    /// Directory holding entry files
    #[serde(default)]
    pub cache_directory: Option<PathBuf>,
    #[serde(default)]
    pub default_lifetime: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FileEntry {
    id: String,
    /// Unix timestamp after which the entry is stale
    expires_at: Option<u64>,
    tags: Vec<String>,
    data: Vec<u8>,
}

impl FileEntry {
    fn is_expired(&self, now: u64) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

/// Backend storing entries as files
#[derive(Debug)]
pub struct FileBackend {
    name: String,
    directory: PathBuf,
    default_lifetime: u64,
    temp_counter: AtomicU64,
}

impl FileBackend {
    /// Registry key
    pub const TYPE: &'static str = "file";

    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            name: Self::TYPE.to_string(),
            directory: directory.into(),
            default_lifetime: DEFAULT_LIFETIME,
            temp_counter: AtomicU64::new(0),
        }
    }

    pub fn from_options(context: &BackendContext, options: &BackendOptions) -> Result<Self> {
        let options: FileBackendOptions = parse_options(Self::TYPE, options)?;

        let directory = match options.cache_directory {
            Some(directory) => directory,
            None => default_directory(context.cache_identifier(), context.level),
        };

        let mut backend = Self::new(directory);
        backend.name = format!("{}:{}", Self::TYPE, context.cache_identifier());
        if let Some(lifetime) = options.default_lifetime {
            backend.default_lifetime = lifetime;
        }

        Ok(backend)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Fixed-length file name, whatever the identifier length
    fn entry_path(&self, id: &str) -> PathBuf {
        let digest = Sha256::digest(id.as_bytes());
        self.directory
            .join(format!("{}.{ENTRY_EXTENSION}", hex::encode(digest)))
    }

    async fn read_entry(&self, path: &Path) -> Result<Option<FileEntry>> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::io(path, "read cache entry", e)),
        };

        bincode::deserialize(&bytes)
            .map(Some)
            .map_err(|e| CacheError::decode(path.display().to_string(), e))
    }

    async fn read_live_entry(&self, id: &str) -> Result<Option<FileEntry>> {
        let path = self.entry_path(id);
        let now = unix_now();
        Ok(self
            .read_entry(&path)
            .await?
            .filter(|entry| entry.id == id && !entry.is_expired(now)))
    }

    /// Write `bytes` to `path` through a temporary file and a rename
    async fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(ENTRY_EXTENSION);
        let temp_path = self.directory.join(format!(
            ".{file_name}.{}-{}.tmp",
            std::process::id(),
            self.temp_counter.fetch_add(1, Ordering::Relaxed)
        ));

        if let Err(e) = fs::write(&temp_path, bytes).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(CacheError::io(&temp_path, "write temporary file", e));
        }

        if let Err(e) = fs::rename(&temp_path, path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(CacheError::io(path, "atomic rename", e));
        }

        Ok(())
    }

    /// Every entry file in the cache directory
    async fn entry_files(&self) -> Result<Vec<PathBuf>> {
        let mut dir = match fs::read_dir(&self.directory).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CacheError::io(&self.directory, "read cache directory", e)),
        };

        let mut files = Vec::new();
        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|e| CacheError::io(&self.directory, "read cache directory", e))?
        {
            let path = item.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(ENTRY_EXTENSION) {
                trace!(path = %path.display(), "Skipping foreign file in cache directory");
                continue;
            }
            files.push(path);
        }

        files.sort();
        Ok(files)
    }

    async fn remove_path(path: &Path) -> Result<bool> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CacheError::io(path, "remove cache entry", e)),
        }
    }
}

/// `<cache dir>/splitcache/<identifier>`, plus `level-<n>` for split levels
fn default_directory(cache_identifier: &str, level: Option<usize>) -> PathBuf {
    let directory = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("splitcache")
        .join(cache_identifier);

    match level {
        Some(level) => directory.join(format!("level-{level}")),
        None => directory,
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[async_trait]
impl CacheBackend for FileBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn initialize(&mut self) -> Result<()> {
        fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| CacheError::io(&self.directory, "create cache directory", e))?;
        debug!(backend = %self.name, directory = %self.directory.display(), "Initialized file cache");
        Ok(())
    }

    async fn set(
        &self,
        id: &str,
        data: &[u8],
        tags: &[String],
        lifetime: Option<u64>,
    ) -> Result<()> {
        let expires_at = match lifetime.unwrap_or(self.default_lifetime) {
            UNLIMITED_LIFETIME => None,
            seconds => Some(unix_now().saturating_add(seconds)),
        };

        let entry = FileEntry {
            id: id.to_string(),
            expires_at,
            tags: tags.to_vec(),
            data: data.to_vec(),
        };
        let bytes = bincode::serialize(&entry).map_err(|e| CacheError::encode(id, e))?;

        self.write_atomic(&self.entry_path(id), &bytes).await
    }

    async fn get(&self, id: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.read_live_entry(id).await?.map(|entry| entry.data))
    }

    async fn has(&self, id: &str) -> Result<bool> {
        Ok(self.read_live_entry(id).await?.is_some())
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        Self::remove_path(&self.entry_path(id)).await
    }

    async fn flush(&self) -> Result<()> {
        for path in self.entry_files().await? {
            Self::remove_path(&path).await?;
        }
        Ok(())
    }

    async fn flush_by_tag(&self, tag: &str) -> Result<()> {
        for path in self.entry_files().await? {
            if let Some(entry) = self.read_entry(&path).await? {
                if entry.tags.iter().any(|t| t == tag) {
                    Self::remove_path(&path).await?;
                }
            }
        }
        Ok(())
    }

    async fn find_identifiers_by_tag(&self, tag: &str) -> Result<Vec<String>> {
        let now = unix_now();
        let mut ids = Vec::new();

        for path in self.entry_files().await? {
            if let Some(entry) = self.read_entry(&path).await? {
                if !entry.is_expired(now) && entry.tags.iter().any(|t| t == tag) {
                    ids.push(entry.id);
                }
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }

    async fn collect_garbage(&self) -> Result<()> {
        let now = unix_now();

        for path in self.entry_files().await? {
            if let Some(entry) = self.read_entry(&path).await? {
                if entry.is_expired(now) {
                    Self::remove_path(&path).await?;
                }
            }
        }
        Ok(())
    }
}
