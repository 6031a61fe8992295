//! Compression settings and zlib payload codec
//!
//! Compression is configured once on the split cache and pushed down into the
//! option maps of levels whose backend type supports it. Backends that accept
//! the settings compress payloads with zlib.

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde_json::Value;
use splitcache_core::options::{COMPRESSION_LEVEL_OPTION, COMPRESSION_OPTION};
use splitcache_core::{
    BackendOptions, CacheError, Result, MAX_COMPRESSION_LEVEL, MIN_COMPRESSION_LEVEL,
};
use std::io::{Read, Write};
use tracing::warn;

/// zlib level used when `-1` (implementation default) is requested
pub const ZLIB_DEFAULT_LEVEL: u32 = 6;

/// Compression options set on the split cache, propagated to child levels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressionDefaults {
    /// Global `compression` flag, if configured
    pub compression: Option<bool>,
    /// Global `compressionLevel`, if configured and within `[-1, 9]`
    pub compression_level: Option<i32>,
}

impl CompressionDefaults {
    pub fn new(compression: Option<bool>, compression_level: Option<i32>) -> Self {
        Self {
            compression,
            compression_level: compression_level.and_then(checked_level),
        }
    }

    /// Copy configured values into `options` where the level left them out
    ///
    /// Callers only invoke this for backend types that support compression.
    /// Returns the option keys that were written.
    pub fn apply_to(&self, options: &mut BackendOptions) -> Vec<&'static str> {
        let mut applied = Vec::new();

        let values = [
            (COMPRESSION_OPTION, self.compression.map(Value::from)),
            (COMPRESSION_LEVEL_OPTION, self.compression_level.map(Value::from)),
        ];

        for (key, value) in values {
            if let Some(value) = value {
                if !options.contains_key(key) {
                    options.insert(key.to_string(), value);
                    applied.push(key);
                }
            }
        }

        applied
    }
}

/// Validate a compression level, warning about and dropping bad values
pub fn checked_level(level: i32) -> Option<i32> {
    if (MIN_COMPRESSION_LEVEL..=MAX_COMPRESSION_LEVEL).contains(&level) {
        Some(level)
    } else {
        warn!(
            level,
            "Ignoring compression level outside [{MIN_COMPRESSION_LEVEL}, {MAX_COMPRESSION_LEVEL}]"
        );
        None
    }
}

/// Effective compression of a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionSettings {
    /// Whether payloads are compressed
    pub enabled: bool,
    /// zlib level, `-1` meaning the zlib default
    pub level: i32,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            level: MIN_COMPRESSION_LEVEL,
        }
    }
}

impl CompressionSettings {
    pub fn new(enabled: bool, level: Option<i32>) -> Self {
        Self {
            enabled,
            level: level.and_then(checked_level).unwrap_or(MIN_COMPRESSION_LEVEL),
        }
    }

    fn zlib_level(&self) -> Compression {
        match u32::try_from(self.level) {
            Ok(level) => Compression::new(level),
            Err(_) => Compression::new(ZLIB_DEFAULT_LEVEL),
        }
    }

    /// Compress `data` if compression is enabled
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        if !self.enabled {
            return Ok(data.to_vec());
        }

        let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), self.zlib_level());
        encoder
            .write_all(data)
            .map_err(|e| CacheError::compression("compress payload", e))?;
        encoder
            .finish()
            .map_err(|e| CacheError::compression("finish compressed payload", e))
    }

    /// Inverse of [`encode`](Self::encode)
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        if !self.enabled {
            return Ok(data.to_vec());
        }

        let mut decoder = ZlibDecoder::new(data);
        let mut out = Vec::with_capacity(data.len() * 2);
        decoder
            .read_to_end(&mut out)
            .map_err(|e| CacheError::compression("decompress payload", e))?;
        Ok(out)
    }
}
