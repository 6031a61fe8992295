//! Backend option maps

use crate::errors::{CacheError, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Free-form option map handed to a backend constructor
pub type BackendOptions = Map<String, Value>;

/// Option key enabling payload compression
pub const COMPRESSION_OPTION: &str = "compression";

/// Option key selecting the zlib compression level
pub const COMPRESSION_LEVEL_OPTION: &str = "compressionLevel";

/// Option key carrying a level's maximum lifetime inside its option map
pub const MAX_LIFETIME_OPTION: &str = "maxLifetime";

/// Decode an option map into a backend's typed options
///
/// Failures become [`CacheError::InvalidBackend`] for `backend_type`.
pub fn parse_options<T>(backend_type: &str, options: &BackendOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_value(Value::Object(options.clone()))
        .map_err(|e| CacheError::invalid_backend(backend_type, format!("invalid options: {e}")))
}
