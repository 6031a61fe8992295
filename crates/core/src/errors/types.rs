//! Core error types for cache backends

use std::path::PathBuf;
use std::time::Duration;

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Short alias used by backend implementations
pub use CacheError as Error;

/// Error type for every operation of the capability contract
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// A level's backend type is unknown or its options cannot be applied
    #[error("invalid backend configuration for '{backend_type}': {reason}")]
    InvalidBackend {
        backend_type: String,
        reason: String,
        recovery_hint: RecoveryHint,
    },

    /// Configuration could not be read or is inconsistent
    #[error("configuration error: {message}")]
    Configuration {
        message: String,
        recovery_hint: RecoveryHint,
    },

    /// Entry identifier failed validation
    #[error("invalid cache identifier '{key}': {reason}")]
    InvalidKey {
        key: String,
        reason: String,
        recovery_hint: RecoveryHint,
    },

    /// I/O errors raised by storage backends
    #[error("I/O error during {operation} on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: std::io::Error,
        recovery_hint: RecoveryHint,
    },

    /// Entry envelope could not be encoded or decoded
    #[error("failed to {operation:?} cache entry '{key}': {source}")]
    Serialization {
        key: String,
        operation: SerializationOp,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
        recovery_hint: RecoveryHint,
    },

    /// Payload compression or decompression failed
    #[error("compression error during {operation}: {source}")]
    Compression {
        operation: &'static str,
        #[source]
        source: std::io::Error,
        recovery_hint: RecoveryHint,
    },

    /// Backend is temporarily unable to serve the request
    #[error("cache backend '{backend}' unavailable: {reason}")]
    Unavailable {
        backend: String,
        reason: String,
        recovery_hint: RecoveryHint,
    },
}

/// Recovery hints for error handling
#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryHint {
    /// Retry the operation after a delay
    Retry { after: Duration },

    /// Check file permissions
    CheckPermissions { path: PathBuf },

    /// Flush the cache and retry
    ClearAndRetry,

    /// Fix the cache configuration
    UpdateConfiguration,

    /// No automated recovery possible
    Manual { instructions: String },

    /// No recovery possible
    NoRecovery,
}

/// Serialization operation types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializationOp {
    Encode,
    Decode,
}
