//! Builder methods for common errors

use super::types::{CacheError, RecoveryHint, SerializationOp};
use std::path::PathBuf;

impl CacheError {
    /// Create an invalid backend configuration error
    #[must_use]
    pub fn invalid_backend(backend_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBackend {
            backend_type: backend_type.into(),
            reason: reason.into(),
            recovery_hint: RecoveryHint::UpdateConfiguration,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            recovery_hint: RecoveryHint::UpdateConfiguration,
        }
    }

    /// Create an invalid identifier error
    #[must_use]
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
            recovery_hint: RecoveryHint::Manual {
                instructions: "Use identifiers made of [A-Za-z0-9_%-&], at most 250 bytes"
                    .to_string(),
            },
        }
    }

    /// Create an I/O error bound to a path
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, operation: &'static str, source: std::io::Error) -> Self {
        let path = path.into();
        let recovery_hint = match source.kind() {
            std::io::ErrorKind::PermissionDenied => RecoveryHint::CheckPermissions {
                path: path.clone(),
            },
            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut => RecoveryHint::Retry {
                after: std::time::Duration::from_millis(100),
            },
            _ => RecoveryHint::NoRecovery,
        };

        Self::Io {
            path,
            operation,
            source,
            recovery_hint,
        }
    }

    /// Create an envelope decoding error
    #[must_use]
    pub fn decode(
        key: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Serialization {
            key: key.into(),
            operation: SerializationOp::Decode,
            source: source.into(),
            recovery_hint: RecoveryHint::ClearAndRetry,
        }
    }

    /// Create an envelope encoding error
    #[must_use]
    pub fn encode(
        key: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Serialization {
            key: key.into(),
            operation: SerializationOp::Encode,
            source: source.into(),
            recovery_hint: RecoveryHint::NoRecovery,
        }
    }

    /// Create a compression error
    #[must_use]
    pub fn compression(operation: &'static str, source: std::io::Error) -> Self {
        Self::Compression {
            operation,
            source,
            recovery_hint: RecoveryHint::ClearAndRetry,
        }
    }
}
