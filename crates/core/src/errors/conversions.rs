//! Error conversion utilities

use super::types::{CacheError, RecoveryHint, SerializationOp};

/// Convert serde_json errors raised while reading configuration documents
impl From<serde_json::Error> for CacheError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            key: "configuration document".to_string(),
            operation: SerializationOp::Decode,
            source: Box::new(error),
            recovery_hint: RecoveryHint::Manual {
                instructions: "Check JSON format and data types".to_string(),
            },
        }
    }
}
