//! Entry identifier validation

use crate::constants::MAX_IDENTIFIER_LENGTH;
use crate::errors::{CacheError, Result};

/// Identifier validation for cache entries
pub trait CacheIdentifier: AsRef<str> {
    /// Validate that this is a valid entry identifier
    fn validate(&self) -> Result<()> {
        let id = self.as_ref();

        if id.is_empty() {
            return Err(CacheError::invalid_key(id, "Identifier cannot be empty"));
        }

        if id.len() > MAX_IDENTIFIER_LENGTH {
            let prefix: String = id.chars().take(50).collect();
            return Err(CacheError::invalid_key(
                format!("{prefix}..."),
                format!("Identifier exceeds maximum length of {MAX_IDENTIFIER_LENGTH} bytes"),
            ));
        }

        if let Some(ch) = id.chars().find(|ch| !is_identifier_char(*ch)) {
            return Err(CacheError::invalid_key(
                id,
                format!("Identifier contains invalid character {ch:?}"),
            ));
        }

        Ok(())
    }
}

impl<T: AsRef<str> + ?Sized> CacheIdentifier for T {}

#[inline]
fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '%' | '-' | '&')
}
