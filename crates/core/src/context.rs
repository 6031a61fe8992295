//! Construction context handed to backend constructors

use crate::constants::DEFAULT_APPLICATION_CONTEXT;
use crate::traits::CacheFrontend;
use std::sync::Arc;

/// Everything a backend constructor may need besides its option map
#[derive(Debug, Clone)]
pub struct BackendContext {
    /// Application context the cache runs in
    pub application_context: String,
    /// Frontend the backend serves
    pub frontend: Arc<dyn CacheFrontend>,
    /// Ordinal of the level being built, when built by a split cache
    pub level: Option<usize>,
}

impl BackendContext {
    pub fn new(frontend: Arc<dyn CacheFrontend>) -> Self {
        Self {
            application_context: DEFAULT_APPLICATION_CONTEXT.to_string(),
            frontend,
            level: None,
        }
    }

    #[must_use]
    pub fn for_level(&self, level: usize) -> Self {
        Self {
            level: Some(level),
            ..self.clone()
        }
    }

    /// Identifier of the bound frontend
    pub fn cache_identifier(&self) -> &str {
        self.frontend.identifier()
    }
}
