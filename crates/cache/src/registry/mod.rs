//! Backend registry mapping type keys to constructors
//!
//! Each registration pairs a constructor with a `supports_compression`
//! capability flag, consulted when global compression options are pushed
//! down into a level.

mod factory;

pub use factory::create_backend;

use crate::backends::{FileBackend, MemoryBackend, NullBackend};
use splitcache_core::{BackendContext, BackendOptions, CacheBackend, CacheError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Constructor producing an uninitialized backend from its options
pub type BackendConstructor = Arc<
    dyn Fn(&BackendContext, &BackendOptions) -> Result<Box<dyn CacheBackend>> + Send + Sync,
>;

/// A constructible backend type
#[derive(Clone)]
pub struct BackendRegistration {
    constructor: BackendConstructor,
    supports_compression: bool,
}

impl BackendRegistration {
    pub fn new<F>(constructor: F) -> Self
    where
        F: Fn(&BackendContext, &BackendOptions) -> Result<Box<dyn CacheBackend>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            constructor: Arc::new(constructor),
            supports_compression: false,
        }
    }

    #[must_use]
    pub fn with_compression_support(mut self, supported: bool) -> Self {
        self.supports_compression = supported;
        self
    }

    /// Whether global compression options may be propagated to this type
    pub fn supports_compression(&self) -> bool {
        self.supports_compression
    }

    pub(crate) fn construct(
        &self,
        context: &BackendContext,
        options: &BackendOptions,
    ) -> Result<Box<dyn CacheBackend>> {
        (self.constructor)(context, options)
    }
}

impl fmt::Debug for BackendRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistration")
            .field("supports_compression", &self.supports_compression)
            .finish_non_exhaustive()
    }
}

/// Registry of backend types available to split cache levels
#[derive(Debug, Clone)]
pub struct BackendRegistry {
    registrations: HashMap<String, BackendRegistration>,
}

impl BackendRegistry {
    /// An empty registry
    pub fn empty() -> Self {
        Self {
            registrations: HashMap::new(),
        }
    }

    /// A registry holding the bundled `memory`, `file` and `null` backends
    pub fn with_builtin_backends() -> Self {
        let mut registry = Self::empty();

        registry.register(
            MemoryBackend::TYPE,
            BackendRegistration::new(|context, options| {
                Ok(Box::new(MemoryBackend::from_options(context, options)?))
            })
            .with_compression_support(true),
        );
        registry.register(
            FileBackend::TYPE,
            BackendRegistration::new(|context, options| {
                Ok(Box::new(FileBackend::from_options(context, options)?))
            }),
        );
        registry.register(
            NullBackend::TYPE,
            BackendRegistration::new(|context, options| {
                Ok(Box::new(NullBackend::from_options(context, options)?))
            }),
        );

        registry
    }

    /// Register (or replace) a backend type; keys are case-insensitive
    pub fn register(
        &mut self,
        backend_type: impl AsRef<str>,
        registration: BackendRegistration,
    ) -> Option<BackendRegistration> {
        self.registrations
            .insert(normalize(backend_type.as_ref()), registration)
    }

    pub fn contains(&self, backend_type: &str) -> bool {
        self.registrations.contains_key(&normalize(backend_type))
    }

    /// Look up the registration for `backend_type`
    pub fn resolve(&self, backend_type: &str) -> Result<&BackendRegistration> {
        self.registrations
            .get(&normalize(backend_type))
            .ok_or_else(|| {
                CacheError::invalid_backend(backend_type, "is not a registered cache backend type")
            })
    }

    /// Registered type keys, sorted
    pub fn backend_types(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.registrations.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_builtin_backends()
    }
}

fn normalize(backend_type: &str) -> String {
    backend_type.trim().to_lowercase()
}
