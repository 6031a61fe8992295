//! Factory for creating level backends

use splitcache_core::{BackendContext, BackendOptions, CacheBackend, Result};
use tracing::debug;

use super::BackendRegistry;

/// Resolve `backend_type`, construct it with `options`, and run its
/// one-time initialization hook
pub async fn create_backend(
    registry: &BackendRegistry,
    backend_type: &str,
    options: &BackendOptions,
    context: &BackendContext,
) -> Result<Box<dyn CacheBackend>> {
    let registration = registry.resolve(backend_type)?;

    let mut backend = registration.construct(context, options)?;
    backend.initialize().await?;

    debug!(
        backend_type,
        backend = backend.name(),
        level = ?context.level,
        application_context = %context.application_context,
        "Constructed cache backend"
    );

    Ok(backend)
}
