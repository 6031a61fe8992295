//! Shared helpers for split cache integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use splitcache::backends::MemoryBackend;
use splitcache::{
    BackendContext, BackendOptions, BackendRegistration, BackendRegistry, CacheBackend,
    CacheError, CacheFrontend, CompressionSettings, NamedFrontend, RecoveryHint, Result,
};
use splitcache_core::parse_options;
use std::sync::{Arc, Once};

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Calls observed by scripted backends, as `"<level>:<operation>"`
pub type CallLog = Arc<Mutex<Vec<String>>>;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ScriptedOptions {
    #[serde(default)]
    fail_on: Vec<String>,
}

/// Memory backend that records every call and fails selected operations
#[derive(Debug)]
pub struct ScriptedBackend {
    level: usize,
    fail_on: Vec<String>,
    inner: MemoryBackend,
    calls: CallLog,
}

impl ScriptedBackend {
    fn enter(&self, operation: &str) -> Result<()> {
        self.calls.lock().push(format!("{}:{operation}", self.level));
        if self.fail_on.iter().any(|op| op == operation) {
            return Err(CacheError::Unavailable {
                backend: format!("scripted[{}]", self.level),
                reason: format!("{operation} failed"),
                recovery_hint: RecoveryHint::NoRecovery,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CacheBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn set(
        &self,
        id: &str,
        data: &[u8],
        tags: &[String],
        lifetime: Option<u64>,
    ) -> Result<()> {
        self.enter("set")?;
        self.inner.set(id, data, tags, lifetime).await
    }

    async fn get(&self, id: &str) -> Result<Option<Vec<u8>>> {
        self.enter("get")?;
        self.inner.get(id).await
    }

    async fn has(&self, id: &str) -> Result<bool> {
        self.enter("has")?;
        self.inner.has(id).await
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        self.enter("remove")?;
        self.inner.remove(id).await
    }

    async fn flush(&self) -> Result<()> {
        self.enter("flush")?;
        self.inner.flush().await
    }

    async fn flush_by_tag(&self, tag: &str) -> Result<()> {
        self.enter("flush_by_tag")?;
        self.inner.flush_by_tag(tag).await
    }

    async fn find_identifiers_by_tag(&self, tag: &str) -> Result<Vec<String>> {
        self.enter("find_identifiers_by_tag")?;
        self.inner.find_identifiers_by_tag(tag).await
    }

    async fn collect_garbage(&self) -> Result<()> {
        self.enter("collect_garbage")?;
        self.inner.collect_garbage().await
    }
}

/// Registration for a scripted backend logging into `calls`
pub fn scripted_registration(calls: &CallLog) -> BackendRegistration {
    let log = Arc::clone(calls);
    BackendRegistration::new(move |context: &BackendContext, options: &BackendOptions| {
        let options: ScriptedOptions = parse_options("scripted", options)?;
        Ok(Box::new(ScriptedBackend {
            level: context.level.unwrap_or_default(),
            fail_on: options.fail_on,
            inner: MemoryBackend::new(CompressionSettings::default()),
            calls: Arc::clone(&log),
        }) as Box<dyn CacheBackend>)
    })
}

/// Built-in registry plus a `scripted` type logging into the returned call log
pub fn scripted_registry() -> (BackendRegistry, CallLog) {
    let calls: CallLog = Arc::default();
    let mut registry = BackendRegistry::with_builtin_backends();
    registry.register("scripted", scripted_registration(&calls));
    (registry, calls)
}

/// Drain and return recorded calls
pub fn take_calls(calls: &CallLog) -> Vec<String> {
    std::mem::take(&mut *calls.lock())
}

pub fn frontend(identifier: &str) -> Arc<dyn CacheFrontend> {
    Arc::new(NamedFrontend::new(identifier))
}
