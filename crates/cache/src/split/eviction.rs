//! Faster-cache eviction
//!
//! When an entry is rewritten with a longer lifetime it lands in a slower
//! level, while a copy from an earlier, shorter-lived write may still sit in
//! a faster one. Since reads return the fastest hit, that copy has to go
//! before the new value is written.

use crate::levels::LevelTable;
use splitcache_core::Result;
use tracing::debug;

/// Remove `id` from every level below `target`, hit or miss
pub(super) async fn purge_faster_levels(
    levels: &LevelTable,
    id: &str,
    target: usize,
) -> Result<()> {
    for level in levels.iter().take(target) {
        let removed = level.backend().remove(id).await?;
        if removed {
            debug!(id, level = level.ordinal(), target, "Purged stale copy from faster level");
        }
    }
    Ok(())
}
