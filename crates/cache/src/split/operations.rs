//! Capability contract for the split cache

use async_trait::async_trait;
use splitcache_core::{CacheBackend, CacheIdentifier, Result};
use tracing::{debug, trace};

use super::eviction::purge_faster_levels;
use super::SplitBackend;

#[async_trait]
impl CacheBackend for SplitBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn set(
        &self,
        id: &str,
        data: &[u8],
        tags: &[String],
        lifetime: Option<u64>,
    ) -> Result<()> {
        id.validate()?;

        let lifetime = self.resolve_lifetime(lifetime);
        let target = self.levels.route_for(lifetime);
        debug!(id, lifetime, level = target, "Routing cache write");

        if self.eviction_workaround && target > 0 {
            purge_faster_levels(&self.levels, id, target).await?;
        }

        self.levels[target]
            .backend()
            .set(id, data, tags, Some(lifetime))
            .await
    }

    async fn get(&self, id: &str) -> Result<Option<Vec<u8>>> {
        id.validate()?;

        for level in &self.levels {
            if let Some(data) = level.backend().get(id).await? {
                trace!(id, level = level.ordinal(), "Cache hit");
                return Ok(Some(data));
            }
        }

        trace!(id, "Cache miss on every level");
        Ok(None)
    }

    async fn has(&self, id: &str) -> Result<bool> {
        id.validate()?;

        for level in &self.levels {
            if level.backend().has(id).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Removes the entry from the first level holding it and stops there
    ///
    /// Copies left in slower levels (possible when the eviction workaround is
    /// off) survive and become visible to later reads.
    async fn remove(&self, id: &str) -> Result<bool> {
        id.validate()?;

        for level in &self.levels {
            if level.backend().has(id).await? {
                level.backend().remove(id).await?;
                debug!(id, level = level.ordinal(), "Removed entry");
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn flush(&self) -> Result<()> {
        for level in &self.levels {
            level.backend().flush().await?;
        }
        debug!(levels = self.levels.len(), "Flushed all levels");
        Ok(())
    }

    // Tag operations are not routed to levels.
    async fn flush_by_tag(&self, tag: &str) -> Result<()> {
        trace!(tag, "flush_by_tag is not supported by the split cache");
        Ok(())
    }

    async fn find_identifiers_by_tag(&self, tag: &str) -> Result<Vec<String>> {
        trace!(tag, "find_identifiers_by_tag is not supported by the split cache");
        Ok(Vec::new())
    }

    /// Each level expires its own entries
    async fn collect_garbage(&self) -> Result<()> {
        debug!("Garbage collection is left to the levels");
        Ok(())
    }
}
