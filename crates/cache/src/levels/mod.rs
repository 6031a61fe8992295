//! Level table: the ordered, immutable list of configured cache levels

mod builder;
mod router;
mod threshold;

pub use threshold::Threshold;

use splitcache_core::{BackendOptions, CacheBackend};
use std::fmt;
use std::ops::Index;

/// One configured level
pub struct Level {
    ordinal: usize,
    backend_type: String,
    threshold: Threshold,
    options: BackendOptions,
    backend: Box<dyn CacheBackend>,
}

impl Level {
    /// Position of this level, 0 being the fastest
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Type key the backend was resolved from
    pub fn backend_type(&self) -> &str {
        &self.backend_type
    }

    /// Longest lifetime routed to this level
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Options the backend was constructed with, after compression propagation
    pub fn options(&self) -> &BackendOptions {
        &self.options
    }

    pub fn backend(&self) -> &dyn CacheBackend {
        self.backend.as_ref()
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Level")
            .field("ordinal", &self.ordinal)
            .field("backend_type", &self.backend_type)
            .field("threshold", &self.threshold)
            .field("backend", &self.backend.name())
            .finish()
    }
}

/// Levels in ascending ordinal order; never empty
#[derive(Debug)]
pub struct LevelTable {
    levels: Vec<Level>,
}

impl LevelTable {
    /// Index of the catch-all level
    pub fn max_level(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, ordinal: usize) -> Option<&Level> {
        self.levels.get(ordinal)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Level> {
        self.levels.iter()
    }

    /// Thresholds in ordinal order
    pub fn thresholds(&self) -> Vec<Threshold> {
        self.levels.iter().map(Level::threshold).collect()
    }
}

impl Index<usize> for LevelTable {
    type Output = Level;

    fn index(&self, ordinal: usize) -> &Level {
        &self.levels[ordinal]
    }
}

impl<'a> IntoIterator for &'a LevelTable {
    type Item = &'a Level;
    type IntoIter = std::slice::Iter<'a, Level>;

    fn into_iter(self) -> Self::IntoIter {
        self.levels.iter()
    }
}
