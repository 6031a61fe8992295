//! Lifetime-to-level routing

use super::LevelTable;

impl LevelTable {
    /// Index of the level an entry with `lifetime` seconds is written to
    ///
    /// The first level whose threshold admits the lifetime wins; lifetimes no
    /// threshold admits go to the catch-all level. Comparison is numeric, so
    /// an unlimited lifetime (`0`) lands on level 0.
    pub fn route_for(&self, lifetime: u64) -> usize {
        let max_level = self.max_level();

        self.levels
            .iter()
            .position(|level| level.ordinal == max_level || level.threshold.admits(lifetime))
            .unwrap_or(max_level)
    }
}
