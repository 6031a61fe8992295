//! Lifetime thresholds and their derivation

use splitcache_core::UNLIMITED_LIFETIME;
use std::fmt;

/// Longest lifetime a level accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    /// Lifetimes up to and including this many seconds
    Bounded(u64),
    /// Any lifetime
    Unbounded,
}

impl Threshold {
    /// Whether an entry with `lifetime` seconds may be routed here
    ///
    /// Comparison is numeric: a lifetime of 0 ("unlimited") is admitted by
    /// every threshold.
    pub fn admits(self, lifetime: u64) -> bool {
        match self {
            Self::Bounded(max) => max >= lifetime,
            Self::Unbounded => true,
        }
    }

    pub fn is_bounded(self) -> bool {
        matches!(self, Self::Bounded(_))
    }

    /// Resolve a level's requested threshold against the running maximum of
    /// the levels before it
    ///
    /// A missing or zero request means no limit. A bounded request that does
    /// not strictly exceed the running maximum is bumped to `max + 1`; once
    /// the running maximum is unbounded every later threshold is unbounded.
    pub fn derive(requested: Option<u64>, running_max: Option<Threshold>) -> Self {
        let requested = match requested {
            None | Some(UNLIMITED_LIFETIME) => return Self::Unbounded,
            Some(seconds) => seconds,
        };

        match running_max {
            None => Self::Bounded(requested),
            Some(Self::Bounded(max)) if requested > max => Self::Bounded(requested),
            Some(Self::Bounded(max)) => Self::Bounded(max.saturating_add(1)),
            Some(Self::Unbounded) => Self::Unbounded,
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(seconds) => write!(f, "{seconds}s"),
            Self::Unbounded => f.write_str("unbounded"),
        }
    }
}
