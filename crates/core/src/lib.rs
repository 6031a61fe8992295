//! Core types, errors, and the capability contract for `splitcache`.
//!
//! ## Key Components
//!
//! - **`traits`**: the [`CacheBackend`] capability contract implemented by
//!   every storage backend and by the split cache itself, plus the
//!   [`CacheFrontend`] binding.
//! - **`errors`**: the [`CacheError`] enum and `Result` alias.
//! - **`context`**: [`BackendContext`], handed to backend constructors.
//! - **`options`**: option maps and their typed decoding.
//! - **`constants`**: lifetimes, limits, and environment variable names.

pub mod constants;
pub mod context;
pub mod errors;
pub mod identifier;
pub mod options;
pub mod traits;

pub use self::{
    constants::*,
    context::BackendContext,
    errors::{CacheError, Error, RecoveryHint, Result, SerializationOp},
    identifier::CacheIdentifier,
    options::{parse_options, BackendOptions},
    traits::{CacheBackend, CacheFrontend, NamedFrontend},
};
