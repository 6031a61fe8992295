//! Error types shared by the routing layer and every cache backend

mod builders;
mod conversions;
mod recovery;
mod types;

pub use types::{CacheError, Error, RecoveryHint, Result, SerializationOp};
