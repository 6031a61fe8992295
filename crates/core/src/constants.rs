/// Constants used throughout the splitcache codebase
// Lifetimes, in seconds
pub const UNLIMITED_LIFETIME: u64 = 0;
pub const DEFAULT_LIFETIME: u64 = 3600;

// Identifier rules shared with the cache frontend
pub const MAX_IDENTIFIER_LENGTH: usize = 250;

// Compression levels accepted by zlib-backed backends
pub const MIN_COMPRESSION_LEVEL: i32 = -1;
pub const MAX_COMPRESSION_LEVEL: i32 = 9;

// Application context handed to backends at construction
pub const DEFAULT_APPLICATION_CONTEXT: &str = "production";

// Environment variable names
pub const SPLITCACHE_COMPRESSION_VAR: &str = "SPLITCACHE_COMPRESSION";
pub const SPLITCACHE_COMPRESSION_LEVEL_VAR: &str = "SPLITCACHE_COMPRESSION_LEVEL";
pub const SPLITCACHE_EVICTION_WORKAROUND_VAR: &str = "SPLITCACHE_EVICTION_WORKAROUND";
pub const SPLITCACHE_DEFAULT_LIFETIME_VAR: &str = "SPLITCACHE_DEFAULT_LIFETIME";
