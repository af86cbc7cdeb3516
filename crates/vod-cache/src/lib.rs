//! Read-through caching.
//!
//! This crate provides:
//! - The `ByteCache` capability over expiring key/value storage
//! - A Redis backend and an in-memory backend for tests
//! - `get_or_compute`: versioned, typed read-through with a fixed TTL
//!
//! Cached values are opportunistic, never the system of record: any cache
//! transport failure degrades to recomputation.

pub mod cache;
pub mod error;
pub mod memory;
pub mod redis_cache;

pub use cache::{get_or_compute, ByteCache, CACHE_SCHEMA_VERSION, DEFAULT_TTL_SECS};
pub use error::{CacheError, CacheResult};
pub use memory::MemoryCache;
pub use redis_cache::{RedisCache, RedisCacheConfig};
