//! Cache module for Redis-backed storage
//!
//! This module provides the Redis client with retry logic and the
//! key-value store adapter the passcode engine runs on.

pub mod redis_client;
pub mod store;


pub use redis_client::RedisClient;
pub use store::RedisKeyValueStore;

// Re-export commonly used types
pub use passcode_shared::config::cache::CacheConfig;
