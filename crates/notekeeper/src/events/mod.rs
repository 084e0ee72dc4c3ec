//! Registration event transports and the welcome-note consumer.
//!
//! The transport follows the cache backend feature: `memory` wires an
//! in-process channel, `redis` uses a Redis Stream with a consumer group.

mod consumer;

#[cfg(any(feature = "memory", test))]
pub mod memory;

#[cfg(feature = "redis")]
pub mod redis_impl;

pub use consumer::spawn_consumer;

/// Event source used by the running binary.
#[cfg(feature = "memory")]
pub type ActiveSource = memory::MemorySource;

#[cfg(feature = "redis")]
pub type ActiveSource = redis_impl::RedisStreamSource;
