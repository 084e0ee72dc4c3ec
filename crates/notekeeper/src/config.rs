use std::{env, time::Duration};

use uuid::Uuid;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Path to SQLite database file (default: "notekeeper.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
    /// Stream carrying user registration events (default: "user_registered")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub registration_stream: String,
    /// Consumer group of this service (default: "note-service-consumer")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub registration_group: String,
    /// Consumer name within the group (default: "notekeeper-{uuid}")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub consumer_name: String,
    /// Idle time after which another consumer's unacknowledged events are
    /// taken over, in ms (default: 30,000)
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub claim_idle_ms: u64,
    /// How often processed events are acknowledged, in ms (default: 1,000)
    pub commit_interval_ms: u64,
    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_secs: u64,
    /// Log output format (default: pretty)
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `SQLITE_PATH` - SQLite database path (default: "notekeeper.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `USER_REGISTERED_STREAM` - Registration stream (default: "user_registered")
    /// - `USER_REGISTERED_GROUP` - Consumer group (default: "note-service-consumer")
    /// - `EVENT_CONSUMER_NAME` - Consumer name (default: random per process)
    /// - `EVENT_CLAIM_IDLE_MS` - Takeover threshold for stale events (default: 30,000)
    /// - `EVENT_COMMIT_INTERVAL_MS` - Ack cadence in ms (default: 1,000)
    /// - `REQUEST_TIMEOUT_SECS` - Request timeout in seconds (default: 10)
    /// - `LOG_FORMAT` - "json" or "pretty" (default: "pretty")
    pub fn from_env() -> Self {
        Self {
            cache_max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(10_000),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "notekeeper.db".to_string()),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            registration_stream: env::var("USER_REGISTERED_STREAM")
                .unwrap_or_else(|_| "user_registered".to_string()),
            registration_group: env::var("USER_REGISTERED_GROUP")
                .unwrap_or_else(|_| "note-service-consumer".to_string()),
            consumer_name: env::var("EVENT_CONSUMER_NAME")
                .unwrap_or_else(|_| format!("notekeeper-{}", Uuid::new_v4())),
            claim_idle_ms: env::var("EVENT_CLAIM_IDLE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30_000),
            commit_interval_ms: env::var("EVENT_COMMIT_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(1_000),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        }
    }

    /// Get the event commit interval as a Duration.
    pub fn commit_interval(&self) -> Duration {
        Duration::from_millis(self.commit_interval_ms)
    }

    /// Get the stale-event claim threshold as a Duration.
    #[allow(dead_code)]
    pub fn claim_idle(&self) -> Duration {
        Duration::from_millis(self.claim_idle_ms)
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
