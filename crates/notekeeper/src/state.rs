//! Application state shared by all request handlers.
//!
//! Backends are selected at compile time: one storage feature (`inmemory` or
//! `sqlite`) and one cache/event feature (`memory` or `redis`).

use std::sync::Arc;

use axum::extract::FromRef;
use tokio::sync::broadcast;

use notekeeper_auth::{AuthConfig, AuthState};
use notekeeper_core::cache::Cache;
use notekeeper_core::events::RegistrationPublisher;
use notekeeper_core::storage::NoteRepository;

use crate::cache::NotesCache;
use crate::config::Config;
use crate::events::ActiveSource;
use crate::service::NoteService;

/// Shared application state.
///
/// Cloned for each request; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub notes: NoteService,
    pub auth: AuthState,
    /// Producer side of the registration stream, used by the dev route.
    #[cfg_attr(not(debug_assertions), allow(dead_code))]
    pub publisher: Arc<dyn RegistrationPublisher>,
    /// Shutdown signal for background tasks.
    pub shutdown_tx: broadcast::Sender<()>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl AppState {
    fn build(
        repo: Arc<dyn NoteRepository>,
        cache: Arc<dyn Cache>,
        publisher: Arc<dyn RegistrationPublisher>,
        auth_config: &AuthConfig,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            notes: NoteService::new(repo, Some(NotesCache::new(cache))),
            auth: AuthState::new(auth_config),
            publisher,
            shutdown_tx,
        }
    }

    /// Creates the state and the registration source the consumer will own.
    pub async fn new(
        config: &Config,
        auth_config: &AuthConfig,
    ) -> Result<(Self, ActiveSource), anyhow::Error> {
        let repo = storage::build(config).await?;
        let (cache, publisher, source) = transport::build(config).await?;

        Ok((Self::build(repo, cache, publisher, auth_config), source))
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal all background tasks to shut down.
    pub fn signal_shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

// ============================================================================
// Factory functions for the backend features
// ============================================================================

#[cfg(feature = "inmemory")]
mod storage {
    use super::*;
    use crate::storage::InMemoryNoteRepository;

    pub async fn build(_config: &Config) -> Result<Arc<dyn NoteRepository>, anyhow::Error> {
        tracing::info!("Using in-memory note storage");
        Ok(Arc::new(InMemoryNoteRepository::new()))
    }
}

#[cfg(feature = "sqlite")]
mod storage {
    use super::*;
    use crate::storage::SqliteNoteRepository;

    pub async fn build(config: &Config) -> Result<Arc<dyn NoteRepository>, anyhow::Error> {
        tracing::info!(path = %config.sqlite_path, "Using SQLite note storage");
        Ok(Arc::new(SqliteNoteRepository::new(&config.sqlite_path).await?))
    }
}

type Transport = (
    Arc<dyn Cache>,
    Arc<dyn RegistrationPublisher>,
    ActiveSource,
);

#[cfg(feature = "memory")]
mod transport {
    use super::*;
    use crate::cache::memory::MemoryCache;
    use crate::events::memory::memory_bus;

    /// Registration events buffered before publishers wait.
    const BUS_CAPACITY: usize = 1024;

    pub async fn build(config: &Config) -> Result<Transport, anyhow::Error> {
        tracing::info!(
            max_entries = config.cache_max_entries,
            "Using in-memory cache and registration bus"
        );
        let (publisher, source) = memory_bus(BUS_CAPACITY);
        Ok((
            Arc::new(MemoryCache::new(config.cache_max_entries)),
            Arc::new(publisher),
            source,
        ))
    }
}

#[cfg(feature = "redis")]
mod transport {
    use super::*;
    use crate::cache::redis_impl::RedisCache;
    use crate::events::redis_impl::{RedisStreamPublisher, RedisStreamSource};

    pub async fn build(config: &Config) -> Result<Transport, anyhow::Error> {
        tracing::info!(
            url = %config.redis_url,
            stream = %config.registration_stream,
            group = %config.registration_group,
            consumer = %config.consumer_name,
            "Using Redis cache and registration stream"
        );
        let cache = RedisCache::new(&config.redis_url).await?;
        let publisher =
            RedisStreamPublisher::connect(&config.redis_url, &config.registration_stream).await?;
        let source = RedisStreamSource::connect(
            &config.redis_url,
            &config.registration_stream,
            &config.registration_group,
            &config.consumer_name,
        )
        .await?
        // Below the ack cadence the source would reclaim its own in-flight entries.
        .with_claim_idle(config.claim_idle().max(config.commit_interval() * 2));
        Ok((Arc::new(cache), Arc::new(publisher), source))
    }
}

// ============================================================================
// Test support
// ============================================================================
