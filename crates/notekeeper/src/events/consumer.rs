//! Long-running loop that turns registration events into welcome notes.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use notekeeper_core::events::{Delivery, EventError, RegistrationEvent, RegistrationSource};

use crate::service::NoteService;

/// Pause after a transport error before polling again.
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Spawns the consumer task.
///
/// The task owns `source` and releases it exactly once, after the shutdown
/// signal fires or the transport reports it is closed. Acknowledgements are
/// batched and flushed every `commit_interval`, and once more before close.
/// Every delivery is acknowledged after handling, including ones that failed
/// to decode or whose note could not be created.
pub fn spawn_consumer<S>(
    source: S,
    service: NoteService,
    shutdown_rx: broadcast::Receiver<()>,
    commit_interval: Duration,
) -> JoinHandle<()>
where
    S: RegistrationSource + 'static,
{
    tokio::spawn(run(source, service, shutdown_rx, commit_interval))
}

async fn run<S: RegistrationSource>(
    mut source: S,
    service: NoteService,
    mut shutdown_rx: broadcast::Receiver<()>,
    commit_interval: Duration,
) {
    tracing::info!("Registration consumer started");

    let mut uncommitted: Vec<String> = Vec::new();
    let mut last_commit = Instant::now();

    loop {
        let received = tokio::select! {
            _ = shutdown_rx.recv() => {
                tracing::info!("Registration consumer shutting down");
                break;
            }
            received = source.receive() => received,
        };

        match received {
            Ok(batch) => {
                for delivery in batch {
                    handle(&service, &delivery).await;
                    uncommitted.push(delivery.id);
                }
            }
            Err(EventError::Closed) => {
                tracing::info!("Registration stream closed");
                break;
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to receive registration events");
                tokio::select! {
                    _ = shutdown_rx.recv() => break,
                    _ = tokio::time::sleep(RETRY_BACKOFF) => {}
                }
            }
        }

        if last_commit.elapsed() >= commit_interval {
            commit(&mut source, &mut uncommitted).await;
            last_commit = Instant::now();
        }
    }

    commit(&mut source, &mut uncommitted).await;
    if let Err(err) = source.close().await {
        tracing::warn!(error = %err, "Failed to close registration source");
    }
    tracing::info!("Registration consumer stopped");
}

async fn handle(service: &NoteService, delivery: &Delivery) {
    let event = match RegistrationEvent::decode(&delivery.payload) {
        Ok(event) => event,
        Err(err) => {
            tracing::warn!(event_id = %delivery.id, error = %err, "Dropping undecodable registration event");
            return;
        }
    };

    match service.create_welcome_note(&event).await {
        Ok(note_id) => tracing::info!(
            event_id = %delivery.id,
            user_id = event.user_id,
            note_id,
            "Welcome note created"
        ),
        Err(err) => tracing::error!(
            event_id = %delivery.id,
            user_id = event.user_id,
            error = %err,
            "Failed to create welcome note"
        ),
    }
}

/// Keeps ids for the next attempt when the commit fails.
async fn commit<S: RegistrationSource>(source: &mut S, uncommitted: &mut Vec<String>) {
    if uncommitted.is_empty() {
        return;
    }
    match source.commit(uncommitted).await {
        Ok(()) => uncommitted.clear(),
        Err(err) => {
            tracing::warn!(error = %err, pending = uncommitted.len(), "Failed to commit registration events")
        }
    }
}
