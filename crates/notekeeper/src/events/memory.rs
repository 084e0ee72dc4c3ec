//! In-process registration bus.
//!
//! Publisher and source share an mpsc channel, so events only reach the
//! consumer running in the same process.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use notekeeper_core::events::{
    Delivery, EventError, RegistrationEvent, RegistrationPublisher, RegistrationSource, Result,
};

/// Upper bound on deliveries handed out per `receive` call.
const MAX_BATCH: usize = 64;

/// How long `receive` waits before returning an empty batch.
const RECEIVE_WINDOW: Duration = Duration::from_secs(1);

/// Creates a connected publisher/source pair.
pub fn memory_bus(capacity: usize) -> (MemoryPublisher, MemorySource) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let publisher = MemoryPublisher {
        tx,
        next_id: Arc::new(AtomicU64::new(1)),
    };
    let source = MemorySource {
        rx,
        window: RECEIVE_WINDOW,
    };
    (publisher, source)
}

#[derive(Clone)]
pub struct MemoryPublisher {
    tx: mpsc::Sender<Delivery>,
    next_id: Arc<AtomicU64>,
}

impl MemoryPublisher {
    /// Sends raw bytes, bypassing encoding.
    #[cfg(test)]
    pub async fn publish_raw(&self, payload: &[u8]) -> Result<()> {
        let id = format!("mem-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.tx
            .send(Delivery::new(id, payload))
            .await
            .map_err(|_| EventError::Closed)
    }
}

#[async_trait]
impl RegistrationPublisher for MemoryPublisher {
    async fn publish(&self, event: &RegistrationEvent) -> Result<String> {
        let payload = event.encode()?;
        let id = format!("mem-{}", self.next_id.fetch_add(1, Ordering::SeqCst));

        self.tx
            .send(Delivery::new(id.clone(), payload))
            .await
            .map_err(|_| EventError::Closed)?;

        tracing::debug!(event_id = %id, user_id = event.user_id, "Registration event published");
        Ok(id)
    }
}

pub struct MemorySource {
    rx: mpsc::Receiver<Delivery>,
    window: Duration,
}

impl MemorySource {
    #[cfg(test)]
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }
}

#[async_trait]
impl RegistrationSource for MemorySource {
    async fn receive(&mut self) -> Result<Vec<Delivery>> {
        let first = match tokio::time::timeout(self.window, self.rx.recv()).await {
            Ok(Some(delivery)) => delivery,
            Ok(None) => return Err(EventError::Closed),
            Err(_) => return Ok(Vec::new()),
        };

        let mut batch = vec![first];
        while batch.len() < MAX_BATCH {
            match self.rx.try_recv() {
                Ok(delivery) => batch.push(delivery),
                Err(_) => break,
            }
        }
        Ok(batch)
    }

    async fn commit(&mut self, ids: &[String]) -> Result<()> {
        // Nothing to acknowledge: a dropped channel loses its contents anyway.
        tracing::trace!(count = ids.len(), "Committed in-memory deliveries");
        Ok(())
    }

    async fn close(mut self) -> Result<()> {
        self.rx.close();
        Ok(())
    }
}
