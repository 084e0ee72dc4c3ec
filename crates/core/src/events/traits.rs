use async_trait::async_trait;

use super::{Delivery, RegistrationEvent, Result};

/// Consuming side of the registration stream.
///
/// Delivery is at-least-once: anything received but not committed before a
/// crash may be handed out again.
#[async_trait]
pub trait RegistrationSource: Send {
    /// Waits briefly for new deliveries. An empty batch means nothing arrived
    /// within the transport's blocking window.
    async fn receive(&mut self) -> Result<Vec<Delivery>>;

    /// Acknowledges processed deliveries so they are not handed out again.
    async fn commit(&mut self, ids: &[String]) -> Result<()>;

    /// Releases the transport handle.
    async fn close(self) -> Result<()>;
}

/// Producing side of the registration stream.
#[async_trait]
pub trait RegistrationPublisher: Send + Sync {
    /// Publishes an event and returns the transport-assigned id.
    async fn publish(&self, event: &RegistrationEvent) -> Result<String>;
}
