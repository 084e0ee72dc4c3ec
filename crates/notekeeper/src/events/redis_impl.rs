//! Redis Streams registration transport.
//!
//! Events live in a stream keyed by topic name, with the JSON body in the
//! `payload` field. The source reads through a consumer group so several
//! instances share the stream, and acknowledges with `XACK`.
//!
//! On start the source first replays its own pending entries, walking the
//! pending list forward so each entry is handed out once. After that it
//! periodically claims entries another group member left unacknowledged for
//! longer than the claim idle time, which covers consumers that crashed.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::streams::{
    StreamAutoClaimOptions, StreamAutoClaimReply, StreamId, StreamReadOptions, StreamReadReply,
};
use redis::AsyncCommands;

use notekeeper_core::events::{
    Delivery, EventError, RegistrationEvent, RegistrationPublisher, RegistrationSource, Result,
};

/// Stream entry field holding the encoded event.
pub const PAYLOAD_FIELD: &str = "payload";

/// Milliseconds `XREADGROUP` blocks waiting for new entries.
const BLOCK_MS: usize = 1000;

/// Maximum entries requested per read or claim.
const READ_COUNT: usize = 64;

/// Id that asks for entries never delivered to any consumer of the group.
const NEW_ENTRIES: &str = ">";

/// Start of both the pending list and the `XAUTOCLAIM` scan.
const START_ID: &str = "0-0";

/// Entries idle this long in another consumer's pending list are taken over.
pub const DEFAULT_CLAIM_IDLE: Duration = Duration::from_secs(30);

fn map_redis_error(err: redis::RedisError) -> EventError {
    EventError::Transport(err.to_string())
}

async fn connect(url: &str) -> Result<redis::aio::ConnectionManager> {
    let client = redis::Client::open(url).map_err(map_redis_error)?;
    redis::aio::ConnectionManager::new(client)
        .await
        .map_err(map_redis_error)
}

/// An entry without a payload still needs acknowledging, so it is handed out
/// with an empty body and fails decoding.
fn to_deliveries(entries: Vec<StreamId>) -> Vec<Delivery> {
    entries
        .into_iter()
        .map(|entry| {
            let payload: Vec<u8> = entry.get(PAYLOAD_FIELD).unwrap_or_default();
            Delivery::new(entry.id, payload)
        })
        .collect()
}

/// Where the next `XREADGROUP` starts.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Cursor {
    /// Replaying this consumer's pending list after the given id.
    Pending(String),
    /// Reading entries not yet delivered to the group.
    New,
}

/// Consumer-group reader over the registration stream.
pub struct RedisStreamSource {
    conn: redis::aio::ConnectionManager,
    stream: String,
    group: String,
    consumer: String,
    cursor: Cursor,
    read_count: usize,
    claim_idle: Duration,
    claim_from: String,
    last_claim: Option<Instant>,
}

impl RedisStreamSource {
    /// Connects and makes sure the consumer group exists.
    ///
    /// The stream is created if missing. Entries left pending by a previous
    /// run of the same consumer name are re-read before new ones.
    pub async fn connect(url: &str, stream: &str, group: &str, consumer: &str) -> Result<Self> {
        let mut conn = connect(url).await?;

        let created: redis::RedisResult<()> =
            conn.xgroup_create_mkstream(stream, group, "$").await;
        match created {
            Ok(()) => tracing::info!(stream, group, "Created consumer group"),
            Err(err) if err.code() == Some("BUSYGROUP") => {
                tracing::debug!(stream, group, "Consumer group already exists")
            }
            Err(err) => return Err(map_redis_error(err)),
        }

        Ok(Self {
            conn,
            stream: stream.to_string(),
            group: group.to_string(),
            consumer: consumer.to_string(),
            cursor: Cursor::Pending(START_ID.to_string()),
            read_count: READ_COUNT,
            claim_idle: DEFAULT_CLAIM_IDLE,
            claim_from: START_ID.to_string(),
            last_claim: None,
        })
    }

    /// Sets how long an entry must sit unacknowledged before it is claimed.
    pub fn with_claim_idle(mut self, claim_idle: Duration) -> Self {
        self.claim_idle = claim_idle;
        self
    }

    #[cfg(test)]
    fn with_read_count(mut self, read_count: usize) -> Self {
        self.read_count = read_count;
        self
    }

    async fn read(&mut self, id: &str, block: bool) -> Result<Vec<StreamId>> {
        let mut options = StreamReadOptions::default()
            .group(&self.group, &self.consumer)
            .count(self.read_count);
        if block {
            options = options.block(BLOCK_MS);
        }

        let reply: Option<StreamReadReply> = self
            .conn
            .xread_options(&[&self.stream], &[id], &options)
            .await
            .map_err(map_redis_error)?;

        Ok(reply
            .map(|r| r.keys.into_iter().flat_map(|key| key.ids).collect())
            .unwrap_or_default())
    }

    fn claim_due(&self) -> bool {
        self.last_claim
            .map_or(true, |at| at.elapsed() >= self.claim_idle)
    }

    /// Takes over one page of stale entries from any consumer of the group.
    async fn claim_stale(&mut self) -> Result<Vec<StreamId>> {
        let min_idle_ms = u64::try_from(self.claim_idle.as_millis()).unwrap_or(u64::MAX);
        let options = StreamAutoClaimOptions::default().count(self.read_count);
        let reply: StreamAutoClaimReply = self
            .conn
            .xautoclaim_options(
                &self.stream,
                &self.group,
                &self.consumer,
                min_idle_ms,
                &self.claim_from,
                options,
            )
            .await
            .map_err(map_redis_error)?;

        // A non-zero next id means the scan stopped early; resume there on
        // the next receive instead of waiting a full idle period.
        if reply.next_stream_id == START_ID {
            self.last_claim = Some(Instant::now());
        }
        self.claim_from = reply.next_stream_id;

        if !reply.claimed.is_empty() {
            tracing::info!(
                stream = %self.stream,
                consumer = %self.consumer,
                claimed = reply.claimed.len(),
                "Claimed stale registration events"
            );
        }
        Ok(reply.claimed)
    }
}

#[async_trait]
impl RegistrationSource for RedisStreamSource {
    async fn receive(&mut self) -> Result<Vec<Delivery>> {
        if let Cursor::Pending(after) = self.cursor.clone() {
            let entries = self.read(&after, false).await?;
            match entries.last() {
                Some(last) => {
                    self.cursor = Cursor::Pending(last.id.clone());
                    return Ok(to_deliveries(entries));
                }
                None => {
                    tracing::debug!(stream = %self.stream, "Pending backlog drained");
                    self.cursor = Cursor::New;
                }
            }
        }

        if self.claim_due() {
            let claimed = self.claim_stale().await?;
            if !claimed.is_empty() {
                return Ok(to_deliveries(claimed));
            }
        }

        let entries = self.read(NEW_ENTRIES, true).await?;
        Ok(to_deliveries(entries))
    }

    async fn commit(&mut self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let acked: usize = self
            .conn
            .xack(&self.stream, &self.group, ids)
            .await
            .map_err(map_redis_error)?;
        tracing::debug!(stream = %self.stream, acked, "Acknowledged registration events");
        Ok(())
    }

    async fn close(self) -> Result<()> {
        tracing::info!(
            stream = %self.stream,
            consumer = %self.consumer,
            "Registration stream source closed"
        );
        drop(self.conn);
        Ok(())
    }
}

/// Appends registration events to the stream with `XADD`.
#[derive(Clone)]
pub struct RedisStreamPublisher {
    conn: redis::aio::ConnectionManager,
    stream: String,
}

impl RedisStreamPublisher {
    pub async fn connect(url: &str, stream: &str) -> Result<Self> {
        Ok(Self {
            conn: connect(url).await?,
            stream: stream.to_string(),
        })
    }
}

#[async_trait]
impl RegistrationPublisher for RedisStreamPublisher {
    async fn publish(&self, event: &RegistrationEvent) -> Result<String> {
        let payload = event.encode()?;
        let mut conn = self.conn.clone();
        let id: String = conn
            .xadd(&self.stream, "*", &[(PAYLOAD_FIELD, payload)])
            .await
            .map_err(map_redis_error)?;
        tracing::debug!(event_id = %id, user_id = event.user_id, "Registration event published");
        Ok(id)
    }
}
