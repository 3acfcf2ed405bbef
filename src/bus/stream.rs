//! Streaming observer: forwards bus events to a push sink as
//! server-sent-event frames.
//!
//! The observer registers on the bus, writes a leading comment frame, then
//! idles until either an event arrives (written immediately as a `data:`
//! frame) or the cancellation token fires. Events the subscription has
//! already accepted are still written when cancellation fires, so every
//! delivery counted by `publish` reaches the sink unless it closes first.
//! Cancellation and a closed sink are normal termination. The subscription is released on every exit
//! path, errors included, because it is an RAII guard.
//!
//! ## Example
//!
//! ```ignore
//! let (tx, rx) = tokio::sync::mpsc::channel(16);
//! let mut sink = ChannelSink::new(tx);
//! let stats = stream::observe::<CampaignChanged, _>(&hub, &mut sink, token).await?;
//! tracing::info!(frames = stats.frames, "stream finished");
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{Notification, Notifications};

/// Comment frame written when a stream opens.
pub const STREAM_START: &str = ": stream is starting\n\n";

/// Error from a streaming observer.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The downstream sink is gone. Treated as normal termination by [`observe`].
    #[error("stream sink closed")]
    Closed,
    /// The event could not be serialized.
    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("stream write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A push sink. `write` resolves once the frame has been handed downstream.
#[async_trait]
pub trait FrameSink: Send {
    async fn write(&mut self, frame: Bytes) -> Result<(), StreamError>;
}

/// Sink that forwards frames into a bounded channel, e.g. an HTTP body stream.
pub struct ChannelSink {
    tx: mpsc::Sender<Bytes>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Bytes>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl FrameSink for ChannelSink {
    async fn write(&mut self, frame: Bytes) -> Result<(), StreamError> {
        self.tx.send(frame).await.map_err(|_| StreamError::Closed)
    }
}

/// Encode one event as `data: <json>\n\n`.
pub fn event_frame<E: Serialize>(event: &E) -> Result<Bytes, serde_json::Error> {
    let json = serde_json::to_vec(event)?;
    let mut frame = Vec::with_capacity(json.len() + 8);
    frame.extend_from_slice(b"data: ");
    frame.extend_from_slice(&json);
    frame.extend_from_slice(b"\n\n");
    Ok(Bytes::from(frame))
}

/// Statistics from a finished stream.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamStats {
    /// Number of event frames written (the opening comment is not counted).
    pub frames: usize,
}

/// Observe events of type `E` until `cancellation` fires or the sink closes.
pub async fn observe<E, S>(
    hub: &Notifications,
    sink: &mut S,
    cancellation: CancellationToken,
) -> Result<StreamStats, StreamError>
where
    E: Notification + Serialize,
    S: FrameSink + ?Sized,
{
    let (subscription, mut events) = hub.subscribe_channel::<E>();
    tracing::debug!(subscriber = subscription.id(), event = E::name(), "stream opened");

    let mut stats = StreamStats::default();
    let outcome = pump(&mut events, sink, &cancellation, &mut stats).await;

    subscription.unsubscribe();
    tracing::debug!(frames = stats.frames, event = E::name(), "stream closed");

    match outcome {
        Ok(()) | Err(StreamError::Closed) => Ok(stats),
        Err(err) => Err(err),
    }
}

async fn pump<E, S>(
    events: &mut mpsc::UnboundedReceiver<E>,
    sink: &mut S,
    cancellation: &CancellationToken,
    stats: &mut StreamStats,
) -> Result<(), StreamError>
where
    E: Notification + Serialize,
    S: FrameSink + ?Sized,
{
    tokio::select! {
        biased;
        _ = cancellation.cancelled() => {
            if events.is_empty() {
                return Ok(());
            }
            sink.write(Bytes::from_static(STREAM_START.as_bytes())).await?;
            return drain(events, sink, stats).await;
        }
        written = sink.write(Bytes::from_static(STREAM_START.as_bytes())) => written?,
    }

    loop {
        let event = tokio::select! {
            biased;
            _ = cancellation.cancelled() => return drain(events, sink, stats).await,
            event = events.recv() => match event {
                Some(event) => event,
                None => return Ok(()),
            },
        };
        write_event(sink, &event, stats).await?;
    }
}

/// Write every event already accepted by the subscription.
async fn drain<E, S>(
    events: &mut mpsc::UnboundedReceiver<E>,
    sink: &mut S,
    stats: &mut StreamStats,
) -> Result<(), StreamError>
where
    E: Notification + Serialize,
    S: FrameSink + ?Sized,
{
    while let Ok(event) = events.try_recv() {
        write_event(sink, &event, stats).await?;
    }
    Ok(())
}

async fn write_event<E, S>(sink: &mut S, event: &E, stats: &mut StreamStats) -> Result<(), StreamError>
where
    E: Serialize,
    S: FrameSink + ?Sized,
{
    sink.write(event_frame(event)?).await?;
    stats.frames += 1;
    Ok(())
}
