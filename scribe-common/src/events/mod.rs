//! Event types for the Scribe event system
//!
//! Provides shared event definitions and the EventBus used by the player.

mod playback_types;

pub use playback_types::{PlaybackSnapshot, PlayerPhase};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Scribe event types
///
/// Events are broadcast via EventBus and serialize to JSON for UI transport.
/// Every event carries the `source_id` of the media source it belongs to, so a
/// subscriber can drop events that arrive after the source changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScribeEvent {
    /// A new media source was handed to the media handle
    SourceLoaded {
        source_id: Uuid,
        /// Source URI passed to the media handle
        uri: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Coordinator phase changed (e.g. Paused → PlayingBounded)
    PlaybackStateChanged {
        source_id: Uuid,
        /// Phase before the change
        old_state: PlayerPhase,
        /// Phase after the change
        new_state: PlayerPhase,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Observable snapshot changed
    ///
    /// Emitted after any command or signal reaction that altered the snapshot,
    /// including every position advance while playing.
    PlaybackSnapshot {
        source_id: Uuid,
        state: PlaybackSnapshot,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Bounded playback reached its end and was stopped
    RangeCompleted {
        source_id: Uuid,
        start: f64,
        end: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The media handle refused to start playback (e.g. autoplay denied)
    PlaybackRejected {
        source_id: Uuid,
        reason: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Transcript sentence containing the playback position changed
    ActiveSegmentChanged {
        source_id: Uuid,
        /// Sentence index within the transcript
        index: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl ScribeEvent {
    /// Source this event belongs to
    pub fn source_id(&self) -> Uuid {
        match self {
            ScribeEvent::SourceLoaded { source_id, .. }
            | ScribeEvent::PlaybackStateChanged { source_id, .. }
            | ScribeEvent::PlaybackSnapshot { source_id, .. }
            | ScribeEvent::RangeCompleted { source_id, .. }
            | ScribeEvent::PlaybackRejected { source_id, .. }
            | ScribeEvent::ActiveSegmentChanged { source_id, .. } => *source_id,
        }
    }
}

/// Central event distribution bus
///
/// Thin wrapper over `tokio::sync::broadcast`. Slow subscribers lose the
/// oldest events once `capacity` is exceeded.
pub struct EventBus {
    tx: broadcast::Sender<ScribeEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of events to buffer before dropping old events.
    ///   Position advances produce one snapshot event each, so size this for a
    ///   few seconds of playback (100 is plenty for a UI frame loop).
    ///
    /// # Examples
    ///
    /// ```
    /// use scribe_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.capacity(), 100);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<ScribeEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: ScribeEvent,
    ) -> Result<usize, broadcast::error::SendError<ScribeEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// # Examples
    ///
    /// ```
    /// use scribe_common::events::{EventBus, ScribeEvent};
    /// use uuid::Uuid;
    ///
    /// let event_bus = EventBus::new(100);
    ///
    /// // Nobody listening yet - not an error
    /// event_bus.emit_lossy(ScribeEvent::ActiveSegmentChanged {
    ///     source_id: Uuid::new_v4(),
    ///     index: 3,
    ///     timestamp: chrono::Utc::now(),
    /// });
    /// ```
    pub fn emit_lossy(&self, event: ScribeEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
