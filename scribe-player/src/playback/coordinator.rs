//! Playback coordinator
//!
//! Drives one [`MediaHandle`] through continuous and bounded ("range")
//! playback. Commands come from UI collaborators; signals come from the media
//! handle, asynchronously and in platform order. Each signal type has exactly
//! one reaction function, and every command and reaction ends by publishing
//! whatever observable change it caused.
//!
//! # Phases
//!
//! ```text
//! Idle ──loadedmetadata──▶ Paused ──play──▶ PlayingContinuous
//!   ▲                        ▲  ▲              │
//!   │ load_source            │  └──pause/ended─┤
//!   └────────────(any)       │                 ▼
//!                            └─boundary/pause─ PlayingBounded
//! ```
//!
//! # Range playback
//!
//! `play_range` never calls `play()` directly: it records the range and a
//! pending seek-play intent, then seeks. The `Seeked` reaction for that seek
//! starts playback. Only the completion of the most recent seek consumes the
//! intent, so only the latest request ever starts playing.
//!
//! Every issued seek target is remembered until a completion retires it. A
//! `Seeked` retires the outstanding target nearest its settled position along
//! with every older target (platforms may coalesce interrupted seeks into one
//! completion). When no target is left outstanding, it was the latest seek,
//! wherever the handle settled (clamped to the duration, snapped to a
//! keyframe).
//!
//! A manual `seek()` abandons the pending intent: it is a newer position
//! request, and the range start it was waiting for will not be reached.
//!
//! While the intent is pending the handle may still report positions from
//! before the seek, so the range boundary is only enforced once the intent
//! has been consumed or abandoned. From then on every `TimeUpdate` checks it.

use std::collections::VecDeque;
use std::sync::Arc;

use scribe_common::events::{EventBus, PlaybackSnapshot, PlayerPhase, ScribeEvent};
use scribe_common::time::now;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::command::PlayerCommand;
use super::media::{MediaHandle, MediaSignal};
use super::types::{PendingSeekPlay, PlaybackRange};
use crate::error::{Error, Result};

/// State captured before a command or reaction, compared afterwards
#[derive(Clone, Copy)]
struct Observed {
    snapshot: PlaybackSnapshot,
    phase: PlayerPhase,
}

/// Single owner of a media handle and its playback state
pub struct PlaybackCoordinator<M: MediaHandle> {
    media: M,
    events: Arc<EventBus>,
    /// Identifies the loaded source; nil until the first load
    source_id: Uuid,
    snapshot: PlaybackSnapshot,
    range: Option<PlaybackRange>,
    pending: Option<PendingSeekPlay>,
    /// Seek targets issued and not yet reported complete, oldest first
    seek_targets: VecDeque<f64>,
}

impl<M: MediaHandle> PlaybackCoordinator<M> {
    /// Take ownership of `media`; nothing else may call its imperative API.
    pub fn new(media: M, events: Arc<EventBus>) -> Self {
        Self {
            media,
            events,
            source_id: Uuid::nil(),
            snapshot: PlaybackSnapshot::default(),
            range: None,
            pending: None,
            seek_targets: VecDeque::new(),
        }
    }

    // ========================================
    // Observation
    // ========================================

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.snapshot
    }

    pub fn phase(&self) -> PlayerPhase {
        match (self.snapshot.is_ready, self.snapshot.is_playing, self.range) {
            (false, _, _) => PlayerPhase::Idle,
            (true, false, _) => PlayerPhase::Paused,
            (true, true, None) => PlayerPhase::PlayingContinuous,
            (true, true, Some(_)) => PlayerPhase::PlayingBounded,
        }
    }

    pub fn range(&self) -> Option<PlaybackRange> {
        self.range
    }

    pub fn pending_seek_play(&self) -> Option<PendingSeekPlay> {
        self.pending
    }

    pub fn source_id(&self) -> Uuid {
        self.source_id
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Read-only access to the owned media handle
    pub fn media(&self) -> &M {
        &self.media
    }

    fn observe(&self) -> Observed {
        Observed {
            snapshot: self.snapshot,
            phase: self.phase(),
        }
    }

    fn publish(&self, before: Observed) {
        let phase = self.phase();
        if phase != before.phase {
            info!("Playback state: {} -> {}", before.phase, phase);
            self.events.emit_lossy(ScribeEvent::PlaybackStateChanged {
                source_id: self.source_id,
                old_state: before.phase,
                new_state: phase,
                timestamp: now(),
            });
        }
        if self.snapshot != before.snapshot {
            self.events.emit_lossy(ScribeEvent::PlaybackSnapshot {
                source_id: self.source_id,
                state: self.snapshot,
                timestamp: now(),
            });
        }
    }

    // ========================================
    // Source lifecycle
    // ========================================

    /// Hand a new source to the media handle
    ///
    /// Returns to `Idle` first: readiness, position, duration, range and any
    /// pending intent all belong to the previous source. A load failure leaves
    /// the coordinator idle.
    pub fn load_source(&mut self, uri: &str) -> Result<Uuid> {
        let before = self.observe();

        self.source_id = Uuid::new_v4();
        self.snapshot = PlaybackSnapshot::default();
        self.range = None;
        self.pending = None;
        self.seek_targets.clear();

        info!("Loading source {} (source_id={})", uri, self.source_id);
        let loaded = self.media.load(uri);
        self.publish(before);
        loaded.map_err(Error::Media)?;

        self.events.emit_lossy(ScribeEvent::SourceLoaded {
            source_id: self.source_id,
            uri: uri.to_string(),
            timestamp: now(),
        });
        Ok(self.source_id)
    }

    // ========================================
    // Commands
    // ========================================

    /// Dispatch a command received as data
    pub fn apply(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Toggle => self.toggle(),
            PlayerCommand::Seek { time } => self.seek(time),
            PlayerCommand::PlayRange { start, end } => self.play_range(start, end),
            PlayerCommand::PlayContinuous => self.play_continuous(),
        }
    }

    /// Pause if playing (any mode); otherwise start continuous playback
    ///
    /// Does nothing before the source is ready.
    pub fn toggle(&mut self) {
        let before = self.observe();

        if self.snapshot.is_playing {
            info!("Toggle: pausing {}", before.phase);
            self.pending = None;
            self.issue_pause();
        } else if self.snapshot.is_ready {
            info!("Toggle: starting continuous playback");
            self.start_continuous();
        } else {
            debug!("Toggle ignored: media not ready");
        }

        self.publish(before);
    }

    /// Move the media position
    ///
    /// Abandons a pending range start. The active range is left untouched, so
    /// seeking outside it makes the boundary stale relative to the new position.
    pub fn seek(&mut self, time: f64) {
        if !time.is_finite() {
            warn!("Seek ignored: non-finite time {}", time);
            return;
        }
        let time = time.max(0.0);
        if let Some(abandoned) = self.pending.take() {
            info!(
                "Seek to {:.3}s abandons pending range start {:.3}..{:.3}",
                time, abandoned.start, abandoned.end
            );
        }
        debug!("Seek to {:.3}s (range={:?})", time, self.range);
        self.issue_seek(time);
    }

    /// Play `[start, end]` and stop at `end`
    ///
    /// Silently rejected before readiness: seeking a source whose metadata is
    /// not established is undefined on many platforms. Playback itself starts
    /// from the `Seeked` reaction.
    pub fn play_range(&mut self, start: f64, end: f64) {
        if !self.snapshot.is_ready {
            warn!(
                "Range {:.3}..{:.3} rejected: media not ready",
                start, end
            );
            return;
        }
        let Some(range) = PlaybackRange::new(start, end) else {
            warn!("Range {}..{} rejected: invalid interval", start, end);
            return;
        };
        let duration = self.snapshot.duration;
        if duration > 0.0 && range.start >= duration {
            warn!(
                "Range {:.3}..{:.3} rejected: starts at or past the end of media ({:.3}s)",
                range.start, range.end, duration
            );
            return;
        }

        let before = self.observe();

        if let Some(previous) = self.pending.replace(PendingSeekPlay::from(range)) {
            debug!(
                "Pending range {:.3}..{:.3} superseded by {:.3}..{:.3}",
                previous.start, previous.end, range.start, range.end
            );
        }
        self.range = Some(range);
        info!("Playing range {:.3}..{:.3}", range.start, range.end);
        self.issue_seek(range.start);

        self.publish(before);
    }

    /// Play with no boundary, dropping any range or pending range start
    pub fn play_continuous(&mut self) {
        let before = self.observe();
        info!("Playing continuously from {:.3}s", self.snapshot.current_time);
        self.start_continuous();
        self.publish(before);
    }

    fn start_continuous(&mut self) {
        self.range = None;
        self.pending = None;
        self.issue_play();
    }

    fn issue_seek(&mut self, time: f64) {
        self.seek_targets.push_back(time);
        self.media.seek(time);
    }

    /// Retire the outstanding seek a completion at `position` belongs to,
    /// together with every older one
    ///
    /// Returns whether the completion belongs to the most recent seek issued.
    /// Ties go to the newer target.
    fn settle_seek(&mut self, position: f64) -> bool {
        let nearest = self
            .seek_targets
            .iter()
            .enumerate()
            .rev()
            .min_by(|(_, a), (_, b)| (**a - position).abs().total_cmp(&(**b - position).abs()))
            .map(|(index, _)| index);

        match nearest {
            Some(index) => {
                self.seek_targets.drain(..=index);
                self.seek_targets.is_empty()
            }
            // Seek not issued by us (platform-initiated)
            None => true,
        }
    }

    /// Call `play()`; a rejection is reported, not retried
    fn issue_play(&mut self) -> bool {
        match self.media.play() {
            Ok(()) => true,
            Err(e) => {
                warn!("Media handle rejected play: {}", e);
                self.events.emit_lossy(ScribeEvent::PlaybackRejected {
                    source_id: self.source_id,
                    reason: e.to_string(),
                    timestamp: now(),
                });
                false
            }
        }
    }

    /// Call `pause()` and treat the handle as paused right away
    ///
    /// A pause request cannot be refused, and the confirming `Pause` signal is
    /// idempotent.
    fn issue_pause(&mut self) {
        self.media.pause();
        self.snapshot.is_playing = false;
    }

    // ========================================
    // Signal reactions
    // ========================================

    /// React to one signal from the media handle
    pub fn handle_signal(&mut self, signal: MediaSignal) {
        let before = self.observe();
        debug!("Signal {} ({:?})", signal.name(), signal);

        match signal {
            MediaSignal::LoadedMetadata { duration } => self.on_loaded_metadata(duration),
            MediaSignal::TimeUpdate { current_time } => self.on_time_update(current_time),
            MediaSignal::Seeked { position } => self.on_seeked(position),
            MediaSignal::Play => self.on_play(),
            MediaSignal::Pause => self.on_pause(),
            MediaSignal::Ended => self.on_ended(),
        }

        self.publish(before);
    }

    fn on_loaded_metadata(&mut self, duration: f64) {
        // Streams report an infinite duration; keep the snapshot finite
        self.snapshot.duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            0.0
        };
        if !self.snapshot.is_ready {
            info!("Media ready (duration {:.3}s)", self.snapshot.duration);
        }
        self.snapshot.is_ready = true;
    }

    fn on_time_update(&mut self, current_time: f64) {
        if current_time.is_finite() {
            self.snapshot.current_time = current_time.max(0.0);
        }

        if self.pending.is_some() {
            return;
        }
        if let Some(range) = self.range {
            if range.is_complete_at(self.snapshot.current_time) {
                info!(
                    "Range {:.3}..{:.3} complete at {:.3}s",
                    range.start, range.end, self.snapshot.current_time
                );
                self.issue_pause();
                self.range = None;
                self.events.emit_lossy(ScribeEvent::RangeCompleted {
                    source_id: self.source_id,
                    start: range.start,
                    end: range.end,
                    timestamp: now(),
                });
            }
        }
    }

    fn on_seeked(&mut self, position: f64) {
        if position.is_finite() {
            self.snapshot.current_time = position.max(0.0);
        }

        let latest = self.settle_seek(position);

        let Some(pending) = self.pending else {
            return;
        };
        if !latest {
            debug!(
                "Earlier seek settled at {:.3}s, still waiting for the seek to {:.3}s",
                position, pending.start
            );
            return;
        }

        self.pending = None;
        if (position - pending.start).abs() > f64::EPSILON {
            debug!(
                "Seek to {:.3}s settled at {:.3}s, starting range from there",
                pending.start, position
            );
        }
        self.range = pending.range();
        if !self.issue_play() {
            // Bounded playback never started; stay paused with nothing armed
            self.range = None;
        }
    }

    fn on_play(&mut self) {
        self.snapshot.is_playing = true;
    }

    fn on_pause(&mut self) {
        self.snapshot.is_playing = false;
    }

    fn on_ended(&mut self) {
        self.snapshot.is_playing = false;
        if self.range.take().is_some() {
            debug!("Range cleared by end of media");
        }
    }
}
