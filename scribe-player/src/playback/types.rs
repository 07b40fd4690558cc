//! Playback types shared across modules

use serde::{Deserialize, Serialize};

/// Bounded playback interval in seconds
///
/// Playback started for a range stops itself once the position reaches `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackRange {
    pub start: f64,
    pub end: f64,
}

impl PlaybackRange {
    /// Build a range, rejecting non-finite bounds, negative starts and
    /// empty or inverted intervals.
    pub fn new(start: f64, end: f64) -> Option<Self> {
        if start.is_finite() && end.is_finite() && start >= 0.0 && end > start {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Whether `position` has reached the stop boundary
    pub fn is_complete_at(&self, position: f64) -> bool {
        position >= self.end
    }
}

/// Intent to start bounded playback once the matching seek completes
///
/// At most one exists at a time; a newer request overwrites it. The range it
/// starts is re-derived from the intent when it is consumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingSeekPlay {
    pub start: f64,
    pub end: f64,
}

impl PendingSeekPlay {
    /// Range this intent plays once consumed
    pub fn range(&self) -> Option<PlaybackRange> {
        PlaybackRange::new(self.start, self.end)
    }
}

impl From<PlaybackRange> for PendingSeekPlay {
    fn from(range: PlaybackRange) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}
