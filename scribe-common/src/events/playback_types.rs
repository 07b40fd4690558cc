//! Playback-related type definitions
//!
//! Supporting types for the coordinator state published on the event bus.

use serde::{Deserialize, Serialize};

/// Named playback phase of the coordinator
///
/// `Idle` is entered on every source load and left on the first
/// metadata-loaded signal. There is no terminal phase.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlayerPhase {
    /// No metadata for the current source yet
    Idle,
    /// Ready, not playing
    Paused,
    /// Playing with no range boundary
    PlayingContinuous,
    /// Playing a range that stops itself at its end
    PlayingBounded,
}

impl PlayerPhase {
    pub fn is_playing(self) -> bool {
        matches!(self, PlayerPhase::PlayingContinuous | PlayerPhase::PlayingBounded)
    }
}

impl std::fmt::Display for PlayerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerPhase::Idle => write!(f, "idle"),
            PlayerPhase::Paused => write!(f, "paused"),
            PlayerPhase::PlayingContinuous => write!(f, "playing_continuous"),
            PlayerPhase::PlayingBounded => write!(f, "playing_bounded"),
        }
    }
}

/// Externally observable coordinator snapshot
///
/// Every field is derived from media handle signals; UI collaborators read
/// it and never write it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PlaybackSnapshot {
    /// Whether the media handle last reported play (vs. pause/ended)
    pub is_playing: bool,
    /// Last reported position in seconds
    pub current_time: f64,
    /// Duration in seconds from the metadata-loaded signal (0 until known)
    pub duration: f64,
    /// True once metadata for the current source has loaded
    pub is_ready: bool,
}
