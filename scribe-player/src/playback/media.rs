//! Media handle contract
//!
//! The media handle is the platform's playable resource (an audio element, a
//! native player). It accepts imperative calls and reports its lifecycle back
//! as [`MediaSignal`]s, which arrive asynchronously and in platform order.
//! Calls return as soon as the request is issued; completion is only ever
//! known from a later signal.

use thiserror::Error;

/// Failures a media handle may report synchronously
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MediaError {
    /// Platform refused to start playback (autoplay policy, resource error)
    #[error("playback rejected: {0}")]
    PlaybackRejected(String),

    /// Source URI could not be opened
    #[error("source error: {0}")]
    Source(String),
}

/// Imperative side of the media handle
///
/// Only `load` and `play` can fail synchronously. `seek` and `pause` are
/// fire-and-forget, matching platform media elements.
pub trait MediaHandle {
    /// Replace the current source and start loading it
    fn load(&mut self, source: &str) -> Result<(), MediaError>;

    /// Request a position change (completion is signalled by `Seeked`)
    fn seek(&mut self, time: f64);

    /// Request playback from the current position (confirmed by `Play`)
    fn play(&mut self) -> Result<(), MediaError>;

    /// Request a pause (confirmed by `Pause`)
    fn pause(&mut self);
}

/// Lifecycle signals emitted by a media handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaSignal {
    /// Duration and seek behavior are now reliable
    LoadedMetadata { duration: f64 },
    /// Playback position advanced (or was set)
    TimeUpdate { current_time: f64 },
    /// A seek finished; `position` is where the handle settled
    Seeked { position: f64 },
    /// Playback started
    Play,
    /// Playback paused
    Pause,
    /// End of media reached
    Ended,
}

impl MediaSignal {
    /// Short platform-style name, used in logs
    pub fn name(&self) -> &'static str {
        match self {
            MediaSignal::LoadedMetadata { .. } => "loadedmetadata",
            MediaSignal::TimeUpdate { .. } => "timeupdate",
            MediaSignal::Seeked { .. } => "seeked",
            MediaSignal::Play => "play",
            MediaSignal::Pause => "pause",
            MediaSignal::Ended => "ended",
        }
    }
}
