//! # Scribe Transcript Player Library (scribe-player)
//!
//! Playback side of the ASR transcript viewer.
//!
//! **Purpose:** Coordinate a platform media handle through continuous and
//! bounded (per-sentence) playback, and keep the highlighted transcript line
//! in step with the playback position.
//!
//! **Architecture:** Single-threaded and signal-driven. The coordinator owns
//! the media handle, reacts to its lifecycle signals one at a time and
//! publishes state changes on a `scribe_common::events::EventBus`.

pub mod config;
pub mod error;
pub mod playback;
pub mod session;

pub use config::PlayerConfig;
pub use error::{Error, Result};
pub use playback::PlaybackCoordinator;
pub use session::TranscriptSession;
