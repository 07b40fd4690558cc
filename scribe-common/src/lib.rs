//! # Scribe Common Library
//!
//! Shared code for the Scribe transcript player crates:
//! - Error types
//! - Event types (ScribeEvent enum) and the EventBus
//! - Transcript model decoded from the ASR backend's result JSON
//! - Configuration file resolution
//! - Time display formatting

pub mod config;
pub mod error;
pub mod events;
pub mod human_time;
pub mod time;
pub mod transcript;

pub use error::{Error, Result};
pub use transcript::{AsrResult, SentenceSegment};
