//! Error types for scribe-player
//!
//! Defines module-specific error types using thiserror for clear error propagation.
//! The four playback commands never return these; they are for loading sources,
//! configuration and transcript navigation.

use thiserror::Error;

use crate::playback::MediaError;

/// Main error type for scribe-player
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file loading or validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Media handle refused an operation
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Sentence index outside the transcript
    #[error("Segment not found: {index} (transcript has {count} sentences)")]
    SegmentNotFound { index: usize, count: usize },

    /// Command text could not be parsed
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

/// Convenience Result type using scribe-player Error
pub type Result<T> = std::result::Result<T, Error>;
