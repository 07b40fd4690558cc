//! Transcript model
//!
//! Mirrors the result document produced by the ASR backend. Only the fields
//! the player needs are required; everything else defaults so older result
//! files still decode.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// Per-sentence translation attached by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    #[serde(default)]
    pub zh: String,
    #[serde(default)]
    pub en: String,
    /// Detected language of the original speech (e.g. "en", "ja")
    #[serde(default)]
    pub source_lang: String,
}

/// One recognized sentence with its position in the audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceSegment {
    pub text: String,
    /// Start offset in seconds
    pub start: f64,
    /// End offset in seconds
    pub end: f64,
    /// Diarized speaker number
    #[serde(default)]
    pub speaker: u32,
    #[serde(default)]
    pub translation: Translation,
}

impl SentenceSegment {
    /// Whether `position` falls inside this sentence (both ends inclusive)
    pub fn contains(&self, position: f64) -> bool {
        position >= self.start && position <= self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Complete recognition result for one audio file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsrResult {
    #[serde(default)]
    pub success: bool,
    /// Backend identifier, also used to address the audio file
    pub result_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub sentences: Vec<SentenceSegment>,
    #[serde(default)]
    pub speakers: Vec<u32>,
    /// Total audio duration in seconds as measured by the backend
    #[serde(default)]
    pub total_duration: f64,
    #[serde(default)]
    pub audio_hash: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub audio_path: String,
    #[serde(default)]
    pub updated_timestamp: Option<String>,
    /// Backend processing time in seconds
    #[serde(default)]
    pub processing_time: Option<f64>,
}

impl AsrResult {
    /// Decode and validate a result document from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let result: AsrResult = serde_json::from_str(json)?;
        result.validate()?;
        Ok(result)
    }

    /// Read, decode and validate a result file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let result = Self::from_json(&json)?;
        debug!(
            "Loaded transcript {} ({} sentences) from {}",
            result.result_id,
            result.sentences.len(),
            path.display()
        );
        Ok(result)
    }

    /// Check that every sentence has a usable time span
    ///
    /// A sentence must have finite bounds with `0 <= start <= end`. Zero-length
    /// sentences are accepted (the backend emits them for single-token lines)
    /// but cannot be played as a range.
    pub fn validate(&self) -> Result<()> {
        if self.result_id.trim().is_empty() {
            return Err(Error::InvalidInput("result_id is empty".to_string()));
        }
        for (index, sentence) in self.sentences.iter().enumerate() {
            if !sentence.start.is_finite() || !sentence.end.is_finite() {
                return Err(Error::InvalidInput(format!(
                    "sentence {} has a non-finite time span",
                    index
                )));
            }
            if sentence.start < 0.0 || sentence.end < sentence.start {
                return Err(Error::InvalidInput(format!(
                    "sentence {} has an invalid span {}..{}",
                    index, sentence.start, sentence.end
                )));
            }
        }
        Ok(())
    }

    pub fn sentence(&self, index: usize) -> Option<&SentenceSegment> {
        self.sentences.get(index)
    }

    /// Index of the first sentence containing `position`
    pub fn sentence_at(&self, position: f64) -> Option<usize> {
        self.sentences.iter().position(|s| s.contains(position))
    }

    /// Number of distinct speakers across all sentences
    pub fn speaker_count(&self) -> usize {
        self.sentences
            .iter()
            .map(|s| s.speaker)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Upper-cased language of the first sentence, `"AUTO"` when unknown
    pub fn source_language(&self) -> String {
        self.sentences
            .first()
            .map(|s| s.translation.source_lang.trim())
            .filter(|lang| !lang.is_empty())
            .map(str::to_uppercase)
            .unwrap_or_else(|| "AUTO".to_string())
    }
}
