//! Transcript session
//!
//! Binds one ASR result to one playback coordinator. Activating a transcript
//! line plays exactly that line; position updates move the highlighted line.

use scribe_common::events::ScribeEvent;
use scribe_common::human_time::{format_duration, format_span};
use scribe_common::time::now;
use scribe_common::AsrResult;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::PlayerConfig;
use crate::error::{Error, Result};
use crate::playback::{MediaHandle, MediaSignal, PlaybackCoordinator};

pub struct TranscriptSession<M: MediaHandle> {
    transcript: AsrResult,
    coordinator: PlaybackCoordinator<M>,
    audio_url: String,
    /// Sentence containing the position, kept while the position is between sentences
    active_segment: Option<usize>,
}

impl<M: MediaHandle> TranscriptSession<M> {
    pub fn new(transcript: AsrResult, coordinator: PlaybackCoordinator<M>, config: &PlayerConfig) -> Self {
        let audio_url = config.audio_url(&transcript.result_id);
        Self {
            transcript,
            coordinator,
            audio_url,
            active_segment: None,
        }
    }

    pub fn transcript(&self) -> &AsrResult {
        &self.transcript
    }

    pub fn coordinator(&self) -> &PlaybackCoordinator<M> {
        &self.coordinator
    }

    /// Transport controls (toggle, seek, continuous) go through here
    pub fn coordinator_mut(&mut self) -> &mut PlaybackCoordinator<M> {
        &mut self.coordinator
    }

    pub fn audio_url(&self) -> &str {
        &self.audio_url
    }

    pub fn active_segment(&self) -> Option<usize> {
        self.active_segment
    }

    /// Load this result's audio into the media handle
    pub fn load_audio(&mut self) -> Result<Uuid> {
        self.active_segment = None;
        self.coordinator.load_source(&self.audio_url)
    }

    /// Play the sentence at `index`, stopping at its end
    ///
    /// Activations before the audio is ready are dropped by the coordinator;
    /// the user simply clicks again.
    pub fn activate_segment(&mut self, index: usize) -> Result<()> {
        let sentence = self
            .transcript
            .sentence(index)
            .ok_or(Error::SegmentNotFound {
                index,
                count: self.transcript.sentences.len(),
            })?;
        let (start, end) = (sentence.start, sentence.end);

        if !self.coordinator.snapshot().is_ready {
            info!("Segment {} activated before audio is ready", index);
        } else {
            debug!("Segment {} activated: {}", index, format_span(start, end));
        }
        self.coordinator.play_range(start, end);
        Ok(())
    }

    /// Forward a media signal, then update the active sentence
    pub fn handle_signal(&mut self, signal: MediaSignal) {
        self.coordinator.handle_signal(signal);

        let position = self.coordinator.snapshot().current_time;
        if let Some(index) = self.transcript.sentence_at(position) {
            if self.active_segment != Some(index) {
                debug!("Active segment {} at {:.3}s", index, position);
                self.active_segment = Some(index);
                self.coordinator.events().emit_lossy(ScribeEvent::ActiveSegmentChanged {
                    source_id: self.coordinator.source_id(),
                    index,
                    timestamp: now(),
                });
            }
        }
    }

    // ========================================
    // Display helpers
    // ========================================

    pub fn speaker_count(&self) -> usize {
        self.transcript.speaker_count()
    }

    pub fn source_language(&self) -> String {
        self.transcript.source_language()
    }

    /// Played fraction in `0.0..=1.0`; 0 while the duration is unknown
    pub fn progress(&self) -> f64 {
        let snapshot = self.coordinator.snapshot();
        if snapshot.duration > 0.0 {
            (snapshot.current_time / snapshot.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Position clock, `0:00` until the duration is known
    pub fn position_label(&self) -> String {
        let snapshot = self.coordinator.snapshot();
        if snapshot.duration > 0.0 {
            format_duration(snapshot.current_time)
        } else {
            "0:00".to_string()
        }
    }

    pub fn duration_label(&self) -> String {
        format_duration(self.coordinator.snapshot().duration)
    }

    /// `SPEAKER_NN  MM:SS.cc - MM:SS.cc` heading for a transcript line
    pub fn segment_label(&self, index: usize) -> Option<String> {
        self.transcript.sentence(index).map(|s| {
            format!("SPEAKER_{:02}  {}", s.speaker, format_span(s.start, s.end))
        })
    }
}
