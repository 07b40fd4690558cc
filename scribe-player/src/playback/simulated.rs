//! In-process media handle with a virtual clock
//!
//! Behaves like a browser audio element, queueing signals instead of
//! dispatching them so the owner decides when they are delivered:
//! - `load` → `LoadedMetadata`
//! - `seek` → `Seeked { position }` (optionally withheld until released, and
//!   optionally snapped back to a keyframe grid)
//! - `play` → `Play` unless already playing
//! - `pause` → `Pause` if playing
//! - clock advance → `TimeUpdate`, and at the end `TimeUpdate`, `Pause`, `Ended`
//!
//! The handle half is moved into the coordinator; the platform half stays with
//! the driver (demo loop or test). Both share state through `Rc<RefCell<_>>`,
//! so neither half is `Send`.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::trace;

use super::media::{MediaError, MediaHandle, MediaSignal};

/// Imperative call received by the simulated handle
#[derive(Debug, Clone, PartialEq)]
pub enum MediaCall {
    Load(String),
    Seek(f64),
    Play,
    Pause,
}

#[derive(Debug)]
struct SimState {
    duration: f64,
    position: f64,
    playing: bool,
    loaded: bool,
    reject_play: bool,
    defer_seeks: bool,
    seek_granularity: Option<f64>,
    deferred_seeks: VecDeque<f64>,
    signals: VecDeque<MediaSignal>,
    calls: Vec<MediaCall>,
}

impl SimState {
    fn push(&mut self, signal: MediaSignal) {
        trace!("Simulated media queued {:?}", signal);
        self.signals.push_back(signal);
    }
}

/// Media handle half, owned by the coordinator
#[derive(Debug)]
pub struct SimulatedMedia {
    state: Rc<RefCell<SimState>>,
}

/// Driver half: clock, signal queue and call log
#[derive(Debug, Clone)]
pub struct SimulatedPlatform {
    state: Rc<RefCell<SimState>>,
}

impl SimulatedMedia {
    /// Create a handle/platform pair for a source of `duration` seconds
    #[allow(clippy::new_ret_no_self)]
    pub fn new(duration: f64) -> (SimulatedMedia, SimulatedPlatform) {
        let state = Rc::new(RefCell::new(SimState {
            duration: duration.max(0.0),
            position: 0.0,
            playing: false,
            loaded: false,
            reject_play: false,
            defer_seeks: false,
            seek_granularity: None,
            deferred_seeks: VecDeque::new(),
            signals: VecDeque::new(),
            calls: Vec::new(),
        }));
        (
            SimulatedMedia {
                state: Rc::clone(&state),
            },
            SimulatedPlatform { state },
        )
    }
}

impl MediaHandle for SimulatedMedia {
    fn load(&mut self, source: &str) -> Result<(), MediaError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(MediaCall::Load(source.to_string()));

        if source.trim().is_empty() {
            state.loaded = false;
            return Err(MediaError::Source("empty source URI".to_string()));
        }

        state.position = 0.0;
        state.playing = false;
        state.loaded = true;
        state.deferred_seeks.clear();
        state.signals.clear();
        let duration = state.duration;
        state.push(MediaSignal::LoadedMetadata { duration });
        Ok(())
    }

    fn seek(&mut self, time: f64) {
        let mut state = self.state.borrow_mut();
        state.calls.push(MediaCall::Seek(time));

        let snapped = match state.seek_granularity {
            Some(step) => (time / step).floor() * step,
            None => time,
        };
        let position = snapped.clamp(0.0, state.duration);
        state.position = position;
        if state.defer_seeks {
            state.deferred_seeks.push_back(position);
        } else {
            state.push(MediaSignal::Seeked { position });
        }
    }

    fn play(&mut self) -> Result<(), MediaError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(MediaCall::Play);

        if state.reject_play {
            return Err(MediaError::PlaybackRejected(
                "play() request denied by autoplay policy".to_string(),
            ));
        }
        if !state.loaded {
            return Err(MediaError::Source("no source loaded".to_string()));
        }
        if state.position >= state.duration {
            // Element restarts from the beginning when played at the end
            state.position = 0.0;
        }
        if !state.playing {
            state.playing = true;
            state.push(MediaSignal::Play);
        }
        Ok(())
    }

    fn pause(&mut self) {
        let mut state = self.state.borrow_mut();
        state.calls.push(MediaCall::Pause);

        if state.playing {
            state.playing = false;
            state.push(MediaSignal::Pause);
        }
    }
}

impl SimulatedPlatform {
    /// Advance the virtual clock by `dt` seconds
    pub fn advance(&self, dt: f64) {
        let mut state = self.state.borrow_mut();
        if !state.playing || dt <= 0.0 {
            return;
        }

        let next = state.position + dt;
        if next >= state.duration {
            state.position = state.duration;
            state.playing = false;
            let current_time = state.position;
            state.push(MediaSignal::TimeUpdate { current_time });
            state.push(MediaSignal::Pause);
            state.push(MediaSignal::Ended);
        } else {
            state.position = next;
            state.push(MediaSignal::TimeUpdate { current_time: next });
        }
    }

    /// Next queued signal, in emission order
    pub fn next_signal(&self) -> Option<MediaSignal> {
        self.state.borrow_mut().signals.pop_front()
    }

    /// Take every queued signal
    pub fn drain_signals(&self) -> Vec<MediaSignal> {
        self.state.borrow_mut().signals.drain(..).collect()
    }

    pub fn pending_signals(&self) -> usize {
        self.state.borrow().signals.len()
    }

    /// Make every following `play()` fail as an autoplay denial would
    pub fn set_reject_play(&self, reject: bool) {
        self.state.borrow_mut().reject_play = reject;
    }

    /// Withhold `Seeked` signals until [`complete_seeks`](Self::complete_seeks)
    pub fn set_defer_seeks(&self, defer: bool) {
        self.state.borrow_mut().defer_seeks = defer;
    }

    /// Snap every following seek down to a multiple of `step` seconds, as a
    /// keyframe-only seek would (`None` or a non-positive step seeks exactly)
    pub fn set_seek_granularity(&self, step: Option<f64>) {
        self.state.borrow_mut().seek_granularity = step.filter(|s| s.is_finite() && *s > 0.0);
    }

    /// Release withheld seeks
    ///
    /// With `coalesce`, only the most recent seek reports completion, as
    /// browsers do when a seek interrupts another.
    pub fn complete_seeks(&self, coalesce: bool) {
        let mut state = self.state.borrow_mut();
        let seeks: Vec<f64> = state.deferred_seeks.drain(..).collect();
        let released: Vec<f64> = if coalesce {
            seeks.last().copied().into_iter().collect()
        } else {
            seeks
        };
        for position in released {
            state.push(MediaSignal::Seeked { position });
        }
    }

    pub fn position(&self) -> f64 {
        self.state.borrow().position
    }

    pub fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    pub fn duration(&self) -> f64 {
        self.state.borrow().duration
    }

    /// Every call the handle received, oldest first
    pub fn calls(&self) -> Vec<MediaCall> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }
}
