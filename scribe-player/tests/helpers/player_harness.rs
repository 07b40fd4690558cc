//! Coordinator + simulated media harness
//!
//! Signals are only delivered when the test calls `pump()` (or `run_for()`),
//! so each test controls exactly which reactions have happened.

#![allow(dead_code)]

use std::sync::Arc;

use scribe_common::events::{EventBus, ScribeEvent};
use scribe_player::playback::{MediaSignal, PlaybackCoordinator, SimulatedMedia, SimulatedPlatform};
use tokio::sync::broadcast;

pub struct PlayerHarness {
    pub coordinator: PlaybackCoordinator<SimulatedMedia>,
    pub platform: SimulatedPlatform,
    pub events: broadcast::Receiver<ScribeEvent>,
    /// Every signal delivered so far, in order
    pub delivered: Vec<MediaSignal>,
}

impl PlayerHarness {
    /// Coordinator with a source of `duration` seconds; nothing loaded yet
    pub fn new(duration: f64) -> Self {
        let bus = Arc::new(EventBus::new(1024));
        let events = bus.subscribe();
        let (media, platform) = SimulatedMedia::new(duration);
        Self {
            coordinator: PlaybackCoordinator::new(media, bus),
            platform,
            events,
            delivered: Vec::new(),
        }
    }

    /// Load a source and deliver its metadata, leaving the coordinator ready
    pub fn ready(duration: f64) -> Self {
        let mut harness = Self::new(duration);
        harness
            .coordinator
            .load_source("/api/audio/test")
            .expect("load should succeed");
        harness.pump();
        harness.platform.clear_calls();
        harness
    }

    /// Deliver every queued signal
    pub fn pump(&mut self) -> usize {
        let mut count = 0;
        while let Some(signal) = self.platform.next_signal() {
            self.delivered.push(signal);
            self.coordinator.handle_signal(signal);
            count += 1;
        }
        count
    }

    /// Deliver exactly one queued signal
    pub fn step(&mut self) -> Option<MediaSignal> {
        let signal = self.platform.next_signal()?;
        self.delivered.push(signal);
        self.coordinator.handle_signal(signal);
        Some(signal)
    }

    /// Advance the virtual clock in `dt` steps for `total` seconds, pumping each step
    pub fn run_for(&mut self, total: f64, dt: f64) {
        let mut elapsed = 0.0;
        while elapsed < total {
            self.platform.advance(dt);
            self.pump();
            elapsed += dt;
        }
    }

    /// Collect every event published so far
    pub fn drain_events(&mut self) -> Vec<ScribeEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}
