//! Playback coordinator scenarios against the simulated media handle
//!
//! Covers the coordinator's public contract end to end:
//! - range playback starts only after its seek completes and stops at its end
//! - commands issued before readiness are dropped without touching the handle
//! - only the most recent range request ever starts playing, wherever its
//!   seek settles
//! - a manual seek abandons a pending range start
//! - toggle / continuous / end-of-media transitions
//! - platform playback rejection

mod helpers;

use helpers::PlayerHarness;
use scribe_common::events::{PlayerPhase, ScribeEvent};
use scribe_player::playback::{MediaCall, MediaSignal, PlaybackRange, PlayerCommand};

const DT: f64 = 0.25;

fn state_changes(events: &[ScribeEvent]) -> Vec<(PlayerPhase, PlayerPhase)> {
    events
        .iter()
        .filter_map(|e| match e {
            ScribeEvent::PlaybackStateChanged { old_state, new_state, .. } => {
                Some((*old_state, *new_state))
            }
            _ => None,
        })
        .collect()
}

// ============================================================================
// Range playback
// ============================================================================

/// **Given:** 120s source, ready
/// **When:** play_range(30, 45)
/// **Then:** seek→30, play on seek completion, pause and clear at 45.0
#[test]
fn test_range_scenario_30_to_45() {
    let mut h = PlayerHarness::ready(120.0);

    h.coordinator.play_range(30.0, 45.0);
    // Nothing plays until the seek completes
    assert_eq!(h.platform.calls(), vec![MediaCall::Seek(30.0)]);
    assert_eq!(h.coordinator.phase(), PlayerPhase::Paused);

    h.pump();
    assert_eq!(h.platform.calls(), vec![MediaCall::Seek(30.0), MediaCall::Play]);
    assert_eq!(h.coordinator.phase(), PlayerPhase::PlayingBounded);
    assert!(h.coordinator.snapshot().is_playing);

    h.run_for(20.0, DT);

    let snapshot = h.coordinator.snapshot();
    assert!(!snapshot.is_playing);
    assert_eq!(snapshot.current_time, 45.0);
    assert!(h.coordinator.range().is_none());
    assert_eq!(h.platform.position(), 45.0);
    assert_eq!(h.platform.calls().last(), Some(&MediaCall::Pause));

    // Position advanced from the range start, not from 0
    let first_update = h.delivered.iter().find_map(|s| match s {
        MediaSignal::TimeUpdate { current_time } => Some(*current_time),
        _ => None,
    });
    assert_eq!(first_update, Some(30.25));
}

#[test]
fn test_range_publishes_transitions_and_completion() {
    let mut h = PlayerHarness::ready(120.0);
    h.drain_events();

    h.coordinator.play_range(30.0, 45.0);
    h.pump();
    h.run_for(20.0, DT);

    let events = h.drain_events();
    assert_eq!(
        state_changes(&events),
        vec![
            (PlayerPhase::Paused, PlayerPhase::PlayingBounded),
            (PlayerPhase::PlayingBounded, PlayerPhase::Paused),
        ]
    );

    let completions: Vec<(f64, f64)> = events
        .iter()
        .filter_map(|e| match e {
            ScribeEvent::RangeCompleted { start, end, .. } => Some((*start, *end)),
            _ => None,
        })
        .collect();
    assert_eq!(completions, vec![(30.0, 45.0)]);
}

#[test]
fn test_range_stops_within_one_signal_of_boundary() {
    let mut h = PlayerHarness::ready(120.0);
    h.coordinator.play_range(10.0, 11.0);
    h.pump();

    // 10.0 → 10.75: still inside
    for _ in 0..3 {
        h.platform.advance(DT);
        h.pump();
    }
    assert!(h.coordinator.snapshot().is_playing);

    // Overshoot the boundary in one large step
    h.platform.advance(0.6);
    let update = h.step();
    assert!(matches!(update, Some(MediaSignal::TimeUpdate { .. })));

    // Same reaction: paused and range cleared, before the Pause signal arrives
    assert!(!h.coordinator.snapshot().is_playing);
    assert!(h.coordinator.range().is_none());
    assert_eq!(h.platform.calls().last(), Some(&MediaCall::Pause));
}

#[test]
fn test_range_while_playing_continuous_becomes_bounded() {
    let mut h = PlayerHarness::ready(120.0);
    h.coordinator.play_continuous();
    h.pump();
    h.run_for(50.0, DT);
    assert_eq!(h.coordinator.phase(), PlayerPhase::PlayingContinuous);

    h.coordinator.play_range(30.0, 45.0);
    h.pump();
    assert_eq!(h.coordinator.phase(), PlayerPhase::PlayingBounded);

    h.run_for(20.0, DT);
    assert_eq!(h.coordinator.phase(), PlayerPhase::Paused);
    assert_eq!(h.coordinator.snapshot().current_time, 45.0);
}

#[test]
fn test_range_past_end_of_media_cleared_by_ended() {
    let mut h = PlayerHarness::ready(60.0);
    h.coordinator.play_range(50.0, 90.0);
    h.pump();

    h.run_for(15.0, DT);

    assert!(h.delivered.contains(&MediaSignal::Ended));
    assert!(!h.coordinator.snapshot().is_playing);
    assert!(h.coordinator.range().is_none());
}

#[test]
fn test_invalid_range_rejected() {
    let mut h = PlayerHarness::ready(120.0);

    h.coordinator.play_range(45.0, 30.0);
    h.coordinator.play_range(10.0, 10.0);
    h.coordinator.play_range(-2.0, 5.0);
    h.coordinator.play_range(f64::NAN, 5.0);

    assert!(h.platform.calls().is_empty());
    assert!(h.coordinator.range().is_none());
    assert!(h.coordinator.pending_seek_play().is_none());
}

// ============================================================================
// Readiness
// ============================================================================

#[test]
fn test_play_range_before_any_source_is_noop() {
    let mut h = PlayerHarness::new(120.0);
    let before = h.coordinator.snapshot();

    h.coordinator.play_range(30.0, 45.0);

    assert_eq!(h.coordinator.snapshot(), before);
    assert!(h.platform.calls().is_empty());
    assert!(h.coordinator.range().is_none());
    assert!(h.coordinator.pending_seek_play().is_none());
    assert!(h.drain_events().is_empty());
}

#[test]
fn test_play_range_before_metadata_is_noop() {
    let mut h = PlayerHarness::new(120.0);
    h.coordinator.load_source("/api/audio/slow").unwrap();
    // LoadedMetadata is queued but not delivered yet
    h.platform.clear_calls();

    h.coordinator.play_range(30.0, 45.0);
    assert!(h.platform.calls().is_empty());
    assert_eq!(h.coordinator.phase(), PlayerPhase::Idle);

    h.pump();
    assert_eq!(h.coordinator.phase(), PlayerPhase::Paused);
    // The dropped request was not queued for later
    assert!(h.platform.calls().is_empty());
    assert!(!h.coordinator.snapshot().is_playing);
}

#[test]
fn test_source_change_resets_readiness() {
    let mut h = PlayerHarness::ready(120.0);
    h.coordinator.play_range(30.0, 45.0);
    h.pump();

    let new_id = h.coordinator.load_source("/api/audio/next").unwrap();
    assert_eq!(h.coordinator.phase(), PlayerPhase::Idle);
    assert!(h.coordinator.range().is_none());
    h.platform.clear_calls();

    h.coordinator.play_range(5.0, 8.0);
    assert!(h.platform.calls().is_empty());

    h.drain_events();
    h.pump();
    h.coordinator.play_range(5.0, 8.0);
    assert_eq!(h.platform.calls(), vec![MediaCall::Seek(5.0)]);

    for event in h.drain_events() {
        assert_eq!(event.source_id(), new_id);
    }
}

#[test]
fn test_load_failure_leaves_idle() {
    let mut h = PlayerHarness::ready(120.0);
    let result = h.coordinator.load_source("");

    assert!(result.is_err());
    assert_eq!(h.coordinator.phase(), PlayerPhase::Idle);
    assert_eq!(h.pump(), 0);
}

// ============================================================================
// Superseded range requests
// ============================================================================

#[test]
fn test_second_range_wins_when_each_seek_completes() {
    let mut h = PlayerHarness::ready(120.0);
    h.platform.set_defer_seeks(true);

    h.coordinator.play_range(30.0, 45.0);
    h.coordinator.play_range(60.0, 70.0);
    h.platform.complete_seeks(false);

    // First completion (30.0) must not start playback
    assert_eq!(h.step(), Some(MediaSignal::Seeked { position: 30.0 }));
    assert!(!h.platform.calls().contains(&MediaCall::Play));

    h.pump();
    assert!(h.platform.is_playing());
    assert_eq!(h.platform.position(), 60.0);
    assert_eq!(h.coordinator.range(), PlaybackRange::new(60.0, 70.0));

    h.run_for(15.0, DT);
    assert_eq!(h.coordinator.snapshot().current_time, 70.0);
    let positions: Vec<f64> = h
        .delivered
        .iter()
        .filter_map(|s| match s {
            MediaSignal::TimeUpdate { current_time } => Some(*current_time),
            _ => None,
        })
        .collect();
    assert!(positions.iter().all(|p| *p > 60.0 && *p <= 70.0));
}

#[test]
fn test_second_range_wins_when_seeks_coalesce() {
    let mut h = PlayerHarness::ready(120.0);
    h.platform.set_defer_seeks(true);

    h.coordinator.play_range(30.0, 45.0);
    h.coordinator.play_range(60.0, 70.0);
    h.platform.complete_seeks(true);
    h.pump();

    assert_eq!(
        h.platform.calls(),
        vec![MediaCall::Seek(30.0), MediaCall::Seek(60.0), MediaCall::Play]
    );
    assert_eq!(h.coordinator.phase(), PlayerPhase::PlayingBounded);
    assert_eq!(h.coordinator.range(), PlaybackRange::new(60.0, 70.0));
}

#[test]
fn test_continuous_cancels_pending_range() {
    let mut h = PlayerHarness::ready(120.0);
    h.coordinator.play_range(30.0, 45.0);
    h.coordinator.play_continuous();
    h.pump();

    assert_eq!(h.coordinator.phase(), PlayerPhase::PlayingContinuous);
    assert!(h.coordinator.pending_seek_play().is_none());

    h.run_for(20.0, DT);
    // No boundary any more
    assert!(h.coordinator.snapshot().is_playing);
    assert!(h.coordinator.snapshot().current_time > 45.0);
}

// ============================================================================
// Toggle / continuous
// ============================================================================

#[test]
fn test_toggle_pauses_bounded_playback() {
    let mut h = PlayerHarness::ready(120.0);
    h.coordinator.play_range(30.0, 45.0);
    h.pump();
    h.run_for(2.0, DT);

    h.coordinator.toggle();
    assert!(!h.coordinator.snapshot().is_playing);
    assert_eq!(h.coordinator.phase(), PlayerPhase::Paused);
    h.pump();
    assert!(!h.platform.is_playing());
}

#[test]
fn test_toggle_from_paused_plays_continuous_and_clears_range() {
    let mut h = PlayerHarness::ready(120.0);
    h.coordinator.play_range(30.0, 45.0);
    h.pump();
    h.run_for(2.0, DT);
    h.coordinator.toggle();
    h.pump();
    // Paused mid-range: range kept until something supersedes it
    assert_eq!(h.coordinator.range(), PlaybackRange::new(30.0, 45.0));

    h.coordinator.toggle();
    assert!(h.coordinator.range().is_none());
    h.pump();
    assert_eq!(h.coordinator.phase(), PlayerPhase::PlayingContinuous);

    h.run_for(20.0, DT);
    assert!(h.coordinator.snapshot().current_time > 45.0);
}

#[test]
fn test_toggle_pauses_continuous_playback() {
    let mut h = PlayerHarness::ready(120.0);
    h.coordinator.toggle();
    h.pump();
    assert_eq!(h.coordinator.phase(), PlayerPhase::PlayingContinuous);

    h.coordinator.toggle();
    h.pump();
    assert_eq!(h.coordinator.phase(), PlayerPhase::Paused);
}

#[test]
fn test_toggle_before_ready_is_noop() {
    let mut h = PlayerHarness::new(120.0);
    h.coordinator.toggle();
    assert!(h.platform.calls().is_empty());
    assert_eq!(h.coordinator.phase(), PlayerPhase::Idle);
}

#[test]
fn test_continuous_to_end_of_media() {
    let mut h = PlayerHarness::ready(20.0);
    h.coordinator.play_continuous();
    h.pump();

    h.run_for(25.0, 0.5);

    assert!(h.delivered.contains(&MediaSignal::Ended));
    assert!(!h.coordinator.snapshot().is_playing);
    assert!(h.coordinator.range().is_none());
    assert_eq!(h.coordinator.snapshot().current_time, 20.0);
}

#[test]
fn test_commands_as_data() {
    let mut h = PlayerHarness::ready(120.0);
    for command in ["range:30:45", "toggle", "seek:12", "continuous"] {
        h.coordinator.apply(command.parse::<PlayerCommand>().unwrap());
        h.pump();
    }
    assert_eq!(h.coordinator.phase(), PlayerPhase::PlayingContinuous);
    assert_eq!(h.platform.position(), 12.0);
}

// ============================================================================
// Seek completions away from the requested start
// ============================================================================

/// **Given:** handle that snaps seeks back to a 2s keyframe grid
/// **When:** play_range(31, 45)
/// **Then:** the completion at 30.0 starts the range, which still stops at 45
#[test]
fn test_snapped_seek_still_starts_range() {
    let mut h = PlayerHarness::ready(120.0);
    h.platform.set_seek_granularity(Some(2.0));

    h.coordinator.play_range(31.0, 45.0);
    h.pump();

    assert!(h.delivered.contains(&MediaSignal::Seeked { position: 30.0 }));
    assert_eq!(h.coordinator.phase(), PlayerPhase::PlayingBounded);
    assert!(h.coordinator.pending_seek_play().is_none());

    h.run_for(20.0, DT);
    assert!(!h.coordinator.snapshot().is_playing);
    assert_eq!(h.coordinator.snapshot().current_time, 45.0);
    assert!(h.coordinator.range().is_none());
}

#[test]
fn test_snapped_seeks_second_range_wins() {
    for coalesce in [false, true] {
        let mut h = PlayerHarness::ready(120.0);
        h.platform.set_seek_granularity(Some(2.0));
        h.platform.set_defer_seeks(true);

        h.coordinator.play_range(31.0, 45.0);
        h.coordinator.play_range(61.0, 70.0);
        h.platform.complete_seeks(coalesce);
        h.pump();

        let plays = h.platform.calls().iter().filter(|c| **c == MediaCall::Play).count();
        assert_eq!(plays, 1, "coalesce={}", coalesce);
        assert_eq!(h.platform.position(), 60.0);
        assert_eq!(h.coordinator.range(), PlaybackRange::new(61.0, 70.0));

        h.run_for(15.0, DT);
        assert!(!h.coordinator.snapshot().is_playing, "coalesce={}", coalesce);
        assert_eq!(h.coordinator.snapshot().current_time, 70.0);
    }
}

#[test]
fn test_range_starting_past_end_of_media_rejected() {
    let mut h = PlayerHarness::ready(120.0);

    h.coordinator.play_range(121.0, 125.0);

    assert!(h.platform.calls().is_empty());
    assert!(h.coordinator.pending_seek_play().is_none());
    assert!(h.coordinator.range().is_none());
    assert_eq!(h.coordinator.phase(), PlayerPhase::Paused);
}

#[test]
fn test_range_running_past_end_of_media_plays_to_end() {
    let mut h = PlayerHarness::ready(120.0);

    h.coordinator.play_range(115.0, 125.0);
    h.pump();
    assert_eq!(h.coordinator.phase(), PlayerPhase::PlayingBounded);

    h.run_for(10.0, DT);
    assert!(h.delivered.contains(&MediaSignal::Ended));
    assert!(!h.coordinator.snapshot().is_playing);
    assert!(h.coordinator.range().is_none());
}

// ============================================================================
// Manual seek while a range start is pending
// ============================================================================

#[test]
fn test_manual_seek_abandons_pending_range() {
    for coalesce in [false, true] {
        let mut h = PlayerHarness::ready(120.0);
        h.platform.set_defer_seeks(true);

        h.coordinator.play_range(30.0, 45.0);
        h.coordinator.seek(50.0);
        assert!(h.coordinator.pending_seek_play().is_none());

        h.platform.complete_seeks(coalesce);
        h.pump();

        assert!(!h.platform.calls().contains(&MediaCall::Play), "coalesce={}", coalesce);
        assert_eq!(h.coordinator.phase(), PlayerPhase::Paused);
        assert_eq!(h.coordinator.snapshot().current_time, 50.0);
        assert!(h.coordinator.pending_seek_play().is_none());
    }
}

/// **Given:** bounded playback of 30..45 in progress
/// **When:** play_range(60, 70), then seek(10) before either seek completes
/// **Then:** playback continues from 10 and the 60..70 boundary still stops it
#[test]
fn test_manual_seek_while_pending_keeps_boundary_enforced() {
    let mut h = PlayerHarness::ready(120.0);
    h.coordinator.play_range(30.0, 45.0);
    h.pump();
    h.run_for(2.0, DT);
    h.platform.set_defer_seeks(true);

    h.coordinator.play_range(60.0, 70.0);
    h.coordinator.seek(10.0);
    h.platform.complete_seeks(true);
    h.pump();
    assert!(h.coordinator.pending_seek_play().is_none());
    assert!(h.coordinator.snapshot().is_playing);

    h.run_for(100.0, DT);

    assert_eq!(h.coordinator.phase(), PlayerPhase::Paused);
    assert_eq!(h.coordinator.snapshot().current_time, 70.0);
    assert!(h.coordinator.range().is_none());
    assert!(h.coordinator.pending_seek_play().is_none());
}

// ============================================================================
// Manual seek and platform rejection
// ============================================================================

/// Seeking during a bounded range leaves the range boundary as it was.
#[test]
fn test_seek_during_range_keeps_stale_boundary() {
    let mut h = PlayerHarness::ready(120.0);
    h.coordinator.play_range(30.0, 45.0);
    h.pump();
    h.run_for(1.0, DT);

    h.coordinator.seek(10.0);
    h.pump();
    assert_eq!(h.coordinator.range(), PlaybackRange::new(30.0, 45.0));
    assert_eq!(h.coordinator.snapshot().current_time, 10.0);
    assert!(h.coordinator.snapshot().is_playing);

    // Plays 10 → 45 before the old boundary stops it
    h.run_for(40.0, DT);
    assert!(!h.coordinator.snapshot().is_playing);
    assert_eq!(h.coordinator.snapshot().current_time, 45.0);
}

#[test]
fn test_rejected_play_after_seek_stays_paused() {
    let mut h = PlayerHarness::ready(120.0);
    h.platform.set_reject_play(true);
    h.drain_events();

    h.coordinator.play_range(30.0, 45.0);
    h.pump();

    assert_eq!(h.coordinator.phase(), PlayerPhase::Paused);
    assert!(h.coordinator.pending_seek_play().is_none());
    // Exactly one attempt, no retry
    let plays = h.platform.calls().iter().filter(|c| **c == MediaCall::Play).count();
    assert_eq!(plays, 1);
    h.pump();
    assert_eq!(
        h.platform.calls().iter().filter(|c| **c == MediaCall::Play).count(),
        1
    );

    let rejected = h
        .drain_events()
        .into_iter()
        .any(|e| matches!(e, ScribeEvent::PlaybackRejected { .. }));
    assert!(rejected);

    // User retries manually once the platform allows playback
    h.platform.set_reject_play(false);
    h.coordinator.toggle();
    h.pump();
    assert_eq!(h.coordinator.phase(), PlayerPhase::PlayingContinuous);
}
