//! Scribe transcript player (scribe-player) - Main entry point
//!
//! Loads an ASR result file and plays it against the simulated media handle,
//! driving the coordinator exactly as a UI would: one sentence click (or
//! transport command) at a time, with the virtual clock advanced on a timer.
//! Useful for exercising range playback and readiness races without a browser.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scribe_common::events::{EventBus, ScribeEvent};
use scribe_common::human_time::format_duration;
use scribe_common::AsrResult;
use scribe_player::playback::{PlaybackCoordinator, PlayerCommand, SimulatedMedia, SimulatedPlatform};
use scribe_player::{PlayerConfig, TranscriptSession};

/// Command-line arguments for scribe-player
#[derive(Parser, Debug)]
#[command(name = "scribe-player")]
#[command(about = "Play an ASR transcript against a simulated media handle")]
#[command(version)]
struct Args {
    /// ASR result JSON file
    transcript: PathBuf,

    /// Configuration file (defaults to SCRIBE_CONFIG, then the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend API base URL (overrides the config file)
    #[arg(long, env = "SCRIBE_API_BASE_URL")]
    api_base_url: Option<String>,

    /// Script step, repeatable: segment:N, toggle, seek:T, range:S:E, continuous, wait:T
    ///
    /// Without steps every sentence is played in order.
    #[arg(short, long = "script")]
    script: Vec<String>,

    /// Real milliseconds between clock ticks
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    /// Virtual seconds per real second
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Log level (overrides RUST_LOG and the config file)
    #[arg(long)]
    log_level: Option<String>,
}

/// One step of a playback script
#[derive(Debug, Clone, Copy, PartialEq)]
enum ScriptStep {
    /// Activate a transcript sentence (range playback)
    Segment(usize),
    /// Issue a coordinator command
    Command(PlayerCommand),
    /// Let virtual time pass before the next step
    Wait(f64),
}

impl FromStr for ScriptStep {
    type Err = scribe_player::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(index) = trimmed.strip_prefix("segment:") {
            let index = index.parse().map_err(|_| {
                scribe_player::Error::InvalidCommand(format!("bad segment index '{}'", index))
            })?;
            return Ok(ScriptStep::Segment(index));
        }
        if let Some(secs) = trimmed.strip_prefix("wait:") {
            let secs: f64 = secs.parse().map_err(|_| {
                scribe_player::Error::InvalidCommand(format!("bad wait time '{}'", secs))
            })?;
            if !secs.is_finite() || secs < 0.0 {
                return Err(scribe_player::Error::InvalidCommand(format!(
                    "wait time must be a non-negative number, got {}",
                    secs
                )));
            }
            return Ok(ScriptStep::Wait(secs));
        }
        trimmed.parse().map(ScriptStep::Command)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Configuration is read before logging starts so its level can apply
    let mut config = PlayerConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(url) = &args.api_base_url {
        config.api_base_url = url.clone();
        config.validate().context("Invalid --api-base-url")?;
    }

    let env_filter = match &args.log_level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
    };
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    if !args.speed.is_finite() || args.speed <= 0.0 {
        bail!("--speed must be a positive number, got {}", args.speed);
    }

    let transcript = AsrResult::load(&args.transcript)
        .with_context(|| format!("Failed to load transcript {}", args.transcript.display()))?;

    let mut steps: VecDeque<ScriptStep> = if args.script.is_empty() {
        (0..transcript.sentences.len()).map(ScriptStep::Segment).collect()
    } else {
        args.script
            .iter()
            .map(|s| s.parse::<ScriptStep>())
            .collect::<std::result::Result<VecDeque<_>, _>>()
            .context("Invalid --script step")?
    };

    let duration = if transcript.total_duration > 0.0 {
        transcript.total_duration
    } else {
        transcript.sentences.iter().map(|s| s.end).fold(0.0, f64::max)
    };

    info!(
        "Transcript {} ({}): {} sentences, {} speakers, language {}, {}",
        transcript.result_id,
        transcript.filename,
        transcript.sentences.len(),
        transcript.speaker_count(),
        transcript.source_language(),
        format_duration(duration)
    );

    let events = Arc::new(EventBus::new(config.event_capacity));
    let mut event_rx = events.subscribe();

    let (media, platform) = SimulatedMedia::new(duration);
    let coordinator = PlaybackCoordinator::new(media, Arc::clone(&events));
    let mut session = TranscriptSession::new(transcript, coordinator, &config);

    session
        .load_audio()
        .with_context(|| format!("Failed to load audio {}", session.audio_url()))?;
    deliver_signals(&mut session, &platform);

    let tick = Duration::from_millis(args.tick_ms.max(1));
    let virtual_dt = tick.as_secs_f64() * args.speed;
    let mut interval = tokio::time::interval(tick);
    let mut wait_remaining: Option<f64> = None;
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    info!(
        "Running {} script steps ({:.3} virtual s per {}ms tick)",
        steps.len(),
        virtual_dt,
        tick.as_millis()
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut shutdown => break,
        }

        let ready_for_step = match wait_remaining {
            Some(remaining) if remaining > 0.0 => false,
            Some(_) => {
                wait_remaining = None;
                true
            }
            None => !is_busy(&session),
        };

        if ready_for_step {
            match steps.pop_front() {
                Some(step) => {
                    run_step(&mut session, step, &mut wait_remaining);
                    deliver_signals(&mut session, &platform);
                }
                None => break,
            }
        }

        platform.advance(virtual_dt);
        if let Some(remaining) = wait_remaining.as_mut() {
            *remaining -= virtual_dt;
        }
        deliver_signals(&mut session, &platform);
        log_events(&mut event_rx);
    }

    log_events(&mut event_rx);
    info!(
        "Stopped at {} / {} ({} media calls)",
        session.position_label(),
        session.duration_label(),
        platform.calls().len()
    );
    Ok(())
}

/// Playback in progress or about to start
fn is_busy(session: &TranscriptSession<SimulatedMedia>) -> bool {
    let coordinator = session.coordinator();
    coordinator.phase().is_playing() || coordinator.pending_seek_play().is_some()
}

fn run_step(
    session: &mut TranscriptSession<SimulatedMedia>,
    step: ScriptStep,
    wait_remaining: &mut Option<f64>,
) {
    info!("Step: {:?}", step);
    match step {
        ScriptStep::Segment(index) => {
            if let Some(label) = session.segment_label(index) {
                info!("{}", label);
            }
            if let Some(sentence) = session.transcript().sentence(index) {
                info!("  \"{}\"", sentence.text);
            }
            if let Err(e) = session.activate_segment(index) {
                warn!("{}", e);
            }
        }
        ScriptStep::Command(command) => session.coordinator_mut().apply(command),
        ScriptStep::Wait(secs) => *wait_remaining = Some(secs),
    }
}

/// Feed every queued media signal to the session, in order
fn deliver_signals(session: &mut TranscriptSession<SimulatedMedia>, platform: &SimulatedPlatform) {
    while let Some(signal) = platform.next_signal() {
        session.handle_signal(signal);
    }
}

fn log_events(rx: &mut broadcast::Receiver<ScribeEvent>) {
    loop {
        match rx.try_recv() {
            Ok(ScribeEvent::PlaybackSnapshot { state, .. }) => {
                debug!(
                    "{} / {} playing={}",
                    format_duration(state.current_time),
                    format_duration(state.duration),
                    state.is_playing
                );
            }
            Ok(ScribeEvent::PlaybackStateChanged { old_state, new_state, .. }) => {
                info!("[{} -> {}]", old_state, new_state);
            }
            Ok(ScribeEvent::RangeCompleted { start, end, .. }) => {
                info!("Range {:.2}..{:.2} finished", start, end);
            }
            Ok(ScribeEvent::PlaybackRejected { reason, .. }) => {
                warn!("Playback rejected: {}", reason);
            }
            Ok(ScribeEvent::ActiveSegmentChanged { index, .. }) => {
                debug!("Highlight sentence {}", index);
            }
            Ok(ScribeEvent::SourceLoaded { uri, .. }) => {
                info!("Source loaded: {}", uri);
            }
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                debug!("Event log lagged, skipped {} events", skipped);
            }
            Err(_) => break,
        }
    }
}

/// Resolves on Ctrl+C (or SIGTERM on unix)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, stopping"),
        _ = terminate => info!("Received terminate signal, stopping"),
    }
}
