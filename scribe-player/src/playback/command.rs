//! Coordinator commands as data
//!
//! Lets UI transports (JSON messages, CLI scripts) drive the coordinator
//! through one entry point, `PlaybackCoordinator::apply`.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// UI-issued playback command
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PlayerCommand {
    /// Pause if playing, otherwise start continuous playback
    Toggle,
    /// Move the position without touching the active range
    Seek { time: f64 },
    /// Play `[start, end]` and stop at `end`
    PlayRange { start: f64, end: f64 },
    /// Play with no boundary
    PlayContinuous,
}

fn parse_secs(field: &str, text: &str) -> Result<f64, Error> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| Error::InvalidCommand(format!("{} is not a number: '{}'", field, text)))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidCommand(format!("{} must be finite", field)))
    }
}

/// Textual form: `toggle`, `seek:12.5`, `range:30:45`, `continuous`
impl FromStr for PlayerCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split(':');
        let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
        let args: Vec<&str> = parts.collect();

        match (verb.as_str(), args.as_slice()) {
            ("toggle", []) => Ok(PlayerCommand::Toggle),
            ("continuous" | "play", []) => Ok(PlayerCommand::PlayContinuous),
            ("seek", [time]) => Ok(PlayerCommand::Seek {
                time: parse_secs("seek time", time)?,
            }),
            ("range", [start, end]) => Ok(PlayerCommand::PlayRange {
                start: parse_secs("range start", start)?,
                end: parse_secs("range end", end)?,
            }),
            _ => Err(Error::InvalidCommand(format!("unrecognized command '{}'", s))),
        }
    }
}
