//! Human-readable media time formatting
//!
//! Provides the two display forms used by the player:
//! - transport clock (`M:SS` / `H:MM:SS`) for position and total duration
//! - sentence timestamps (`MM:SS.cc` / `H:MM:SS.cc`) for transcript lines

const SECS_PER_HOUR: u64 = 3600;

/// Clamp invalid media times (negative, NaN, infinite) to zero.
fn sanitize(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

/// Format seconds as a transport clock.
///
/// Fractional seconds are truncated, as a running clock never shows a second
/// that has not fully elapsed.
///
/// # Examples
///
/// ```
/// use scribe_common::human_time::format_duration;
///
/// assert_eq!(format_duration(0.0), "0:00");
/// assert_eq!(format_duration(45.9), "0:45");
/// assert_eq!(format_duration(125.0), "2:05");
/// assert_eq!(format_duration(3725.0), "1:02:05");
/// ```
pub fn format_duration(seconds: f64) -> String {
    let total = sanitize(seconds).floor() as u64;
    let hours = total / SECS_PER_HOUR;
    let mins = (total % SECS_PER_HOUR) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}

/// Format seconds as a sentence timestamp with centisecond precision.
///
/// # Examples
///
/// ```
/// use scribe_common::human_time::format_timestamp;
///
/// assert_eq!(format_timestamp(30.5), "00:30.50");
/// assert_eq!(format_timestamp(61.257), "01:01.26");
/// assert_eq!(format_timestamp(3725.25), "1:02:05.25");
/// ```
pub fn format_timestamp(seconds: f64) -> String {
    let centis = (sanitize(seconds) * 100.0).round() as u64;
    let total = centis / 100;
    let cs = centis % 100;
    let hours = total / SECS_PER_HOUR;
    let mins = (total % SECS_PER_HOUR) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}.{:02}", hours, mins, secs, cs)
    } else {
        format!("{:02}:{:02}.{:02}", mins, secs, cs)
    }
}

/// Format a sentence span as `start - end` timestamps.
pub fn format_span(start: f64, end: f64) -> String {
    format!("{} - {}", format_timestamp(start), format_timestamp(end))
}
