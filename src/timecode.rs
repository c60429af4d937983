/*!
 * Timestamp formatting for the lyric, subtitle and caption formats.
 *
 * All formatters truncate (never round) to their smallest unit. The unit count is
 * computed with a tiny tolerance so that values such as 3661.234, which binary floats
 * store as 3661.23399999..., still land on the intended millisecond.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TimecodeError;
use crate::transcript::sanitize_seconds;

/// Slack applied before truncating to whole units
const UNIT_TOLERANCE: f64 = 1e-6;

static LYRIC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(\d+):(\d{2})\.(\d{2})\]$").unwrap()
});

static SUBTITLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,}):(\d{2}):(\d{2}),(\d{3})$").unwrap()
});

static CAPTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,}):(\d{2}):(\d{2})\.(\d{3})$").unwrap()
});

/// Whole units (centiseconds, milliseconds, ...) contained in `seconds`
fn whole_units(seconds: f64, units_per_second: f64) -> u64 {
    (sanitize_seconds(seconds) * units_per_second + UNIT_TOLERANCE).floor() as u64
}

/// Truncates to three decimals without rounding (1.0006 -> 1.0)
pub fn truncate_to_millis(seconds: f64) -> f64 {
    whole_units(seconds, 1000.0) as f64 / 1000.0
}

/// Formats seconds as `[MM:SS.cc]`; minutes are not wrapped into hours
pub fn seconds_to_lyric_time(seconds: Option<f64>) -> String {
    let centis = seconds.map_or(0, |s| whole_units(s, 100.0));
    let minutes = centis / 6_000;
    let secs = (centis % 6_000) / 100;
    let cs = centis % 100;

    format!("[{:02}:{:02}.{:02}]", minutes, secs, cs)
}

/// Splits into (hours, minutes, seconds, millis)
fn clock_parts(seconds: Option<f64>) -> (u64, u64, u64, u64) {
    let ms = seconds.map_or(0, |s| whole_units(s, 1000.0));
    (ms / 3_600_000, (ms % 3_600_000) / 60_000, (ms % 60_000) / 1_000, ms % 1_000)
}

/// Formats seconds as `HH:MM:SS,mmm`
pub fn seconds_to_subtitle_time(seconds: Option<f64>) -> String {
    let (hours, minutes, secs, millis) = clock_parts(seconds);
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Formats seconds as `HH:MM:SS.mmm`
pub fn seconds_to_caption_time(seconds: Option<f64>) -> String {
    let (hours, minutes, secs, millis) = clock_parts(seconds);
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
}

fn capture_u64(caps: &regex::Captures, idx: usize) -> u64 {
    caps.get(idx)
        .map_or(0, |m| m.as_str().parse().unwrap_or(0))
}

fn parse_clock(regex: &Regex, style: &'static str, value: &str) -> Result<f64, TimecodeError> {
    let caps = regex.captures(value.trim()).ok_or_else(|| TimecodeError::Malformed {
        style,
        value: value.to_string(),
    })?;

    let minutes = capture_u64(&caps, 2);
    let seconds = capture_u64(&caps, 3);
    if minutes >= 60 || seconds >= 60 {
        return Err(TimecodeError::Malformed { style, value: value.to_string() });
    }

    let total_ms = (capture_u64(&caps, 1) * 3600 + minutes * 60 + seconds) * 1000 + capture_u64(&caps, 4);
    Ok(total_ms as f64 / 1000.0)
}

/// Parses `[MM:SS.cc]` back to seconds
pub fn parse_lyric_time(value: &str) -> Result<f64, TimecodeError> {
    let malformed = || TimecodeError::Malformed { style: "lyric", value: value.to_string() };
    let caps = LYRIC_REGEX.captures(value.trim()).ok_or_else(malformed)?;

    let seconds = capture_u64(&caps, 2);
    if seconds >= 60 {
        return Err(malformed());
    }

    let total_cs = (capture_u64(&caps, 1) * 60 + seconds) * 100 + capture_u64(&caps, 3);
    Ok(total_cs as f64 / 100.0)
}

/// Parses `HH:MM:SS,mmm` back to seconds
pub fn parse_subtitle_time(value: &str) -> Result<f64, TimecodeError> {
    parse_clock(&SUBTITLE_REGEX, "subtitle", value)
}

/// Parses `HH:MM:SS.mmm` back to seconds
pub fn parse_caption_time(value: &str) -> Result<f64, TimecodeError> {
    parse_clock(&CAPTION_REGEX, "caption", value)
}
