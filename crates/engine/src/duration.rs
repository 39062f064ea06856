//! Elapsed-time extraction from the engine's progress log
//!
//! ffmpeg reports encode progress on its error stream as
//! `time=HH:MM:SS.frac` stamps. The last stamp of a completed transcode is
//! the output duration. The format is engine-version dependent; if no stamp
//! matches, the caller gets a hard error rather than a guessed duration.

use crate::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;

fn time_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"time=(\d+):(\d{2}):(\d{2}(?:\.\d+)?)").expect("hard-coded pattern compiles")
    })
}

/// Last `time=` stamp in a progress log, in seconds.
#[must_use]
pub fn parse_progress_duration(log: &str) -> Option<f64> {
    let caps = time_pattern().captures_iter(log).last()?;
    let hours: f64 = caps[1].parse().ok()?;
    let minutes: f64 = caps[2].parse().ok()?;
    let seconds: f64 = caps[3].parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// Duration of a completed scene transcode from its progress log.
pub fn scene_duration(log: &str) -> Result<f64> {
    parse_progress_duration(log).ok_or(Error::Progress)
}
