use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::str::FromStr;

use serde::Deserialize;

pub mod command;
pub mod divider;
mod error;
mod job;
pub mod plan;

pub use error::{Error, Result};
pub use job::{ChunkCountPolicy, ChunkNaming, CleanupPolicy, Job, JobFile, MuteMode, Span};

const DELIMITER_DURATION: char = ':';
const DELIMITER_RANGE: char = '-';

const SECONDS_HOUR: u64 = 60 * 60;
const SECONDS_MIN: u64 = 60;

/// A point in time within the video, written either as a `HH:MM:SS` duration
/// string or as a whole number of seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TimePoint {
    Seconds(u64),
    Clock(String),
}

impl TimePoint {
    /// Resolves the point to whole seconds.
    ///
    /// # Example
    ///
    /// ```
    /// use vidchunk::TimePoint;
    ///
    /// assert_eq!(TimePoint::Seconds(90).seconds().unwrap(), 90);
    /// assert_eq!(TimePoint::Clock("00:01:30".into()).seconds().unwrap(), 90);
    /// ```
    pub fn seconds(&self) -> Result<u64> {
        match self {
            TimePoint::Seconds(seconds) => Ok(*seconds),
            TimePoint::Clock(clock) => duration_seconds_parse(clock),
        }
    }
}

impl FromStr for TimePoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            let seconds = s
                .parse()
                .map_err(|_| Error::InvalidDuration(s.to_string()))?;
            return Ok(TimePoint::Seconds(seconds));
        }
        duration_seconds_parse(s)?;
        Ok(TimePoint::Clock(s.to_string()))
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimePoint::Seconds(seconds) => write!(f, "{}", seconds),
            TimePoint::Clock(clock) => f.write_str(clock),
        }
    }
}

/// An interval of the video whose audio gets muted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeRange {
    pub start: TimePoint,
    pub end: TimePoint,
}

impl TimeRange {
    /// Resolves both ends to seconds, rejecting ranges that do not move forward.
    ///
    /// # Example
    ///
    /// ```
    /// let range: vidchunk::TimeRange = "00:01:53-00:03:22".parse().unwrap();
    /// let span = range.resolve().unwrap();
    /// assert_eq!((span.start, span.end), (113, 202));
    ///
    /// let backwards: vidchunk::TimeRange = "20-10".parse().unwrap();
    /// assert!(backwards.resolve().is_err());
    /// ```
    pub fn resolve(&self) -> Result<Span> {
        let start = self.start.seconds()?;
        let end = self.end.seconds()?;
        if end <= start {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(Span { start, end })
    }
}

impl FromStr for TimeRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (start, end) = s
            .split_once(DELIMITER_RANGE)
            .ok_or_else(|| Error::InvalidDuration(s.to_string()))?;
        Ok(TimeRange {
            start: start.parse()?,
            end: end.parse()?,
        })
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.start, DELIMITER_RANGE, self.end)
    }
}

/// Converts a duration string to number of seconds.
///
/// # Example
///
/// Basic usage
///
/// ```
/// let seconds = vidchunk::duration_seconds_parse("01:04:20");
///
/// assert!(!seconds.is_err());
/// assert_eq!(seconds.unwrap(), 3860);
///
/// assert!(vidchunk::duration_seconds_parse("4:20").is_err());
/// assert!(vidchunk::duration_seconds_parse("00:xx:20").is_err());
/// ```
pub fn duration_seconds_parse(duration: &str) -> Result<u64> {
    let invalid = || Error::InvalidDuration(duration.to_string());

    let parts: Vec<&str> = duration.split(DELIMITER_DURATION).collect();
    if parts.len() != 3 {
        return Err(invalid());
    }

    let mut result = 0;
    for (part, unit) in parts.iter().zip([SECONDS_HOUR, SECONDS_MIN, 1]) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let value: u64 = part.parse().map_err(|_| invalid())?;
        result = value
            .checked_mul(unit)
            .and_then(|seconds| seconds.checked_add(result))
            .ok_or_else(invalid)?;
    }
    Ok(result)
}

/// Converts a number of seconds to a duration string.
///
/// # Example
///
/// Basic usage
///
/// ```
/// let duration = vidchunk::duration_seconds_format(260);
///
/// assert_eq!(duration, "00:04:20");
/// ```
pub fn duration_seconds_format(seconds_total: u64) -> String {
    let mut sec = seconds_total;
    let hour = sec / SECONDS_HOUR;
    sec -= hour * SECONDS_HOUR;

    let min = sec / SECONDS_MIN;
    sec -= min * SECONDS_MIN;

    format!("{:02}:{:02}:{:02}", hour, min, sec)
}

/// Where the output of an external tool should go.
pub fn get_stdout(debug: bool) -> Stdio {
    if debug {
        Stdio::inherit()
    } else {
        Stdio::null()
    }
}

pub fn read_job_file(path: &Path) -> Result<JobFile> {
    let f = std::fs::File::open(path)?;
    let job: JobFile = serde_yaml::from_reader(f)?;
    Ok(job)
}
