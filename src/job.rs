use std::path::PathBuf;

use serde::Deserialize;

use crate::{Error, Result, TimePoint, TimeRange};

const DEFAULT_OUT_DIR: &str = "output";

/// How many chunks to cut out of a video of a given length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkCountPolicy {
    /// `floor(duration / chunk)`: a trailing partial chunk is dropped.
    #[default]
    Floor,
    /// `floor(duration / chunk) + 1`, always.
    Trailing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuteMode {
    /// One ffmpeg pass muting every range at once.
    #[default]
    Combined,
    /// One ffmpeg pass per range, each starting from the original input and
    /// writing the same muted file. Only the last range ends up muted.
    PerRange,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkNaming {
    /// `<input stem>_<n>.mp4`
    #[default]
    Basename,
    /// `chunk_<n>.mp4`
    Generic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupPolicy {
    /// Failing to delete the muted video aborts the run.
    #[default]
    Strict,
    /// Failing to delete the muted video is only logged.
    Lenient,
}

/// A mute range resolved to seconds, `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: u64,
    pub end: u64,
}

/// Job settings as written in a job file or gathered from the command line.
/// Every field is optional so that several sources can be layered.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobFile {
    pub input: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub chunk_duration: Option<TimePoint>,
    pub ff_dir: Option<PathBuf>,
    pub mute: Option<Vec<TimeRange>>,
    pub chunk_count: Option<ChunkCountPolicy>,
    pub mute_mode: Option<MuteMode>,
    pub naming: Option<ChunkNaming>,
    pub cleanup: Option<CleanupPolicy>,
    pub force: Option<bool>,
    pub debug_ffmpeg: Option<bool>,
}

impl JobFile {
    /// Layers `other` on top of `self`: settings present in `other` win.
    pub fn merge(self, other: JobFile) -> JobFile {
        JobFile {
            input: other.input.or(self.input),
            out_dir: other.out_dir.or(self.out_dir),
            chunk_duration: other.chunk_duration.or(self.chunk_duration),
            ff_dir: other.ff_dir.or(self.ff_dir),
            mute: other.mute.or(self.mute),
            chunk_count: other.chunk_count.or(self.chunk_count),
            mute_mode: other.mute_mode.or(self.mute_mode),
            naming: other.naming.or(self.naming),
            cleanup: other.cleanup.or(self.cleanup),
            force: other.force.or(self.force),
            debug_ffmpeg: other.debug_ffmpeg.or(self.debug_ffmpeg),
        }
    }

    /// Validates the settings and resolves every time value to seconds.
    pub fn into_job(self) -> Result<Job> {
        let input = self.input.ok_or(Error::MissingSetting("input video"))?;
        let chunk_secs = self
            .chunk_duration
            .ok_or(Error::MissingSetting("chunk duration"))?
            .seconds()?;
        if chunk_secs == 0 {
            return Err(Error::ZeroChunkDuration);
        }
        let mute = self
            .mute
            .unwrap_or_default()
            .iter()
            .map(TimeRange::resolve)
            .collect::<Result<Vec<_>>>()?;

        Ok(Job {
            input,
            out_dir: self.out_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR)),
            chunk_secs,
            ff_dir: self.ff_dir,
            mute,
            chunk_count: self.chunk_count.unwrap_or_default(),
            mute_mode: self.mute_mode.unwrap_or_default(),
            naming: self.naming.unwrap_or_default(),
            cleanup: self.cleanup.unwrap_or_default(),
            force: self.force.unwrap_or(false),
            debug_ffmpeg: self.debug_ffmpeg.unwrap_or(false),
        })
    }
}

/// A validated, immutable description of one video to divide.
#[derive(Debug, Clone)]
pub struct Job {
    pub input: PathBuf,
    pub out_dir: PathBuf,
    pub chunk_secs: u64,
    pub ff_dir: Option<PathBuf>,
    pub mute: Vec<Span>,
    pub chunk_count: ChunkCountPolicy,
    pub mute_mode: MuteMode,
    pub naming: ChunkNaming,
    pub cleanup: CleanupPolicy,
    pub force: bool,
    pub debug_ffmpeg: bool,
}
