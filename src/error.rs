use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid duration format: {0:?} (expected HH:MM:SS)")]
    InvalidDuration(String),

    #[error("invalid time range: end ({end}s) must be after start ({start}s)")]
    InvalidRange { start: u64, end: u64 },

    #[error("chunk duration must be greater than zero")]
    ZeroChunkDuration,

    #[error("{total_secs}s in chunks of {chunk_secs}s is too many chunks to plan")]
    PlanOverflow { total_secs: u64, chunk_secs: u64 },

    #[error("chunk {} would overwrite the video being divided", .0.display())]
    ChunkOverwritesInput(PathBuf),

    #[error("{0} is not provided")]
    MissingSetting(&'static str),

    #[error("could not run {tool}: {source}")]
    ToolSpawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} failed with {status}")]
    ToolFailed { tool: String, status: ExitStatus },

    #[error("could not read duration from ffprobe output: {0:?}")]
    ProbeOutput(String),

    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("could not delete muted video {}: {source}", path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
