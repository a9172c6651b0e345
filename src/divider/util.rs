use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::command::{FfCommand, Tool, ToolRunner};
use crate::plan::whole_seconds;
use crate::{ChunkNaming, Error, Job, Result};

const CHUNK_EXTENSION: &str = "mp4";
const MUTED_PREFIX: &str = "muted_";

pub fn path_arg(path: &Path) -> Result<String> {
    path.to_str()
        .map(String::from)
        .ok_or_else(|| Error::NonUtf8Path(path.to_path_buf()))
}

fn file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::NonUtf8Path(path.to_path_buf()))
}

/// `<out_dir>/<stem>_<n>.mp4` or `<out_dir>/chunk_<n>.mp4`.
pub fn chunk_path(job: &Job, index: u64) -> Result<PathBuf> {
    let name = match job.naming {
        ChunkNaming::Basename => {
            let stem = job
                .input
                .file_stem()
                .and_then(|stem| stem.to_str())
                .ok_or_else(|| Error::NonUtf8Path(job.input.clone()))?;
            format!("{}_{}.{}", stem, index, CHUNK_EXTENSION)
        }
        ChunkNaming::Generic => format!("chunk_{}.{}", index, CHUNK_EXTENSION),
    };
    Ok(job.out_dir.join(name))
}

/// `<out_dir>/muted_<input file name>`.
pub fn muted_path(job: &Job) -> Result<PathBuf> {
    let name = file_name(&job.input)?;
    Ok(job.out_dir.join(format!("{}{}", MUTED_PREFIX, name)))
}

/// Whether both paths name the same file, either literally or once resolved.
pub fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

pub fn create_out_dir(out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)?;
    Ok(())
}

fn get_ffprobe_args(input: &str) -> Vec<String> {
    vec![
        String::from("-v"),
        String::from("error"),
        String::from("-show_entries"),
        String::from("format=duration"),
        String::from("-of"),
        String::from("default=noprint_wrappers=1:nokey=1"),
        String::from(input),
    ]
}

pub fn parse_probe_output(output: &str) -> Result<f64> {
    let trimmed = output.trim();
    match trimmed.parse::<f64>() {
        // u64::MAX as f64 rounds up to 2^64, which no longer fits.
        Ok(duration) if duration >= 0.0 && duration < u64::MAX as f64 => Ok(duration),
        _ => Err(Error::ProbeOutput(trimmed.to_string())),
    }
}

/// Asks ffprobe for the container duration, truncated to whole seconds.
pub fn probe_duration(runner: &mut impl ToolRunner, input: &Path) -> Result<u64> {
    let command = FfCommand::new(Tool::Ffprobe, get_ffprobe_args(&path_arg(input)?));
    let output = runner.capture(&command)?;
    Ok(whole_seconds(parse_probe_output(&output)?))
}

/// The intermediate muted copy of the input. Removed when dropped unless
/// [`MutedArtifact::remove`] already took care of it.
#[derive(Debug)]
pub struct MutedArtifact {
    path: PathBuf,
    removed: bool,
}

impl MutedArtifact {
    pub fn new(path: PathBuf) -> Self {
        MutedArtifact {
            path,
            removed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the file. A file that is already gone is not an error.
    pub fn remove(mut self) -> std::io::Result<PathBuf> {
        self.removed = true;
        let path = std::mem::take(&mut self.path);
        match fs::remove_file(&path) {
            Ok(()) => Ok(path),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(path),
            Err(err) => Err(err),
        }
    }
}

impl Drop for MutedArtifact {
    fn drop(&mut self) {
        if !self.removed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JobFile;
    use crate::TimePoint;

    fn job(input: &str, naming: ChunkNaming) -> Job {
        JobFile {
            input: Some(PathBuf::from(input)),
            out_dir: Some(PathBuf::from("out")),
            chunk_duration: Some(TimePoint::Seconds(10)),
            naming: Some(naming),
            ..Default::default()
        }
        .into_job()
        .unwrap()
    }

    #[test]
    fn chunk_names_follow_naming() {
        let named = job("videos/DarkGathering_8.mp4", ChunkNaming::Basename);
        assert_eq!(
            chunk_path(&named, 1).unwrap(),
            Path::new("out").join("DarkGathering_8_1.mp4")
        );
        let generic = job("videos/DarkGathering_8.mkv", ChunkNaming::Generic);
        assert_eq!(
            chunk_path(&generic, 12).unwrap(),
            Path::new("out").join("chunk_12.mp4")
        );
    }

    #[test]
    fn muted_copy_keeps_input_file_name() {
        let job = job("videos/clip.mkv", ChunkNaming::Basename);
        assert_eq!(
            muted_path(&job).unwrap(),
            Path::new("out").join("muted_clip.mkv")
        );
    }

    #[test]
    fn probe_output_is_trimmed_and_parsed() {
        assert_eq!(parse_probe_output("30.023000\n").unwrap(), 30.023);
        assert_eq!(parse_probe_output("  1800\r\n").unwrap(), 1800.0);
    }

    #[test]
    fn largest_probe_values_still_fit_whole_seconds() {
        let duration = parse_probe_output("1e19").unwrap();
        assert_eq!(whole_seconds(duration), 10_000_000_000_000_000_000);
    }

    #[test]
    fn bad_probe_output_is_rejected() {
        let rejected = [
            "",
            "N/A",
            "-1.5",
            "inf",
            "NaN",
            "1e300",
            "18446744073709551616",
            "Duration: 00:00:30",
        ];
        for output in rejected {
            assert!(
                matches!(parse_probe_output(output), Err(Error::ProbeOutput(_))),
                "{output:?}"
            );
        }
    }

    #[test]
    fn ffprobe_args_query_format_duration() {
        assert_eq!(
            get_ffprobe_args("in.mp4"),
            [
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
                "in.mp4"
            ]
        );
    }

    #[test]
    fn same_file_sees_through_relative_segments() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("a.mp4");
        fs::write(&video, b"x").unwrap();
        let roundabout = dir.path().join(".").join("a.mp4");

        assert!(same_file(&video, &video));
        assert!(same_file(&roundabout, &video));
        assert!(!same_file(&video, &dir.path().join("b.mp4")));
    }

    #[test]
    fn dropped_artifact_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("muted_a.mp4");
        fs::write(&path, b"x").unwrap();
        drop(MutedArtifact::new(path.clone()));
        assert!(!path.exists());
    }

    #[test]
    fn removing_missing_artifact_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = MutedArtifact::new(dir.path().join("never_written.mp4"));
        assert!(artifact.remove().is_ok());
    }
}
