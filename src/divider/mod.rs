mod muter;
pub use muter::{mute_video, volume_filter};

mod splitter;
use splitter::split_chunk;

mod util;
pub use util::{chunk_path, muted_path, parse_probe_output, probe_duration, MutedArtifact};
use util::{create_out_dir, same_file};

use std::path::PathBuf;

use tracing::{info, warn};

use crate::command::ToolRunner;
use crate::plan::ChunkPlan;
use crate::{duration_seconds_format, CleanupPolicy, Error, Job, Result};

/// What a finished run produced.
#[derive(Debug, Default)]
pub struct Report {
    pub duration_secs: u64,
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Probes the input, mutes it if asked to, cuts it into chunks and deletes the
/// muted copy again. The first failing step aborts the run.
pub fn divide_video(job: &Job, runner: &mut impl ToolRunner) -> Result<Report> {
    let duration_secs = probe_duration(runner, &job.input)?;
    info!("Video duration: {}", duration_seconds_format(duration_secs));

    create_out_dir(&job.out_dir)?;

    let muted = mute_video(runner, job)?;
    let input = match &muted {
        Some(artifact) => artifact.path(),
        None => job.input.as_path(),
    };

    let plan = ChunkPlan::new(duration_secs, job.chunk_secs, job.chunk_count)?;
    let total = plan.total();
    info!(
        "Chunk duration: {}, number of chunks: {}",
        duration_seconds_format(job.chunk_secs),
        total
    );

    let mut report = Report {
        duration_secs,
        ..Default::default()
    };
    for chunk in plan {
        let path_out = chunk_path(job, chunk.index)?;
        if same_file(&path_out, &job.input) || same_file(&path_out, input) {
            return Err(Error::ChunkOverwritesInput(path_out));
        }
        if path_out.exists() && !job.force {
            info!("Skipping: {}", path_out.display());
            report.skipped.push(path_out);
            continue;
        }
        split_chunk(runner, input, &chunk, &path_out, job.force)?;
        info!("Chunk {}/{} done", chunk.index, total);
        report.written.push(path_out);
    }

    if let Some(artifact) = muted {
        clean_up(artifact, job.cleanup)?;
    }
    Ok(report)
}

fn clean_up(artifact: MutedArtifact, policy: CleanupPolicy) -> Result<()> {
    let path = artifact.path().to_path_buf();
    match artifact.remove() {
        Ok(_) => {
            info!("Deleted muted video {}", path.display());
            Ok(())
        }
        Err(source) => match policy {
            CleanupPolicy::Strict => Err(Error::Cleanup { path, source }),
            CleanupPolicy::Lenient => {
                warn!("Could not delete muted video {}: {}", path.display(), source);
                Ok(())
            }
        },
    }
}
