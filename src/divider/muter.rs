use tracing::{info, warn};

use crate::command::{FfCommand, Tool, ToolRunner};
use crate::divider::util::{muted_path, path_arg, MutedArtifact};
use crate::{duration_seconds_format, Job, MuteMode, Result, Span};

/// Writes a copy of the input with audio silenced inside the job's mute
/// ranges. Returns `None` when there is nothing to mute.
pub fn mute_video(runner: &mut impl ToolRunner, job: &Job) -> Result<Option<MutedArtifact>> {
    if job.mute.is_empty() {
        return Ok(None);
    }

    let artifact = MutedArtifact::new(muted_path(job)?);
    let input = path_arg(&job.input)?;
    let path_out = path_arg(artifact.path())?;

    info!("Muting video in {} time ranges", job.mute.len());
    match job.mute_mode {
        MuteMode::Combined => {
            let args = get_ffmpeg_args(&input, &volume_filter(&job.mute), &path_out);
            runner.run(&FfCommand::new(Tool::Ffmpeg, args))?;
            for span in &job.mute {
                log_muted(span);
            }
        }
        MuteMode::PerRange => {
            if job.mute.len() > 1 {
                warn!(
                    "per_range muting rewrites {} from the original input for every range; \
                     only the last range will be muted",
                    path_out
                );
            }
            for span in &job.mute {
                let filter = volume_filter(std::slice::from_ref(span));
                let args = get_ffmpeg_args(&input, &filter, &path_out);
                runner.run(&FfCommand::new(Tool::Ffmpeg, args))?;
                log_muted(span);
            }
        }
    }

    Ok(Some(artifact))
}

fn log_muted(span: &Span) {
    info!(
        "Muted video from {} to {}",
        duration_seconds_format(span.start),
        duration_seconds_format(span.end)
    );
}

/// Volume filter silencing audio inside any of the spans.
///
/// ```
/// use vidchunk::{divider::volume_filter, Span};
///
/// assert_eq!(
///     volume_filter(&[Span { start: 10, end: 20 }]),
///     "volume=enable='between(t,10,20)':volume=0"
/// );
/// ```
pub fn volume_filter(spans: &[Span]) -> String {
    let enable = spans
        .iter()
        .map(|span| format!("between(t,{},{})", span.start, span.end))
        .collect::<Vec<String>>()
        .join("+");
    format!("volume=enable='{}':volume=0", enable)
}

// The muted copy belongs to the job, so it is always overwritten.
fn get_ffmpeg_args(input: &str, filter: &str, path_out: &str) -> Vec<String> {
    vec![
        String::from("-y"),
        String::from("-i"),
        String::from(input),
        String::from("-af"),
        String::from(filter),
        String::from("-c:v"),
        String::from("copy"),
        String::from("-c:a"),
        String::from("aac"),
        String::from("-strict"),
        String::from("-2"),
        String::from(path_out),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_are_joined_with_plus() {
        let spans = [Span { start: 113, end: 202 }, Span { start: 1311, end: 1400 }];
        assert_eq!(
            volume_filter(&spans),
            "volume=enable='between(t,113,202)+between(t,1311,1400)':volume=0"
        );
    }

    #[test]
    fn mute_reencodes_audio_only() {
        let args = get_ffmpeg_args("in.mp4", "F", "out/muted_in.mp4");
        assert_eq!(
            args,
            [
                "-y",
                "-i",
                "in.mp4",
                "-af",
                "F",
                "-c:v",
                "copy",
                "-c:a",
                "aac",
                "-strict",
                "-2",
                "out/muted_in.mp4"
            ]
        );
    }
}
