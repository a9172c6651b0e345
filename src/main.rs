use std::path::{Path, PathBuf};

use clap::{arg, command, ArgAction, ArgMatches, Command};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vidchunk::command::SystemRunner;
use vidchunk::divider::divide_video;
use vidchunk::{
    read_job_file, ChunkCountPolicy, ChunkNaming, CleanupPolicy, JobFile, MuteMode, Result,
    TimePoint, TimeRange,
};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn flag<T>(matches: &ArgMatches, id: &str, value: T) -> Option<T> {
    matches.get_flag(id).then_some(value)
}

/// Settings given on the command line. Only what was actually passed is set.
fn job_from_args(matches: &ArgMatches) -> Result<JobFile> {
    let chunk_duration = matches
        .get_one::<String>("chunk")
        .map(|chunk| chunk.parse::<TimePoint>())
        .transpose()?;
    let mute = match matches.get_many::<String>("mute") {
        Some(ranges) => Some(
            ranges
                .map(|range| range.parse::<TimeRange>())
                .collect::<Result<Vec<_>>>()?,
        ),
        None => None,
    };

    Ok(JobFile {
        input: matches.get_one::<String>("input").map(PathBuf::from),
        out_dir: matches.get_one::<String>("out_dir").map(PathBuf::from),
        chunk_duration,
        ff_dir: matches.get_one::<String>("ff-dir").map(PathBuf::from),
        mute,
        chunk_count: flag(matches, "trailing-chunk", ChunkCountPolicy::Trailing),
        mute_mode: flag(matches, "per-range-mute", MuteMode::PerRange),
        naming: flag(matches, "generic-names", ChunkNaming::Generic),
        cleanup: flag(matches, "lenient-cleanup", CleanupPolicy::Lenient),
        force: flag(matches, "force", true),
        debug_ffmpeg: flag(matches, "debug-ffmpeg", true),
    })
}

fn run(matches: &ArgMatches) -> Result<()> {
    let from_file = match matches.get_one::<String>("job_file") {
        Some(path) => read_job_file(Path::new(path))?,
        None => JobFile::default(),
    };
    let job = from_file.merge(job_from_args(matches)?).into_job()?;

    let mut runner = SystemRunner::new(job.ff_dir.clone(), job.debug_ffmpeg);
    let report = divide_video(&job, &mut runner)?;
    info!(
        "Wrote {} chunks to {} ({} already present)",
        report.written.len(),
        job.out_dir.display(),
        report.skipped.len()
    );
    Ok(())
}

fn cli() -> Command {
    command!()
        .arg(arg!(-f <job_file> "YAML job description").required(false))
        .arg(arg!(-i <input> "Video to divide").required(false))
        .arg(arg!(-o <out_dir> "Directory for the chunks [default: output]").required(false))
        .arg(arg!(-c <chunk> "Chunk duration, HH:MM:SS or seconds").required(false))
        .arg(arg!(--"ff-dir" <dir> "Directory holding ffmpeg and ffprobe").required(false))
        .arg(
            arg!(-m --mute <range> "Mute audio between START-END (repeatable)")
                .required(false)
                .action(ArgAction::Append),
        )
        .arg(arg!(--"trailing-chunk" "Always cut one extra chunk after the last full one"))
        .arg(arg!(--"generic-names" "Name chunks chunk_<n>.mp4"))
        .arg(arg!(--"per-range-mute" "Run one ffmpeg pass per mute range"))
        .arg(arg!(--"lenient-cleanup" "Only warn when the muted video cannot be deleted"))
        .arg(arg!(--force "Overwrite chunks that already exist"))
        .arg(arg!(--"debug-ffmpeg" "Show ffmpeg output"))
        .arg(arg!(-v --verbose "Log every tool invocation"))
}

fn main() {
    let matches = &cli().get_matches();

    init_tracing(matches.get_flag("verbose"));

    if let Err(err) = run(matches) {
        error!("{}", err);
        std::process::exit(1);
    }
}
