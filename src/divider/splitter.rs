use std::path::Path;

use crate::command::{FfCommand, Tool, ToolRunner};
use crate::divider::util::path_arg;
use crate::plan::Chunk;
use crate::Result;

/// Cuts one chunk out of `input` with stream copy.
pub fn split_chunk(
    runner: &mut impl ToolRunner,
    input: &Path,
    chunk: &Chunk,
    path_out: &Path,
    force: bool,
) -> Result<()> {
    let args = get_ffmpeg_args(
        chunk.start,
        &path_arg(input)?,
        chunk.duration,
        &path_arg(path_out)?,
        force,
    );
    runner.run(&FfCommand::new(Tool::Ffmpeg, args))
}

fn get_ffmpeg_args(
    start: u64,
    input: &str,
    duration: u64,
    path_out: &str,
    force: bool,
) -> Vec<String> {
    let mut args: Vec<String> = vec![];
    if force {
        args.push(String::from("-y"));
    }
    args.extend([
        String::from("-ss"),
        start.to_string(),
        String::from("-i"),
        String::from(input),
        String::from("-t"),
        duration.to_string(),
        String::from("-c"),
        String::from("copy"),
        String::from(path_out),
    ]);
    args
}
