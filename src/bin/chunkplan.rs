// Prints the chunks a video of the given length would be cut into, without
// running ffmpeg.
use clap::{arg, command};
use serde::Serialize;

use vidchunk::plan::{Chunk, ChunkPlan};
use vidchunk::{duration_seconds_format, ChunkCountPolicy, Error, TimePoint};

#[derive(Debug, Serialize)]
struct PlannedChunk {
    index: u64,
    start: String,
    end: String,
}

impl From<Chunk> for PlannedChunk {
    fn from(chunk: Chunk) -> Self {
        PlannedChunk {
            index: chunk.index,
            start: duration_seconds_format(chunk.start),
            end: duration_seconds_format(chunk.start.saturating_add(chunk.duration)),
        }
    }
}

fn main() -> Result<(), Error> {
    let matches = &command!()
        .arg(arg!(-d <duration> "Video duration, HH:MM:SS or seconds").required(true))
        .arg(arg!(-c <chunk> "Chunk duration, HH:MM:SS or seconds").required(true))
        .arg(arg!(--"trailing-chunk" "Always plan one extra chunk after the last full one"))
        .get_matches();

    let duration = matches
        .get_one::<String>("duration")
        .ok_or(Error::MissingSetting("duration"))?
        .parse::<TimePoint>()?
        .seconds()?;

    let chunk = matches
        .get_one::<String>("chunk")
        .ok_or(Error::MissingSetting("chunk duration"))?
        .parse::<TimePoint>()?
        .seconds()?;

    let policy = if matches.get_flag("trailing-chunk") {
        ChunkCountPolicy::Trailing
    } else {
        ChunkCountPolicy::Floor
    };

    let planned: Vec<PlannedChunk> = ChunkPlan::new(duration, chunk, policy)?
        .map(PlannedChunk::from)
        .collect();

    let writer = std::io::stdout();
    serde_yaml::to_writer(writer, &planned)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_is_start_plus_duration() {
        let planned = PlannedChunk::from(Chunk {
            index: 2,
            start: 180,
            duration: 180,
        });
        assert_eq!(planned.index, 2);
        assert_eq!(planned.start, "00:03:00");
        assert_eq!(planned.end, "00:06:00");
    }

    #[test]
    fn end_of_last_chunk_saturates() {
        let planned = PlannedChunk::from(Chunk {
            index: u64::MAX / 10 + 1,
            start: u64::MAX / 10 * 10,
            duration: 10,
        });
        assert_eq!(planned.end, duration_seconds_format(u64::MAX));
    }
}
