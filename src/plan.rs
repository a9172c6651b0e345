use crate::{ChunkCountPolicy, Error, Result};

/// One planned chunk: the `index`th (1-based) slice of `duration` seconds
/// starting `start` seconds into the video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub index: u64,
    pub start: u64,
    pub duration: u64,
}

/// Truncates a probed duration to whole seconds.
pub fn whole_seconds(duration: f64) -> u64 {
    if duration.is_finite() && duration > 0.0 {
        duration.trunc() as u64
    } else {
        0
    }
}

pub fn chunk_count(total_secs: u64, chunk_secs: u64, policy: ChunkCountPolicy) -> Result<u64> {
    let full = total_secs
        .checked_div(chunk_secs)
        .ok_or(Error::ZeroChunkDuration)?;
    match policy {
        ChunkCountPolicy::Floor => Ok(full),
        ChunkCountPolicy::Trailing => full.checked_add(1).ok_or(Error::PlanOverflow {
            total_secs,
            chunk_secs,
        }),
    }
}

/// The chunks of a video, produced lazily in order. Once drained the plan is
/// spent; build a new one to walk the chunks again.
///
/// Start offsets never exceed the total duration, so `start` cannot overflow.
#[derive(Debug)]
pub struct ChunkPlan {
    next: u64,
    count: u64,
    chunk_secs: u64,
}

impl ChunkPlan {
    pub fn new(total_secs: u64, chunk_secs: u64, policy: ChunkCountPolicy) -> Result<Self> {
        Ok(ChunkPlan {
            next: 0,
            count: chunk_count(total_secs, chunk_secs, policy)?,
            chunk_secs,
        })
    }

    /// Total number of chunks in the plan, including any already yielded.
    pub fn total(&self) -> u64 {
        self.count
    }
}

impl Iterator for ChunkPlan {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.next >= self.count {
            return None;
        }
        let chunk = Chunk {
            index: self.next + 1,
            start: self.next * self.chunk_secs,
            duration: self.chunk_secs,
        };
        self.next += 1;
        Some(chunk)
    }

    fn nth(&mut self, n: usize) -> Option<Chunk> {
        self.next = self.next.saturating_add(n as u64).min(self.count);
        self.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.count - self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for ChunkPlan {}

#[cfg(test)]
mod tests {
    use super::*;

    fn starts(total: u64, chunk: u64, policy: ChunkCountPolicy) -> Vec<u64> {
        ChunkPlan::new(total, chunk, policy)
            .unwrap()
            .map(|c| c.start)
            .collect()
    }

    #[test]
    fn floor_drops_partial_tail() {
        assert_eq!(starts(30, 15, ChunkCountPolicy::Floor), vec![0, 15]);
        assert_eq!(starts(44, 15, ChunkCountPolicy::Floor), vec![0, 15]);
        assert_eq!(starts(14, 15, ChunkCountPolicy::Floor), Vec::<u64>::new());
    }

    #[test]
    fn trailing_always_adds_one() {
        assert_eq!(starts(44, 15, ChunkCountPolicy::Trailing), vec![0, 15, 30]);
        // Exact multiples still get the extra chunk.
        assert_eq!(starts(30, 15, ChunkCountPolicy::Trailing), vec![0, 15, 30]);
        assert_eq!(starts(0, 15, ChunkCountPolicy::Trailing), vec![0]);
    }

    #[test]
    fn counts_match_formula() {
        for total in 0..200 {
            for chunk in 1..40 {
                let floor = ChunkPlan::new(total, chunk, ChunkCountPolicy::Floor).unwrap();
                assert_eq!(floor.total(), total / chunk);
                assert_eq!(floor.len() as u64, total / chunk);

                let trailing =
                    ChunkPlan::new(total, chunk, ChunkCountPolicy::Trailing).unwrap();
                assert_eq!(trailing.total(), total / chunk + 1);
            }
        }
    }

    #[test]
    fn offsets_step_by_chunk_and_stay_in_bounds() {
        for policy in [ChunkCountPolicy::Floor, ChunkCountPolicy::Trailing] {
            for total in [1, 59, 60, 61, 3599, 7207] {
                let chunks: Vec<Chunk> = ChunkPlan::new(total, 60, policy).unwrap().collect();
                for pair in chunks.windows(2) {
                    assert_eq!(pair[1].start, pair[0].start + 60);
                    assert_eq!(pair[1].index, pair[0].index + 1);
                }
                if let Some(last) = chunks.last() {
                    assert!(last.start + 60 <= total + 60);
                }
            }
        }
    }

    #[test]
    fn indices_are_one_based() {
        let first = ChunkPlan::new(100, 10, ChunkCountPolicy::Floor)
            .unwrap()
            .next()
            .unwrap();
        assert_eq!(first, Chunk { index: 1, start: 0, duration: 10 });
    }

    #[test]
    fn drained_plan_stays_empty() {
        let mut plan = ChunkPlan::new(20, 10, ChunkCountPolicy::Floor).unwrap();
        assert_eq!(plan.by_ref().map(|c| c.index).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(plan.next(), None);
        assert_eq!(plan.len(), 0);
    }

    #[test]
    fn zero_chunk_is_rejected() {
        assert!(ChunkPlan::new(20, 0, ChunkCountPolicy::Floor).is_err());
    }

    #[test]
    fn chunk_count_rejects_zero_chunk() {
        assert!(matches!(
            chunk_count(20, 0, ChunkCountPolicy::Trailing),
            Err(Error::ZeroChunkDuration)
        ));
    }

    #[test]
    fn trailing_chunk_past_u64_max_is_an_error() {
        assert!(matches!(
            ChunkPlan::new(u64::MAX, 1, ChunkCountPolicy::Trailing),
            Err(Error::PlanOverflow { total_secs: u64::MAX, chunk_secs: 1 })
        ));
        assert_eq!(
            chunk_count(u64::MAX, 1, ChunkCountPolicy::Floor).unwrap(),
            u64::MAX
        );
    }

    #[test]
    fn huge_durations_plan_without_overflow() {
        let mut plan = ChunkPlan::new(u64::MAX, 10, ChunkCountPolicy::Trailing).unwrap();
        assert_eq!(plan.total(), u64::MAX / 10 + 1);
        let last = plan.nth((u64::MAX / 10) as usize).unwrap();
        assert_eq!(last.start, u64::MAX / 10 * 10);
        assert_eq!(plan.next(), None);
    }

    #[test]
    fn probe_values_are_truncated() {
        assert_eq!(whole_seconds(30.999), 30);
        assert_eq!(whole_seconds(0.4), 0);
        assert_eq!(whole_seconds(f64::NAN), 0);
        assert_eq!(whole_seconds(-3.0), 0);
    }
}
