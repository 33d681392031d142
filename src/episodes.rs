//! Run-length compaction of a check's sample log into episodes.

use crate::{store::Page, Episode, Sample};
use chrono::{DateTime, Utc};

/// The episode still being extended by the fold.
struct Run {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    success: bool,
}

impl Run {
    fn open(sample: &Sample) -> Self {
        Self {
            start: sample.created_at,
            end: sample.created_at,
            success: sample.success,
        }
    }

    fn close(self) -> Episode {
        Episode::closed(self.start, self.end, self.success)
    }
}

/// Groups samples, which must already be in ascending time order, into episodes
/// oldest first.
pub fn compact<'a, I>(samples: I) -> Vec<Episode>
where
    I: IntoIterator<Item = &'a Sample>,
{
    let mut episodes = Vec::new();
    let mut current: Option<Run> = None;

    for sample in samples {
        if let Some(run) = current.as_mut() {
            if run.success == sample.success {
                run.end = sample.created_at;
                continue;
            }
        }
        if let Some(run) = current.replace(Run::open(sample)) {
            episodes.push(run.close());
        }
    }
    if let Some(run) = current {
        episodes.push(run.close());
    }

    episodes
}

/// Compacts `samples` and returns the requested page of episodes, newest first.
///
/// The page indexes episodes, not samples, so the whole history is compacted on every
/// call and page boundaries move whenever the latest episode grows.
pub fn newest_first(samples: &[Sample], page: Page) -> Vec<Episode> {
    let mut episodes = compact(samples);
    episodes.reverse();
    episodes
        .into_iter()
        .skip(page.offset)
        .take(page.limit)
        .collect()
}
