use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod counter;
pub mod episodes;
pub mod error;
pub mod history;
pub mod humanize;
pub mod state_actor;
pub mod status;
pub mod store;

pub use error::{HistoryError, StoreError};
pub use history::History;
pub use store::ResultStore;

/// Identifier of a check whose results are being recorded.
pub type CheckId = u64;

/// One probe result for a check.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub check_id: CheckId,
    pub created_at: DateTime<Utc>,
    pub success: bool,
}

impl Sample {
    pub fn new(check_id: CheckId, created_at: DateTime<Utc>, success: bool) -> Self {
        Self {
            check_id,
            created_at,
            success,
        }
    }
}

/// A maximal run of consecutive samples sharing the same outcome.
///
/// `duration_seconds` counts both ends, so a run made of a single sample lasts one
/// second rather than zero.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_seconds: i64,
    pub success: bool,
}

impl Episode {
    pub(crate) fn closed(start: DateTime<Utc>, end: DateTime<Utc>, success: bool) -> Self {
        Self {
            start,
            end,
            duration_seconds: end.timestamp() - start.timestamp() + 1,
            success,
        }
    }
}

/// An `Episode` with its duration rendered for display.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LocalizedEpisode {
    #[serde(flatten)]
    pub episode: Episode,
    pub duration_locale: String,
}
