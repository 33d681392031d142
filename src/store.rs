use crate::{CheckId, HistoryError, Sample, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Read access to the recorded samples of every check.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// All samples of `check_id`, oldest first. Samples sharing a timestamp come back
    /// in the order they were recorded.
    async fn scan_samples(&self, check_id: CheckId) -> Result<Vec<Sample>, StoreError>;

    /// Number of samples of `check_id` with the given outcome recorded at or after `since`.
    async fn count_samples(
        &self,
        check_id: CheckId,
        success: bool,
        since: DateTime<Utc>,
    ) -> Result<u64, StoreError>;

    /// The sample a full scan would yield last.
    async fn latest_sample(&self, check_id: CheckId) -> Result<Option<Sample>, StoreError> {
        Ok(self.scan_samples(check_id).await?.pop())
    }
}

pub const DEFAULT_LIMIT: usize = 20;

/// A window over the newest-first episode list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Page {
    pub fn new(offset: i64, limit: i64) -> Result<Self, HistoryError> {
        if offset < 0 {
            return Err(HistoryError::InvalidArgument(format!(
                "offset must not be negative, got {offset}"
            )));
        }
        if limit <= 0 {
            return Err(HistoryError::InvalidArgument(format!(
                "limit must be positive, got {limit}"
            )));
        }
        let offset = usize::try_from(offset)
            .map_err(|_| HistoryError::InvalidArgument(format!("offset {offset} out of range")))?;
        let limit = usize::try_from(limit)
            .map_err(|_| HistoryError::InvalidArgument(format!("limit {limit} out of range")))?;
        Ok(Self { offset, limit })
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}
