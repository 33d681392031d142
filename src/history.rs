use crate::{
    counter::{self, DEFAULT_WINDOW_HOURS},
    episodes,
    humanize::{humanize, TimeUnit},
    status,
    store::Page,
    CheckId, Episode, HistoryError, LocalizedEpisode, ResultStore,
};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Read-only view of the recorded history of checks.
///
/// Nothing is cached: every call reads the store again and computes its answer from
/// that single read.
#[derive(Clone)]
pub struct History<S> {
    store: S,
}

impl<S: ResultStore> History<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Episodes of `check_id`, newest first, skipping `offset` episodes and returning
    /// at most `limit`.
    pub async fn list_episodes(
        &self,
        check_id: CheckId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Episode>, HistoryError> {
        let page = Page::new(offset, limit)?;
        self.page_episodes(check_id, page).await
    }

    pub async fn page_episodes(
        &self,
        check_id: CheckId,
        page: Page,
    ) -> Result<Vec<Episode>, HistoryError> {
        let samples = self.store.scan_samples(check_id).await?;
        let episodes = episodes::newest_first(&samples, page);
        debug!(
            check_id,
            offset = page.offset,
            limit = page.limit,
            samples = samples.len(),
            episodes = episodes.len(),
            "compacted episodes"
        );
        Ok(episodes)
    }

    /// A page of episodes with their durations rendered through `label`.
    pub async fn episode_log<F>(
        &self,
        check_id: CheckId,
        page: Page,
        label: F,
    ) -> Result<Vec<LocalizedEpisode>, HistoryError>
    where
        F: Fn(TimeUnit, u64) -> String,
    {
        let episodes = self.page_episodes(check_id, page).await?;
        Ok(episodes
            .into_iter()
            .map(|episode| LocalizedEpisode {
                duration_locale: humanize(episode.duration_seconds, &label),
                episode,
            })
            .collect())
    }

    pub async fn count_by_outcome(
        &self,
        check_id: CheckId,
        success: bool,
        window_hours: f64,
    ) -> Result<u64, HistoryError> {
        self.count_by_outcome_at(check_id, success, window_hours, Utc::now())
            .await
    }

    /// Like `count_by_outcome`, with the window ending at `now` instead of the current time.
    pub async fn count_by_outcome_at(
        &self,
        check_id: CheckId,
        success: bool,
        window_hours: f64,
        now: DateTime<Utc>,
    ) -> Result<u64, HistoryError> {
        counter::count_by_outcome(&self.store, check_id, success, window_hours, now).await
    }

    /// Successful samples in the last `window_hours` (one hour by default).
    pub async fn success_count(
        &self,
        check_id: CheckId,
        window_hours: Option<f64>,
    ) -> Result<u64, HistoryError> {
        self.count_by_outcome(check_id, true, window_hours.unwrap_or(DEFAULT_WINDOW_HOURS))
            .await
    }

    /// Failed samples in the last `window_hours` (one hour by default).
    pub async fn error_count(
        &self,
        check_id: CheckId,
        window_hours: Option<f64>,
    ) -> Result<u64, HistoryError> {
        self.count_by_outcome(check_id, false, window_hours.unwrap_or(DEFAULT_WINDOW_HOURS))
            .await
    }

    pub async fn current_status(&self, check_id: CheckId) -> Result<Option<bool>, HistoryError> {
        status::current_status(&self.store, check_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{humanize::english, state_actor::StateActorHandle, Sample, StoreError};
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    /// A store whose backend is gone.
    struct Offline;

    #[async_trait]
    impl ResultStore for Offline {
        async fn scan_samples(&self, _: CheckId) -> Result<Vec<Sample>, StoreError> {
            Err(StoreError::Closed)
        }

        async fn count_samples(
            &self,
            _: CheckId,
            _: bool,
            _: DateTime<Utc>,
        ) -> Result<u64, StoreError> {
            Err(StoreError::Closed)
        }
    }

    #[tokio::test]
    async fn empty_history() {
        let history = History::new(StateActorHandle::new(Vec::new(), 8));
        assert_eq!(history.current_status(7).await.unwrap(), None);
        assert!(history.list_episodes(7, 0, 20).await.unwrap().is_empty());
        assert_eq!(history.success_count(7, None).await.unwrap(), 0);
        assert_eq!(history.error_count(7, None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn scenario_from_recorded_samples() {
        let samples = [(0, false), (1, false), (2, true), (3, true), (4, true)]
            .into_iter()
            .map(|(t, success)| Sample::new(1, at(t), success))
            .collect();
        let history = History::new(StateActorHandle::new(samples, 8));

        let episodes = history.list_episodes(1, 0, 20).await.unwrap();
        assert_eq!(episodes.len(), 2);
        assert_eq!((episodes[0].start, episodes[0].end), (at(2), at(4)));
        assert_eq!(episodes[0].duration_seconds, 3);
        assert!(episodes[0].success);
        assert_eq!((episodes[1].start, episodes[1].end), (at(0), at(1)));
        assert_eq!(episodes[1].duration_seconds, 2);
        assert!(!episodes[1].success);

        assert_eq!(history.current_status(1).await.unwrap(), Some(true));
    }

    #[tokio::test]
    async fn other_checks_are_ignored() {
        let samples = vec![Sample::new(1, at(0), true), Sample::new(2, at(1), false)];
        let history = History::new(StateActorHandle::new(samples, 8));
        let episodes = history.list_episodes(1, 0, 20).await.unwrap();
        assert_eq!(episodes.len(), 1);
        assert!(episodes[0].success);
    }

    #[tokio::test]
    async fn rolling_window_counts() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let samples = vec![
            Sample::new(1, now - Duration::minutes(90), true),
            Sample::new(1, now - Duration::minutes(30), true),
            Sample::new(1, now - Duration::minutes(30), false),
        ];
        let history = History::new(StateActorHandle::new(samples, 8));

        assert_eq!(history.count_by_outcome_at(1, true, 1.0, now).await.unwrap(), 1);
        assert_eq!(history.count_by_outcome_at(1, false, 1.0, now).await.unwrap(), 1);
        assert_eq!(history.count_by_outcome_at(1, true, 2.0, now).await.unwrap(), 2);
        assert_eq!(history.count_by_outcome_at(1, true, 0.5, now).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn recent_samples_use_default_window() {
        let now = Utc::now();
        let samples = vec![
            Sample::new(1, now - Duration::hours(3), false),
            Sample::new(1, now - Duration::minutes(5), false),
            Sample::new(1, now - Duration::minutes(1), true),
        ];
        let history = History::new(StateActorHandle::new(samples, 8));
        assert_eq!(history.error_count(1, None).await.unwrap(), 1);
        assert_eq!(history.error_count(1, Some(4.0)).await.unwrap(), 2);
        assert_eq!(history.success_count(1, None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn invalid_arguments_are_rejected_before_reading() {
        let history = History::new(Offline);
        assert!(matches!(
            history.list_episodes(1, -1, 20).await,
            Err(HistoryError::InvalidArgument(_))
        ));
        assert!(matches!(
            history.list_episodes(1, 0, -3).await,
            Err(HistoryError::InvalidArgument(_))
        ));
        assert!(matches!(
            history.count_by_outcome(1, true, 0.0).await,
            Err(HistoryError::InvalidArgument(_))
        ));
        assert!(matches!(
            history.success_count(1, Some(-2.0)).await,
            Err(HistoryError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let history = History::new(Offline);
        assert_eq!(
            history.list_episodes(1, 0, 20).await,
            Err(HistoryError::StoreUnavailable(StoreError::Closed))
        );
        assert_eq!(
            history.current_status(1).await,
            Err(HistoryError::StoreUnavailable(StoreError::Closed))
        );
        assert!(history.error_count(1, None).await.is_err());
    }

    #[tokio::test]
    async fn episode_log_renders_durations() {
        let samples = vec![
            Sample::new(1, at(0), false),
            Sample::new(1, at(3_599), false),
            Sample::new(1, at(3_600), true),
        ];
        let history = History::new(StateActorHandle::new(samples, 8));
        let log = history
            .episode_log(1, Page::default(), english)
            .await
            .unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].duration_locale, "");
        assert_eq!(log[1].episode.duration_seconds, 3_600);
        assert_eq!(log[1].duration_locale, "1 hour");
    }
}
