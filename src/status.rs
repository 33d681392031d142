use crate::{CheckId, HistoryError, ResultStore};
use tracing::debug;

/// Outcome of the most recent sample of `check_id`, `None` while nothing was recorded.
pub async fn current_status<S>(store: &S, check_id: CheckId) -> Result<Option<bool>, HistoryError>
where
    S: ResultStore + ?Sized,
{
    let status = store.latest_sample(check_id).await?.map(|s| s.success);
    debug!(check_id, ?status, "resolved current status");
    Ok(status)
}
