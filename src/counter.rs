use crate::{CheckId, HistoryError, ResultStore};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

pub const DEFAULT_WINDOW_HOURS: f64 = 1.0;

/// Number of samples of `check_id` with the given outcome within the last `hours`
/// hours before `now`, bounds included.
pub async fn count_by_outcome<S>(
    store: &S,
    check_id: CheckId,
    success: bool,
    hours: f64,
    now: DateTime<Utc>,
) -> Result<u64, HistoryError>
where
    S: ResultStore + ?Sized,
{
    let since = window_start(now, hours)?;
    let count = store.count_samples(check_id, success, since).await?;
    debug!(check_id, success, hours, count, "counted samples in window");
    Ok(count)
}

/// Start of the trailing window of `hours` ending at `now`. The window may be
/// fractional but must be positive and finite.
pub fn window_start(now: DateTime<Utc>, hours: f64) -> Result<DateTime<Utc>, HistoryError> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(HistoryError::InvalidArgument(format!(
            "window must be a positive number of hours, got {hours}"
        )));
    }
    let millis = (hours * 3_600_000.0).round();
    // Anything wider than chrono can represent reaches back to the earliest instant.
    let span = if millis < i64::MAX as f64 {
        Duration::try_milliseconds(millis as i64)
    } else {
        None
    };
    Ok(span
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn whole_and_fractional_hours() {
        assert_eq!(
            window_start(now(), 1.0).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap()
        );
        assert_eq!(
            window_start(now(), 0.25).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 1, 11, 45, 0).unwrap()
        );
    }

    #[test]
    fn rejects_non_positive_windows() {
        for hours in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                window_start(now(), hours),
                Err(HistoryError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn huge_window_saturates() {
        assert_eq!(window_start(now(), 1e30).unwrap(), DateTime::<Utc>::MIN_UTC);
    }
}
