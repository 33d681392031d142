use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use checklog::{HistoryError, StoreError};
use std::{error::Error, fmt::Display};
use tracing::warn;

#[derive(Debug, Clone)]
pub enum ApiError {
    History(HistoryError),
}

impl From<HistoryError> for ApiError {
    fn from(value: HistoryError) -> Self {
        Self::History(value)
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        Self::History(value.into())
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::History(e) => e.fmt(f),
        }
    }
}

impl Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::History(e @ HistoryError::InvalidArgument(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            Self::History(e @ HistoryError::StoreUnavailable(_)) => {
                warn!("Request failed: {e}");
                (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
            }
        }
        .into_response()
    }
}

/// Parses an optional query value, treating anything unparsable as absent.
pub fn lenient<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|v| v.trim().parse().ok())
}
