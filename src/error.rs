use thiserror::Error;

/// Failures talking to a `ResultStore`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("result store is not running")]
    Closed,
    #[error("result store dropped the request")]
    NoReply,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}
