use cosmoscope_atoms::AtomError;
use std::time::Duration;
use thiserror::Error;

pub type ViewerResult<T> = std::result::Result<T, ViewerError>;

/// Failure of a call across the network boundary.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("not found")]
    NotFound,

    #[error("rejected: {0}")]
    Rejected(String),

    #[error("transient failure: {0}")]
    Transient(String),

    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

impl FetchError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_) | Self::TimedOut(_))
    }
}

impl From<AtomError> for FetchError {
    fn from(err: AtomError) -> Self {
        match err {
            AtomError::NotFound { .. } => Self::NotFound,
            AtomError::Validation(msg) => Self::Rejected(msg),
            conflict @ AtomError::Conflict { .. } => Self::Rejected(conflict.to_string()),
            AtomError::Store(msg) => Self::Transient(msg),
        }
    }
}

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("invalid view transform: {0}")]
    InvalidTransform(String),

    #[error("{0}")]
    Validation(String),

    #[error("no discussion thread is open")]
    NoScope,

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl From<AtomError> for ViewerError {
    fn from(err: AtomError) -> Self {
        match err {
            AtomError::Validation(msg) => Self::Validation(msg),
            other => Self::Fetch(other.into()),
        }
    }
}
