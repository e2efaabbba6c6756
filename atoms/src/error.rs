use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use thiserror::Error;

pub type AtomResult<T> = std::result::Result<T, AtomError>;

#[derive(Debug, Error)]
pub enum AtomError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    Validation(String),

    #[error("{entity} already exists: {id}")]
    Conflict { entity: &'static str, id: String },

    #[error("store error: {0}")]
    Store(String),
}

impl AtomError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wraps any displayable SDK or serde error as a store failure.
    pub fn store(err: impl std::fmt::Display) -> Self {
        Self::Store(err.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Conditional puts fail with a check exception when the key is taken.
    pub fn from_put(err: SdkError<PutItemError>, entity: &'static str, id: &str) -> Self {
        let taken = err
            .as_service_error()
            .map(|e| e.is_conditional_check_failed_exception())
            .unwrap_or(false);
        if taken {
            Self::Conflict {
                entity,
                id: id.to_string(),
            }
        } else {
            Self::Store(format!("DynamoDB put_item error: {}", err))
        }
    }
}

impl From<serde_json::Error> for AtomError {
    fn from(err: serde_json::Error) -> Self {
        Self::Store(format!("serialization error: {}", err))
    }
}
