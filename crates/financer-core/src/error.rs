use financer_domain::{FinanceError, LegalPersonError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Finance not found: {0}")]
    FinanceNotFound(Uuid),
    #[error("Legal person not found: {0}")]
    LegalPersonNotFound(Uuid),
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl CoreError {
    /// Whether the error came from loading or persisting the ledger.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            CoreError::Storage(_) | CoreError::Io(_) | CoreError::Serde(_)
        )
    }
}

impl From<FinanceError> for CoreError {
    fn from(err: FinanceError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

impl From<LegalPersonError> for CoreError {
    fn from(err: LegalPersonError) -> Self {
        CoreError::Validation(err.to_string())
    }
}
