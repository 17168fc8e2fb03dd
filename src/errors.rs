use std::result::Result as StdResult;

use financer_config::ConfigError;
use financer_core::CoreError;
use financer_domain::{FinanceError, LegalPersonError};
use thiserror::Error;

/// Notice shown to users when loading or saving the ledger fails.
pub const STORAGE_FAILURE_NOTICE: &str = "Error processing data. Please restart the app; \
     if this error occurs again, please contact support.";

/// Unified error type for the application layer.
#[derive(Debug, Error)]
pub enum FinancerError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = StdResult<T, FinancerError>;

impl FinancerError {
    pub fn is_storage(&self) -> bool {
        match self {
            FinancerError::Core(err) => err.is_storage(),
            FinancerError::Io(_) => true,
            _ => false,
        }
    }

    /// Text suitable for end users; storage failures collapse into the generic notice.
    pub fn user_message(&self) -> String {
        if self.is_storage() {
            STORAGE_FAILURE_NOTICE.to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<FinanceError> for FinancerError {
    fn from(err: FinanceError) -> Self {
        FinancerError::InvalidInput(err.to_string())
    }
}

impl From<LegalPersonError> for FinancerError {
    fn from(err: LegalPersonError) -> Self {
        FinancerError::InvalidInput(err.to_string())
    }
}
