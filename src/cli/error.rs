use std::io;

use financer_config::ConfigError;
use financer_core::CoreError;
use thiserror::Error;

use crate::errors::FinancerError;

/// Failure of a single CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Financer(#[from] FinancerError),
    #[error("{0}")]
    InvalidArguments(String),
    #[error("Unknown command `{0}`. Type `help` to see available commands.")]
    UnknownCommand(String),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl CliError {
    pub fn invalid(message: impl Into<String>) -> Self {
        CliError::InvalidArguments(message.into())
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, CliError::Financer(err) if err.is_storage())
    }

    pub fn user_message(&self) -> String {
        match self {
            CliError::Financer(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::Financer(err.into())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Financer(err.into())
    }
}

pub type CommandResult = Result<(), CliError>;
