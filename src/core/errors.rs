use std::result::Result as StdResult;

use thiserror::Error;

use crate::ai::AiError;
use crate::config::ConfigError;
use crate::storage::StoreError;

/// Unified error type for the service, storage, and configuration layers.
#[derive(Error, Debug)]
pub enum FinanceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(i64),
    #[error("Income entry not found at position {0}")]
    IncomeEntryNotFound(usize),
    #[error("Savings goal not found: {0}")]
    GoalNotFound(i64),
    #[error("Recurring expense not found: {0}")]
    RecurringNotFound(i64),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error(transparent)]
    Ai(#[from] AiError),
}

pub type Result<T> = StdResult<T, FinanceError>;

impl From<std::io::Error> for FinanceError {
    fn from(err: std::io::Error) -> Self {
        FinanceError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for FinanceError {
    fn from(err: serde_json::Error) -> Self {
        FinanceError::StorageError(err.to_string())
    }
}

impl From<StoreError> for FinanceError {
    fn from(err: StoreError) -> Self {
        FinanceError::StorageError(err.to_string())
    }
}

impl From<ConfigError> for FinanceError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => FinanceError::StorageError(io.to_string()),
            ConfigError::Serde(message) | ConfigError::Invalid(message) => {
                FinanceError::ConfigError(message)
            }
        }
    }
}
