pub mod json_backend;
pub mod memory;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;

/// Keys of the flat namespace the application persists.
pub mod keys {
    pub const INCOME: &str = "userIncome";
    pub const EXPENSES: &str = "dailyExpenses";
    pub const SPENDING_LIMIT: &str = "spendingLimit";
    pub const SUMMARY_HISTORY: &str = "summaryHistory";
    pub const SAVINGS_GOALS: &str = "savingsGoals";
    pub const RECURRING_EXPENSES: &str = "recurringExpenses";
    pub const AI_INSIGHTS: &str = "aiInsights";
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error for `{key}`: {message}")]
    Serde { key: String, message: String },
    #[error("Invalid key `{0}`")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Flat namespace of named text values, each read and written independently.
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when the key has never been written or was removed.
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
    /// Drops every key.
    fn clear(&self) -> Result<()>;
    /// Sorted list of stored keys.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Reads and decodes the JSON value stored under `key`.
pub fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| StoreError::Serde {
            key: key.to_string(),
            message: err.to_string(),
        })
}

/// Encodes `value` as JSON and stores it under `key`.
pub fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(value).map_err(|err| StoreError::Serde {
        key: key.to_string(),
        message: err.to_string(),
    })?;
    store.set(key, &json)
}

pub(crate) fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'))
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}
