//! Persistent user preferences: currency display, default limit, insight settings.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{AiSettings, Config};
