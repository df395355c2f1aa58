use std::{env, path::PathBuf};

/// Overrides the application directory when set.
pub const HOME_ENV: &str = "EXPENSE_CORE_HOME";
const DEFAULT_DIR_NAME: &str = ".expense_core";

/// Root directory for configuration and stored data.
///
/// `EXPENSE_CORE_HOME` wins; otherwise `~/.expense_core`, falling back to the working
/// directory when no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}
