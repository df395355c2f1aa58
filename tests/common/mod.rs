use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use expense_core::{
    config::ConfigManager,
    core::{FinanceTracker, FixedClock},
    storage::JsonFileStore,
};
use tempfile::TempDir;

#[allow(dead_code)]
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// Tracker and config manager backed by a fresh directory; keep the guard alive for the test.
#[allow(dead_code)]
pub fn setup_test_env(clock: &FixedClock) -> (FinanceTracker<JsonFileStore>, ConfigManager, TempDir) {
    let temp = TempDir::new().expect("create temp dir");
    let tracker = open_tracker(temp.path(), clock);
    let config_manager =
        ConfigManager::with_base_dir(temp.path()).expect("create config manager for temp dir");
    (tracker, config_manager, temp)
}

#[allow(dead_code)]
pub fn open_tracker(base: &std::path::Path, clock: &FixedClock) -> FinanceTracker<JsonFileStore> {
    let store = JsonFileStore::open(&base.join("data")).expect("create json store");
    FinanceTracker::open_with(store, Arc::new(clock.clone()), 200.0).expect("open tracker")
}
