//! Periodic snapshots of income versus spending.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::category::ExpenseCategory;
use super::common::lenient_timestamp;

pub const SUMMARY_PERIOD_LABEL: &str = "30 days";

/// Immutable once appended to the summary history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummarySnapshot {
    #[serde(deserialize_with = "lenient_timestamp")]
    pub date: NaiveDateTime,
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    #[serde(default)]
    pub category_data: BTreeMap<ExpenseCategory, f64>,
    pub expense_count: usize,
    pub overshoot_days: usize,
    pub daily_average: f64,
    #[serde(default = "default_period")]
    pub period: String,
}

fn default_period() -> String {
    SUMMARY_PERIOD_LABEL.to_string()
}
