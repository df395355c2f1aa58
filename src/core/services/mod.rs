pub mod balance_service;
pub mod expense_service;
pub mod income_service;
pub mod insight_service;
pub mod recurring_service;
pub mod report_service;
pub mod safe_to_spend_service;
pub mod savings_service;
pub mod summary_service;

pub use balance_service::BalanceService;
pub use expense_service::ExpenseService;
pub use income_service::IncomeService;
pub use insight_service::{
    AmountStats, AnomalyReport, BehaviorProfile, InsightService, LimitLevel, LimitProgress,
    SpendBucket, SpendingForecast, StabilityScore, TimeOfDay, weekday_name,
};
pub use recurring_service::RecurringService;
pub use report_service::{MonthlyReport, ReportService};
pub use safe_to_spend_service::{SafeToSpend, SafeToSpendService, SpendStatus};
pub use savings_service::SavingsService;
pub use summary_service::SummaryService;

use crate::core::errors::FinanceError;
use crate::domain::Identifiable;

pub type ServiceResult<T> = Result<T, FinanceError>;

/// Rejects non-numeric, non-finite, and non-positive amounts.
pub(crate) fn require_positive(amount: f64, what: &str) -> ServiceResult<f64> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(FinanceError::InvalidInput(format!(
            "{what} must be a positive number"
        )))
    }
}

/// Index of the record carrying `id`, if any.
pub(crate) fn position_by_id<T: Identifiable>(records: &[T], id: i64) -> Option<usize> {
    records.iter().position(|record| record.id() == id)
}

/// Creation-timestamp identifier in milliseconds, bumped past any existing id it would collide with.
pub(crate) fn next_record_id<I>(existing: I, now: chrono::NaiveDateTime) -> i64
where
    I: IntoIterator<Item = i64>,
{
    let candidate = now.and_utc().timestamp_millis();
    let ids: Vec<i64> = existing.into_iter().collect();
    if ids.contains(&candidate) {
        ids.iter().copied().max().unwrap_or(candidate).saturating_add(1)
    } else {
        candidate
    }
}
