//! Daily spending ceiling for the rest of the calendar month.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::domain::Expense;

use super::BalanceService;

/// Share of the monthly budget by which spending may run ahead of the linear pace.
const PACE_TOLERANCE: f64 = 0.1;
/// Fraction of the daily limit below which the safe amount counts as tight.
const TIGHT_DAILY_RATIO: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendStatus {
    Good,
    Warning,
    Danger,
}

impl fmt::Display for SpendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SpendStatus::Good => "good",
            SpendStatus::Warning => "warning",
            SpendStatus::Danger => "danger",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeToSpend {
    pub monthly_budget: f64,
    pub spent_this_month: f64,
    pub remaining: f64,
    pub days_in_month: u32,
    pub day_of_month: u32,
    /// Includes today.
    pub days_remaining: u32,
    /// Expected spend so far at a linear pace.
    pub expected_spent: f64,
    /// Remaining budget per remaining day, never negative.
    pub safe_daily: f64,
    pub status: SpendStatus,
}

pub struct SafeToSpendService;

impl SafeToSpendService {
    pub fn days_in_month(year: i32, month: u32) -> u32 {
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|first| first.pred_opt())
            .map(|last| last.day())
            .unwrap_or(30)
    }

    /// Computes the ceiling from month-to-date spending already known to the caller.
    pub fn calculate(
        monthly_budget: f64,
        spent_this_month: f64,
        today: NaiveDate,
        daily_limit: f64,
    ) -> SafeToSpend {
        let days_in_month = Self::days_in_month(today.year(), today.month());
        let day_of_month = today.day();
        let days_remaining = days_in_month.saturating_sub(day_of_month) + 1;
        let remaining = monthly_budget - spent_this_month;
        let safe_daily = (remaining / f64::from(days_remaining)).max(0.0);
        let expected_spent = monthly_budget / f64::from(days_in_month) * f64::from(day_of_month);

        let status = if remaining < 0.0 {
            SpendStatus::Danger
        } else if spent_this_month - expected_spent > monthly_budget * PACE_TOLERANCE {
            SpendStatus::Warning
        } else if safe_daily < daily_limit * TIGHT_DAILY_RATIO {
            SpendStatus::Warning
        } else {
            SpendStatus::Good
        };

        SafeToSpend {
            monthly_budget,
            spent_this_month,
            remaining,
            days_in_month,
            day_of_month,
            days_remaining,
            expected_spent,
            safe_daily,
            status,
        }
    }

    /// Derives month-to-date spending from `expenses` and computes the ceiling.
    pub fn for_expenses(
        expenses: &[Expense],
        monthly_budget: f64,
        today: NaiveDate,
        daily_limit: f64,
    ) -> SafeToSpend {
        let month = BalanceService::expenses_in_month(expenses, today.year(), today.month());
        let spent = BalanceService::total_expenses(&month);
        Self::calculate(monthly_budget, spent, today, daily_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExpenseCategory;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_lengths() {
        assert_eq!(SafeToSpendService::days_in_month(2024, 2), 29);
        assert_eq!(SafeToSpendService::days_in_month(2023, 2), 28);
        assert_eq!(SafeToSpendService::days_in_month(2024, 12), 31);
        assert_eq!(SafeToSpendService::days_in_month(2024, 4), 30);
    }

    #[test]
    fn on_pace_spending_is_good() {
        let result = SafeToSpendService::calculate(3000.0, 1000.0, day(2024, 4, 10), 100.0);
        assert_eq!(result.days_remaining, 21);
        assert_eq!(result.remaining, 2000.0);
        assert!((result.safe_daily - 2000.0 / 21.0).abs() < 1e-9);
        assert_eq!(result.status, SpendStatus::Good);
    }

    #[test]
    fn overspent_month_is_danger_with_zero_ceiling() {
        let result = SafeToSpendService::calculate(1000.0, 1200.0, day(2024, 4, 20), 100.0);
        assert_eq!(result.status, SpendStatus::Danger);
        assert_eq!(result.safe_daily, 0.0);
    }

    #[test]
    fn running_ahead_of_pace_warns() {
        // Expected by day 10 of 30 is 1000; 1400 is more than 10% of budget ahead.
        let result = SafeToSpendService::calculate(3000.0, 1400.0, day(2024, 4, 10), 10.0);
        assert_eq!(result.status, SpendStatus::Warning);
    }

    #[test]
    fn tight_daily_ceiling_warns() {
        let result = SafeToSpendService::calculate(3000.0, 1000.0, day(2024, 4, 10), 200.0);
        assert_eq!(result.status, SpendStatus::Warning);
    }

    #[test]
    fn month_to_date_ignores_other_months() {
        let at = |d: NaiveDate| d.and_hms_opt(12, 0, 0).unwrap();
        let expenses = vec![
            Expense::new(1, 500.0, ExpenseCategory::Bills, at(day(2024, 3, 31))),
            Expense::new(2, 100.0, ExpenseCategory::Food, at(day(2024, 4, 2))),
            Expense::new(3, 50.0, ExpenseCategory::Food, at(day(2023, 4, 2))),
        ];
        let result = SafeToSpendService::for_expenses(&expenses, 3000.0, day(2024, 4, 10), 50.0);
        assert_eq!(result.spent_this_month, 100.0);
    }
}
