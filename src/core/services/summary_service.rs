//! Periodic summary snapshots and the trigger that decides when one is due.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::{Amounted, Expense, Income, SummarySnapshot, SUMMARY_PERIOD_LABEL};

use super::BalanceService;

/// Days between automatically generated summaries.
pub const SUMMARY_INTERVAL_DAYS: i64 = 30;

pub struct SummaryService;

impl SummaryService {
    /// Whole days elapsed from `start` to `now`, rounded down.
    pub fn elapsed_days(start: NaiveDateTime, now: NaiveDateTime) -> i64 {
        (now - start).num_seconds().div_euclid(86_400)
    }

    /// Number of summaries that should exist by `now`.
    pub fn expected_summaries(start: NaiveDateTime, now: NaiveDateTime) -> i64 {
        Self::elapsed_days(start, now).div_euclid(SUMMARY_INTERVAL_DAYS)
    }

    /// True when more summaries are due than have been recorded.
    pub fn should_generate(start: NaiveDateTime, summary_count: usize, now: NaiveDateTime) -> bool {
        let recorded = i64::try_from(summary_count).unwrap_or(i64::MAX);
        Self::expected_summaries(start, now) > recorded
    }

    /// Days whose summed spending exceeds `spending_limit`.
    pub fn overshoot_days(expenses: &[Expense], spending_limit: f64) -> usize {
        BalanceService::daily_totals(expenses)
            .values()
            .filter(|total| **total > spending_limit)
            .count()
    }

    /// Builds a snapshot stamped with `now`.
    pub fn generate(
        income: &Income,
        expenses: &[Expense],
        spending_limit: f64,
        now: NaiveDateTime,
    ) -> SummarySnapshot {
        let total_income = income.amount();
        let total_expenses = BalanceService::total_expenses(expenses);
        let active_days: HashSet<_> = expenses.iter().map(Expense::day).collect();
        let daily_average = if active_days.is_empty() {
            0.0
        } else {
            total_expenses / active_days.len() as f64
        };
        let snapshot = SummarySnapshot {
            date: now,
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
            category_data: BalanceService::category_totals(expenses),
            expense_count: expenses.len(),
            overshoot_days: Self::overshoot_days(expenses, spending_limit),
            daily_average,
            period: SUMMARY_PERIOD_LABEL.to_string(),
        };
        debug!(
            expenses = snapshot.expense_count,
            overshoot_days = snapshot.overshoot_days,
            "summary snapshot generated"
        );
        snapshot
    }
}
