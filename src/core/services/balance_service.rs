//! Reducers over expense snapshots: totals, balances, date filters, and category rollups.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::domain::{Amounted, Expense, ExpenseCategory};

pub struct BalanceService;

impl BalanceService {
    /// Sum of every expense amount. Non-numeric amounts have already been coerced to zero.
    pub fn total_expenses(expenses: &[Expense]) -> f64 {
        expenses.iter().map(Amounted::amount).sum()
    }

    /// Income minus total expenses. May be negative.
    pub fn current_balance(total_income: f64, expenses: &[Expense]) -> f64 {
        total_income - Self::total_expenses(expenses)
    }

    /// Expenses that fall on `day`, ignoring time-of-day.
    pub fn expenses_on(expenses: &[Expense], day: NaiveDate) -> Vec<Expense> {
        expenses
            .iter()
            .filter(|expense| expense.day() == day)
            .cloned()
            .collect()
    }

    /// Expenses whose calendar day lies in `start..=end`.
    pub fn expenses_between(expenses: &[Expense], start: NaiveDate, end: NaiveDate) -> Vec<Expense> {
        expenses
            .iter()
            .filter(|expense| {
                let day = expense.day();
                day >= start && day <= end
            })
            .cloned()
            .collect()
    }

    pub fn expenses_in_month(expenses: &[Expense], year: i32, month: u32) -> Vec<Expense> {
        expenses
            .iter()
            .filter(|expense| expense.date.year() == year && expense.date.month() == month)
            .cloned()
            .collect()
    }

    pub fn spent_on(expenses: &[Expense], day: NaiveDate) -> f64 {
        expenses
            .iter()
            .filter(|expense| expense.day() == day)
            .map(Amounted::amount)
            .sum()
    }

    /// Per-day totals keyed by calendar day.
    pub fn daily_totals(expenses: &[Expense]) -> BTreeMap<NaiveDate, f64> {
        let mut totals = BTreeMap::new();
        for expense in expenses {
            *totals.entry(expense.day()).or_insert(0.0) += expense.amount();
        }
        totals
    }

    pub fn category_totals(expenses: &[Expense]) -> BTreeMap<ExpenseCategory, f64> {
        let mut totals = BTreeMap::new();
        for expense in expenses {
            *totals.entry(expense.category).or_insert(0.0) += expense.amount();
        }
        totals
    }

    /// The `limit` largest categories by total, largest first.
    pub fn top_categories(expenses: &[Expense], limit: usize) -> Vec<(ExpenseCategory, f64)> {
        let mut ranked: Vec<_> = Self::category_totals(expenses).into_iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(limit);
        ranked
    }

    /// First expense with the largest amount.
    pub fn highest_expense(expenses: &[Expense]) -> Option<&Expense> {
        expenses.iter().fold(None, |best: Option<&Expense>, expense| match best {
            Some(current) if current.amount() >= expense.amount() => Some(current),
            _ => Some(expense),
        })
    }

    /// First expense with the smallest amount.
    pub fn lowest_expense(expenses: &[Expense]) -> Option<&Expense> {
        expenses.iter().fold(None, |best: Option<&Expense>, expense| match best {
            Some(current) if current.amount() <= expense.amount() => Some(current),
            _ => Some(expense),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn sample() -> Vec<Expense> {
        vec![
            Expense::new(1, 40.0, ExpenseCategory::Food, at(1, 9)),
            Expense::new(2, 60.0, ExpenseCategory::Food, at(1, 21)),
            Expense::new(3, 120.0, ExpenseCategory::Bills, at(2, 10)),
            Expense::new(4, f64::NAN, ExpenseCategory::Travel, at(3, 10)),
            Expense::new(5, 15.0, ExpenseCategory::Shopping, at(5, 23)),
        ]
    }

    #[test]
    fn totals_skip_non_numeric_amounts() {
        assert_eq!(BalanceService::total_expenses(&sample()), 235.0);
        assert_eq!(BalanceService::total_expenses(&[]), 0.0);
    }

    #[test]
    fn balance_is_income_minus_total() {
        let expenses = sample();
        let balance = BalanceService::current_balance(200.0, &expenses);
        assert_eq!(balance, 200.0 - BalanceService::total_expenses(&expenses));
        assert!(balance < 0.0);
    }

    #[test]
    fn day_filter_ignores_time_of_day() {
        let on_first = BalanceService::expenses_on(&sample(), at(1, 0).date());
        assert_eq!(on_first.len(), 2);
        assert_eq!(BalanceService::spent_on(&sample(), at(1, 0).date()), 100.0);
    }

    #[test]
    fn range_filter_is_inclusive() {
        let range = BalanceService::expenses_between(&sample(), at(2, 0).date(), at(5, 0).date());
        let ids: Vec<i64> = range.iter().map(|expense| expense.id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
    }

    #[test]
    fn top_categories_rank_by_total() {
        let top = BalanceService::top_categories(&sample(), 2);
        assert_eq!(
            top,
            vec![(ExpenseCategory::Bills, 120.0), (ExpenseCategory::Food, 100.0)]
        );
    }

    #[test]
    fn extremes_pick_first_match() {
        let expenses = sample();
        assert_eq!(BalanceService::highest_expense(&expenses).map(|e| e.id), Some(3));
        assert_eq!(BalanceService::lowest_expense(&expenses).map(|e| e.id), Some(4));
        assert!(BalanceService::highest_expense(&[]).is_none());
    }
}
