//! Month-level reporting: totals, savings rate, and leading categories.

use crate::domain::{Expense, ExpenseCategory};

use super::BalanceService;

const TOP_CATEGORY_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub expenses: Vec<Expense>,
    pub total: f64,
    pub income: f64,
    pub savings: f64,
    /// Savings as a percentage of income; zero when income is not positive.
    pub savings_rate: f64,
    pub top_categories: Vec<(ExpenseCategory, f64)>,
}

pub struct ReportService;

impl ReportService {
    pub fn monthly(expenses: &[Expense], income: f64, year: i32, month: u32) -> MonthlyReport {
        let month_expenses = BalanceService::expenses_in_month(expenses, year, month);
        let total = BalanceService::total_expenses(&month_expenses);
        let savings = income - total;
        let savings_rate = if income > 0.0 {
            savings / income * 100.0
        } else {
            0.0
        };
        let top_categories = BalanceService::top_categories(&month_expenses, TOP_CATEGORY_COUNT);
        MonthlyReport {
            year,
            month,
            expenses: month_expenses,
            total,
            income,
            savings,
            savings_rate,
            top_categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(month: u32, day: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, month, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn report_limits_to_month_and_ranks_categories() {
        let expenses = vec![
            Expense::new(1, 100.0, ExpenseCategory::Food, at(5, 1)),
            Expense::new(2, 300.0, ExpenseCategory::Bills, at(5, 2)),
            Expense::new(3, 50.0, ExpenseCategory::Travel, at(5, 3)),
            Expense::new(4, 10.0, ExpenseCategory::Shopping, at(5, 4)),
            Expense::new(5, 999.0, ExpenseCategory::Shopping, at(6, 1)),
        ];
        let report = ReportService::monthly(&expenses, 1000.0, 2024, 5);
        assert_eq!(report.expenses.len(), 4);
        assert_eq!(report.total, 460.0);
        assert_eq!(report.savings, 540.0);
        assert_eq!(report.savings_rate, 54.0);
        assert_eq!(
            report.top_categories,
            vec![
                (ExpenseCategory::Bills, 300.0),
                (ExpenseCategory::Food, 100.0),
                (ExpenseCategory::Travel, 50.0)
            ]
        );
    }

    #[test]
    fn zero_income_has_zero_rate() {
        let report = ReportService::monthly(&[], 0.0, 2024, 1);
        assert_eq!(report.savings_rate, 0.0);
        assert!(report.top_categories.is_empty());
    }
}
