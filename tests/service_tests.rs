use chrono::{Duration, NaiveDate};
use expense_core::{
    core::services::{
        AnomalyReport, BalanceService, InsightService, SafeToSpendService, SpendStatus,
        SummaryService,
    },
    domain::{Expense, ExpenseCategory},
};

mod common;
use common::at;

fn daily(amounts: &[f64]) -> Vec<Expense> {
    amounts
        .iter()
        .enumerate()
        .map(|(index, amount)| {
            Expense::new(
                index as i64 + 1,
                *amount,
                ExpenseCategory::Food,
                at(2024, 5, 1, 12) + Duration::days(index as i64),
            )
        })
        .collect()
}

#[test]
fn seven_identical_expenses_are_perfectly_stable() {
    let expenses = daily(&[100.0; 7]);
    let stability = InsightService::stability_score(&expenses);
    assert_eq!(stability.score, 100);
    assert_eq!(BalanceService::current_balance(1000.0, &expenses), 300.0);
    assert!(matches!(
        InsightService::detect_anomalies(&expenses),
        AnomalyReport::Consistent(_)
    ));
}

#[test]
fn summary_due_after_thirty_days() {
    let now = at(2024, 6, 15, 9);
    assert!(SummaryService::should_generate(now - Duration::days(31), 0, now));
    assert!(!SummaryService::should_generate(now - Duration::days(29), 0, now));
    assert!(!SummaryService::should_generate(now - Duration::days(31), 1, now));
    assert!(SummaryService::should_generate(now - Duration::days(61), 1, now));
}

#[test]
fn malformed_amounts_count_as_zero() {
    let json = r#"[
        {"id": 1, "amount": 40, "category": "Food", "date": "2024-05-01T10:00:00"},
        {"id": 2, "amount": "12.5", "category": "Travel", "date": "2024-05-01T11:00:00"},
        {"id": 3, "amount": "abc", "category": "Rent", "date": "2024-05-02T11:00:00"},
        {"id": 4, "category": "Bills", "date": "2024-05-02T18:00:00"}
    ]"#;
    let expenses: Vec<Expense> = serde_json::from_str(json).unwrap();
    assert_eq!(BalanceService::total_expenses(&expenses), 52.5);
    assert_eq!(BalanceService::current_balance(50.0, &expenses), -2.5);
    assert_eq!(expenses[2].category, ExpenseCategory::Other);
}

#[test]
fn stability_drops_as_amounts_spread() {
    let steady = InsightService::stability_score(&daily(&[50.0, 52.0, 48.0, 50.0, 51.0, 49.0, 50.0]));
    let erratic = InsightService::stability_score(&daily(&[5.0, 200.0, 10.0, 150.0, 3.0, 90.0, 40.0]));
    assert!(steady.score > erratic.score);
    assert!(erratic.score <= 100);
}

#[test]
fn safe_to_spend_flags_overspending() {
    let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    let safe = SafeToSpendService::calculate(3000.0, 3100.0, today, 200.0);
    assert_eq!(safe.status, SpendStatus::Danger);
    assert_eq!(safe.safe_daily, 0.0);
    assert_eq!(safe.days_remaining, 21);

    let relaxed = SafeToSpendService::calculate(3000.0, 500.0, today, 50.0);
    assert_eq!(relaxed.status, SpendStatus::Good);
    assert!((relaxed.safe_daily - 2500.0 / 21.0).abs() < 1e-9);
}
