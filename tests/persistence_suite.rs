use std::fs;

use chrono::Duration;
use expense_core::{
    core::{Clock, FixedClock},
    domain::{Amounted, ExpenseCategory, ExpenseDraft, SavingsGoal},
    storage::{keys, KeyValueStore},
};

mod common;
use common::{at, open_tracker, setup_test_env};

#[test]
fn state_survives_reopen() {
    let clock = FixedClock::new(at(2024, 4, 1, 9));
    let (mut tracker, _config, temp) = setup_test_env(&clock);
    tracker.add_income(2500.0).unwrap();
    tracker
        .add_expense(ExpenseDraft::new(120.0, ExpenseCategory::Bills).described("Internet"))
        .unwrap();
    tracker.set_spending_limit(150.0).unwrap();
    drop(tracker);

    let reopened = open_tracker(temp.path(), &clock);
    assert_eq!(reopened.income().amount(), 2500.0);
    assert_eq!(reopened.expenses().len(), 1);
    assert_eq!(reopened.spending_limit(), 150.0);
    assert_eq!(reopened.current_balance(), 2380.0);
}

#[test]
fn each_key_lives_in_its_own_file() {
    let clock = FixedClock::new(at(2024, 4, 1, 9));
    let (tracker, _config, temp) = setup_test_env(&clock);
    let values = temp.path().join("data").join("values");
    for key in [keys::INCOME, keys::EXPENSES, keys::SPENDING_LIMIT, keys::SUMMARY_HISTORY] {
        assert!(values.join(format!("{key}.json")).exists(), "missing {key}");
    }
    assert_eq!(tracker.store().get(keys::EXPENSES).unwrap().as_deref(), Some("[]"));
}

#[test]
fn corrupt_file_falls_back_to_default() {
    let clock = FixedClock::new(at(2024, 4, 1, 9));
    let (tracker, _config, temp) = setup_test_env(&clock);
    drop(tracker);
    let expenses = temp.path().join("data").join("values").join("dailyExpenses.json");
    fs::write(&expenses, "[{\"broken\"").unwrap();

    let reopened = open_tracker(temp.path(), &clock);
    assert!(reopened.expenses().is_empty());
    assert_eq!(reopened.load_warnings().len(), 1);
    assert_eq!(fs::read_to_string(&expenses).unwrap(), "[]");
}

#[test]
fn summary_appended_once_period_elapses() {
    let clock = FixedClock::new(at(2024, 4, 1, 9));
    let (mut tracker, _config, temp) = setup_test_env(&clock);
    tracker.add_income(1000.0).unwrap();
    tracker
        .add_expense(ExpenseDraft::new(300.0, ExpenseCategory::Food))
        .unwrap();
    assert!(tracker.summary_history().is_empty());

    clock.advance(Duration::days(31));
    tracker
        .add_expense(ExpenseDraft::new(50.0, ExpenseCategory::Travel))
        .unwrap();
    assert_eq!(tracker.summary_history().len(), 1);
    let snapshot = &tracker.summary_history()[0];
    assert_eq!(snapshot.total_expenses, 350.0);
    assert_eq!(snapshot.balance, 650.0);
    assert_eq!(snapshot.overshoot_days, 1);

    drop(tracker);
    let reopened = open_tracker(temp.path(), &clock);
    assert_eq!(reopened.summary_history().len(), 1);
}

#[test]
fn import_replaces_core_keys_only() {
    let clock = FixedClock::new(at(2024, 4, 1, 9));
    let (mut source, _config, _temp) = setup_test_env(&clock);
    source.add_income(800.0).unwrap();
    source
        .add_expense(ExpenseDraft::new(75.0, ExpenseCategory::Shopping))
        .unwrap();
    let exported = source.export_json().unwrap();
    assert!(exported.contains("\"exportDate\""));
    assert!(exported.contains("\"spendingLimit\""));

    let (mut target, _config, _temp2) = setup_test_env(&clock);
    let goal = SavingsGoal::new(0, "Bike", 500.0);
    target.add_savings_goal(goal).unwrap();
    target.import_json(&exported).unwrap();
    assert_eq!(target.income().amount(), 800.0);
    assert_eq!(target.expenses().len(), 1);
    assert_eq!(target.savings_goals().len(), 1);

    assert!(target.import_json("not a backup").is_err());
    assert_eq!(target.expenses().len(), 1);
}

#[test]
fn snapshots_restore_previous_state() {
    let clock = FixedClock::new(at(2024, 4, 1, 9));
    let (mut tracker, _config, _temp) = setup_test_env(&clock);
    tracker.add_income(600.0).unwrap();
    let name = tracker.store().snapshot(Some("before clear"), clock.now()).unwrap();
    assert!(name.starts_with("snapshot_20240401_090000_before-clear"));

    tracker.clear_all().unwrap();
    assert_eq!(tracker.income().amount(), 0.0);

    tracker.store().restore_snapshot(&name).unwrap();
    tracker.reload().unwrap();
    assert_eq!(tracker.income().amount(), 600.0);
}

const WEB_EXPORT: &str = r#"{
  "income": {
    "amount": 3000,
    "startDate": "2024-05-01T08:15:30.000Z",
    "history": [{ "amount": 3000, "date": "2024-05-01T08:15:30.000Z" }]
  },
  "expenses": [
    { "id": 1714560000000, "amount": "120.5", "category": "Food", "description": "", "date": "2024-05-01T12:00:00.000Z" }
  ],
  "spendingLimit": 250,
  "summaryHistory": [
    {
      "date": "2024-05-31T10:00:00.000Z",
      "totalIncome": 3000,
      "totalExpenses": 120.5,
      "balance": 2879.5,
      "categoryData": { "Food": 120.5 },
      "expenseCount": 1,
      "overshootDays": 0,
      "dailyAverage": 120.5,
      "period": "30 days"
    }
  ],
  "exportDate": "2024-05-20T10:00:00.000Z"
}"#;

#[test]
fn import_accepts_browser_export_layout() {
    let clock = FixedClock::new(at(2024, 6, 1, 9));
    let (mut tracker, _config, _temp) = setup_test_env(&clock);
    tracker.import_json(WEB_EXPORT).unwrap();
    assert_eq!(tracker.income().amount(), 3000.0);
    assert_eq!(tracker.expenses().len(), 1);
    assert_eq!(tracker.expenses()[0].amount(), 120.5);
    assert_eq!(tracker.spending_limit(), 250.0);
    assert_eq!(tracker.summary_history().len(), 1);
    assert_eq!(tracker.summary_history()[0].balance, 2879.5);
}

#[test]
fn stored_records_with_blank_fields_survive_reopen() {
    let clock = FixedClock::new(at(2024, 6, 1, 9));
    let (tracker, _config, temp) = setup_test_env(&clock);
    tracker
        .store()
        .set(
            keys::SAVINGS_GOALS,
            r#"[{"id":1,"name":"Laptop","targetAmount":900,"currentAmount":100,"deadline":"","priority":"high"}]"#,
        )
        .unwrap();
    tracker
        .store()
        .set(
            keys::SUMMARY_HISTORY,
            r#"[{"date":"2024-05-31T10:00:00.000Z","totalIncome":500,"totalExpenses":50,"balance":450,"categoryData":{},"expenseCount":1,"overshootDays":0,"dailyAverage":50,"period":"30 days"}]"#,
        )
        .unwrap();
    drop(tracker);

    let reopened = open_tracker(temp.path(), &clock);
    assert!(reopened.load_warnings().is_empty());
    assert_eq!(reopened.savings_goals().len(), 1);
    assert_eq!(reopened.savings_goals()[0].deadline, None);
    assert_eq!(reopened.summary_history().len(), 1);
    let stored = reopened.store().get(keys::SAVINGS_GOALS).unwrap().unwrap();
    assert!(stored.contains("Laptop"));
}
