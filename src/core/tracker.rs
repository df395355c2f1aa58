//! Application state facade: owns every persisted collection and keeps the store in sync.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::core::errors::{FinanceError, Result};
use crate::core::services::{
    BalanceService, ExpenseService, IncomeService, RecurringService, SavingsService,
    SummaryService,
};
use crate::core::time::{Clock, SystemClock};
use crate::domain::common::{lenient_amount, lenient_optional_timestamp};
use crate::domain::{
    parse_amount, sanitize_amount, Amounted, Expense, ExpenseDraft, Income, RecurringExpense,
    SavingsGoal, SummarySnapshot,
};
use crate::storage::{keys, load_json, save_json, KeyValueStore};

pub const DEFAULT_SPENDING_LIMIT: f64 = 200.0;

/// Portable copy of the core collections, as written by `export` and read by `import`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub income: Income,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default = "default_limit", deserialize_with = "lenient_amount")]
    pub spending_limit: f64,
    #[serde(default)]
    pub summary_history: Vec<SummarySnapshot>,
    #[serde(
        default,
        deserialize_with = "lenient_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub export_date: Option<NaiveDateTime>,
}

fn default_limit() -> f64 {
    DEFAULT_SPENDING_LIMIT
}

/// Owns income, expenses, limit, summaries, goals, and recurring items for one store.
///
/// Every mutation validates first, then updates memory, then writes the affected key.
pub struct FinanceTracker<S: KeyValueStore> {
    store: S,
    clock: Arc<dyn Clock>,
    default_limit: f64,
    income: Income,
    expenses: Vec<Expense>,
    spending_limit: f64,
    summary_history: Vec<SummarySnapshot>,
    savings_goals: Vec<SavingsGoal>,
    recurring: Vec<RecurringExpense>,
    load_warnings: Vec<String>,
}

impl<S: KeyValueStore> FinanceTracker<S> {
    /// Loads state using the system clock and the stock spending limit.
    pub fn open(store: S) -> Result<Self> {
        Self::open_with(store, Arc::new(SystemClock), DEFAULT_SPENDING_LIMIT)
    }

    /// Loads state from `store`; keys that are missing or unreadable start from defaults.
    pub fn open_with(store: S, clock: Arc<dyn Clock>, default_limit: f64) -> Result<Self> {
        let default_limit = if default_limit.is_finite() && default_limit > 0.0 {
            default_limit
        } else {
            DEFAULT_SPENDING_LIMIT
        };
        let income = Income::starting(clock.now());
        let mut tracker = Self {
            store,
            clock,
            default_limit,
            income,
            expenses: Vec::new(),
            spending_limit: default_limit,
            summary_history: Vec::new(),
            savings_goals: Vec::new(),
            recurring: Vec::new(),
            load_warnings: Vec::new(),
        };
        tracker.reload()?;
        Ok(tracker)
    }

    /// Re-reads every collection from the store, then writes back whatever defaults were used.
    pub fn reload(&mut self) -> Result<()> {
        let now = self.clock.now();
        let default_limit = self.default_limit;
        let store = &self.store;
        let mut warnings = Vec::new();
        self.income = load_or(store, keys::INCOME, &mut warnings, || Income::starting(now));
        self.expenses = load_or(store, keys::EXPENSES, &mut warnings, Vec::new);
        self.summary_history = load_or(store, keys::SUMMARY_HISTORY, &mut warnings, Vec::new);
        self.savings_goals = load_or(store, keys::SAVINGS_GOALS, &mut warnings, Vec::new);
        self.recurring = load_or(store, keys::RECURRING_EXPENSES, &mut warnings, Vec::new);
        let raw_limit = load_or(store, keys::SPENDING_LIMIT, &mut warnings, || {
            Value::from(default_limit)
        });
        self.spending_limit = limit_from_value(&raw_limit).unwrap_or_else(|| {
            let message = format!(
                "`{}` is not a positive number; using default",
                keys::SPENDING_LIMIT
            );
            warn!(key = keys::SPENDING_LIMIT, "{message}");
            warnings.push(message);
            default_limit
        });
        self.load_warnings = warnings;

        self.persist_all()?;
        self.check_and_generate_summary()?;
        info!(
            expenses = self.expenses.len(),
            summaries = self.summary_history.len(),
            "finance state loaded"
        );
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn income(&self) -> &Income {
        &self.income
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn spending_limit(&self) -> f64 {
        self.spending_limit
    }

    pub fn summary_history(&self) -> &[SummarySnapshot] {
        &self.summary_history
    }

    pub fn savings_goals(&self) -> &[SavingsGoal] {
        &self.savings_goals
    }

    pub fn recurring(&self) -> &[RecurringExpense] {
        &self.recurring
    }

    /// Problems found while loading; each affected key fell back to its default.
    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    pub fn current_balance(&self) -> f64 {
        BalanceService::current_balance(self.income.amount(), &self.expenses)
    }

    pub fn add_income(&mut self, amount: f64) -> Result<()> {
        let now = self.clock.now();
        IncomeService::add(&mut self.income, amount, now)?;
        self.persist_income()
    }

    pub fn set_income_total(&mut self, amount: f64) -> Result<()> {
        IncomeService::set_total(&mut self.income, amount)?;
        self.persist_income()
    }

    /// Returns the change applied to the income total.
    pub fn edit_income_entry(&mut self, index: usize, amount: f64) -> Result<f64> {
        let delta = IncomeService::edit_entry(&mut self.income, index, amount)?;
        self.persist_income()?;
        Ok(delta)
    }

    pub fn add_expense(&mut self, draft: ExpenseDraft) -> Result<i64> {
        let now = self.clock.now();
        let id = ExpenseService::add(&mut self.expenses, draft, now)?;
        self.expenses_changed()?;
        Ok(id)
    }

    pub fn update_expense(&mut self, id: i64, draft: ExpenseDraft) -> Result<()> {
        ExpenseService::update(&mut self.expenses, id, draft)?;
        self.expenses_changed()
    }

    pub fn delete_expense(&mut self, id: i64) -> Result<Expense> {
        let removed = ExpenseService::remove(&mut self.expenses, id)?;
        self.expenses_changed()?;
        Ok(removed)
    }

    pub fn set_spending_limit(&mut self, limit: f64) -> Result<()> {
        self.spending_limit = ExpenseService::validate_spending_limit(limit)?;
        save_json(&self.store, keys::SPENDING_LIMIT, &self.spending_limit)?;
        Ok(())
    }

    /// Appends a summary when the elapsed 30-day periods outnumber the stored ones.
    ///
    /// Returns whether a snapshot was appended.
    pub fn check_and_generate_summary(&mut self) -> Result<bool> {
        if self.expenses.is_empty() {
            return Ok(false);
        }
        let now = self.clock.now();
        if !SummaryService::should_generate(
            self.income.start_date,
            self.summary_history.len(),
            now,
        ) {
            return Ok(false);
        }
        self.push_summary(now)?;
        info!(count = self.summary_history.len(), "30-day summary generated");
        Ok(true)
    }

    /// Appends a summary unconditionally.
    pub fn generate_summary(&mut self) -> Result<&SummarySnapshot> {
        let now = self.clock.now();
        self.push_summary(now)?;
        self.summary_history
            .last()
            .ok_or_else(|| FinanceError::StorageError("summary history is empty".into()))
    }

    pub fn add_savings_goal(&mut self, goal: SavingsGoal) -> Result<i64> {
        let now = self.clock.now();
        let id = SavingsService::add(&mut self.savings_goals, goal, now)?;
        self.persist_goals()?;
        Ok(id)
    }

    pub fn edit_savings_goal(&mut self, id: i64, changes: SavingsGoal) -> Result<()> {
        SavingsService::edit(&mut self.savings_goals, id, changes)?;
        self.persist_goals()
    }

    pub fn delete_savings_goal(&mut self, id: i64) -> Result<SavingsGoal> {
        let removed = SavingsService::remove(&mut self.savings_goals, id)?;
        self.persist_goals()?;
        Ok(removed)
    }

    /// Returns the goal's new progress percentage.
    pub fn add_goal_progress(&mut self, id: i64, amount: f64) -> Result<f64> {
        let percent = SavingsService::add_progress(&mut self.savings_goals, id, amount)?;
        self.persist_goals()?;
        Ok(percent)
    }

    pub fn add_recurring(&mut self, item: RecurringExpense) -> Result<i64> {
        let now = self.clock.now();
        let id = RecurringService::add(&mut self.recurring, item, now)?;
        self.persist_recurring()?;
        Ok(id)
    }

    pub fn edit_recurring(&mut self, id: i64, changes: RecurringExpense) -> Result<()> {
        let today = self.clock.today();
        RecurringService::edit(&mut self.recurring, id, changes, today)?;
        self.persist_recurring()
    }

    pub fn delete_recurring(&mut self, id: i64) -> Result<RecurringExpense> {
        let removed = RecurringService::remove(&mut self.recurring, id)?;
        self.persist_recurring()?;
        Ok(removed)
    }

    /// Returns the new active state.
    pub fn toggle_recurring(&mut self, id: i64) -> Result<bool> {
        let active = RecurringService::toggle_active(&mut self.recurring, id)?;
        self.persist_recurring()?;
        Ok(active)
    }

    /// Records the payment as an expense and returns that expense's id.
    pub fn pay_recurring(&mut self, id: i64) -> Result<i64> {
        let now = self.clock.now();
        let expense_id =
            RecurringService::mark_paid(&mut self.recurring, &mut self.expenses, id, now)?;
        self.persist_recurring()?;
        self.expenses_changed()?;
        Ok(expense_id)
    }

    pub fn export_bundle(&self) -> ExportBundle {
        ExportBundle {
            income: self.income.clone(),
            expenses: self.expenses.clone(),
            spending_limit: self.spending_limit,
            summary_history: self.summary_history.clone(),
            export_date: Some(self.clock.now()),
        }
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export_bundle())?)
    }

    /// Replaces income, expenses, limit, and summaries with the bundle's contents.
    ///
    /// Goals and recurring items are left untouched. Nothing changes when parsing fails.
    pub fn import_json(&mut self, raw: &str) -> Result<()> {
        let bundle: ExportBundle = serde_json::from_str(raw)
            .map_err(|err| FinanceError::InvalidInput(format!("invalid backup file: {err}")))?;
        self.import_bundle(bundle)
    }

    pub fn import_bundle(&mut self, bundle: ExportBundle) -> Result<()> {
        let limit = sanitize_amount(bundle.spending_limit);
        self.income = bundle.income;
        self.expenses = bundle.expenses;
        self.spending_limit = if limit > 0.0 { limit } else { self.default_limit };
        self.summary_history = bundle.summary_history;
        self.persist_income()?;
        save_json(&self.store, keys::EXPENSES, &self.expenses)?;
        save_json(&self.store, keys::SPENDING_LIMIT, &self.spending_limit)?;
        save_json(&self.store, keys::SUMMARY_HISTORY, &self.summary_history)?;
        info!(expenses = self.expenses.len(), "backup imported");
        self.check_and_generate_summary()?;
        Ok(())
    }

    /// Wipes the store and resets every collection to its default.
    pub fn clear_all(&mut self) -> Result<()> {
        self.store.clear()?;
        self.income = Income::starting(self.clock.now());
        self.expenses.clear();
        self.spending_limit = self.default_limit;
        self.summary_history.clear();
        self.savings_goals.clear();
        self.recurring.clear();
        self.load_warnings.clear();
        self.persist_all()?;
        warn!("all finance data cleared");
        Ok(())
    }

    fn push_summary(&mut self, now: NaiveDateTime) -> Result<()> {
        let snapshot =
            SummaryService::generate(&self.income, &self.expenses, self.spending_limit, now);
        self.summary_history.push(snapshot);
        save_json(&self.store, keys::SUMMARY_HISTORY, &self.summary_history)?;
        Ok(())
    }

    fn expenses_changed(&mut self) -> Result<()> {
        save_json(&self.store, keys::EXPENSES, &self.expenses)?;
        self.check_and_generate_summary()?;
        Ok(())
    }

    fn persist_income(&self) -> Result<()> {
        save_json(&self.store, keys::INCOME, &self.income)?;
        Ok(())
    }

    fn persist_goals(&self) -> Result<()> {
        save_json(&self.store, keys::SAVINGS_GOALS, &self.savings_goals)?;
        Ok(())
    }

    fn persist_recurring(&self) -> Result<()> {
        save_json(&self.store, keys::RECURRING_EXPENSES, &self.recurring)?;
        Ok(())
    }

    fn persist_all(&self) -> Result<()> {
        self.persist_income()?;
        save_json(&self.store, keys::EXPENSES, &self.expenses)?;
        save_json(&self.store, keys::SPENDING_LIMIT, &self.spending_limit)?;
        save_json(&self.store, keys::SUMMARY_HISTORY, &self.summary_history)?;
        self.persist_goals()?;
        self.persist_recurring()
    }
}

fn load_or<S, T, F>(store: &S, key: &str, warnings: &mut Vec<String>, default: F) -> T
where
    S: KeyValueStore,
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match load_json(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => default(),
        Err(err) => {
            warn!(key, error = %err, "unreadable stored value; using default");
            warnings.push(format!("`{key}` could not be read ({err}); using default"));
            default()
        }
    }
}

fn limit_from_value(value: &Value) -> Option<f64> {
    let limit = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_amount(text),
        _ => None,
    }?;
    (limit.is_finite() && limit > 0.0).then_some(limit)
}
