//! Recurring bills: scheduling, pausing, and settling them into the expense list.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use crate::core::errors::FinanceError;
use crate::domain::{Expense, ExpenseDraft, RecurringExpense};

use super::{next_record_id, position_by_id, require_positive, ExpenseService, ServiceResult};

pub struct RecurringService;

impl RecurringService {
    /// Stores a new recurring item with its next due date rolled forward to `now`.
    pub fn add(
        items: &mut Vec<RecurringExpense>,
        mut item: RecurringExpense,
        now: NaiveDateTime,
    ) -> ServiceResult<i64> {
        Self::validate(&item)?;
        item.id = next_record_id(items.iter().map(|existing| existing.id), now);
        item.next_due_date = item.frequency.next_due_from(item.start_date, now.date());
        let id = item.id;
        items.push(item);
        Ok(id)
    }

    pub fn edit(
        items: &mut [RecurringExpense],
        id: i64,
        changes: RecurringExpense,
        today: NaiveDate,
    ) -> ServiceResult<()> {
        Self::validate(&changes)?;
        let item = Self::find_mut(items, id)?;
        let next_due_date = changes.frequency.next_due_from(changes.start_date, today);
        *item = RecurringExpense {
            id,
            next_due_date,
            ..changes
        };
        Ok(())
    }

    pub fn remove(items: &mut Vec<RecurringExpense>, id: i64) -> ServiceResult<RecurringExpense> {
        let position = position_by_id(items, id).ok_or(FinanceError::RecurringNotFound(id))?;
        Ok(items.remove(position))
    }

    /// Flips the active flag and returns the new state.
    pub fn toggle_active(items: &mut [RecurringExpense], id: i64) -> ServiceResult<bool> {
        let item = Self::find_mut(items, id)?;
        item.is_active = !item.is_active;
        Ok(item.is_active)
    }

    /// Records a payment as a regular expense dated `now` and advances the due date one period.
    ///
    /// Returns the id of the created expense.
    pub fn mark_paid(
        items: &mut [RecurringExpense],
        expenses: &mut Vec<Expense>,
        id: i64,
        now: NaiveDateTime,
    ) -> ServiceResult<i64> {
        let item = Self::find_mut(items, id)?;
        let draft = ExpenseDraft::new(item.amount, item.category)
            .on(now)
            .described(format!("{} (Recurring)", item.name));
        let expense_id = ExpenseService::add(expenses, draft, now)?;
        item.next_due_date = item.frequency.advance(item.next_due_date);
        info!(recurring = item.id, next_due = %item.next_due_date, "recurring expense paid");
        Ok(expense_id)
    }

    /// Estimated monthly cost of every active item.
    pub fn monthly_total(items: &[RecurringExpense]) -> f64 {
        items
            .iter()
            .filter(|item| item.is_active)
            .map(RecurringExpense::monthly_cost)
            .sum()
    }

    /// Active items inside their reminder window, soonest first.
    pub fn due_soon(items: &[RecurringExpense], today: NaiveDate) -> Vec<&RecurringExpense> {
        let mut due: Vec<_> = items
            .iter()
            .filter(|item| item.needs_reminder(today))
            .collect();
        due.sort_by_key(|item| item.next_due_date);
        due
    }

    fn find_mut(items: &mut [RecurringExpense], id: i64) -> ServiceResult<&mut RecurringExpense> {
        items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(FinanceError::RecurringNotFound(id))
    }

    fn validate(item: &RecurringExpense) -> ServiceResult<()> {
        if item.name.trim().is_empty() {
            return Err(FinanceError::InvalidInput(
                "Recurring expense name cannot be empty".into(),
            ));
        }
        require_positive(item.amount, "Recurring amount")?;
        Ok(())
    }
}
