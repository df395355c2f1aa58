//! Business logic helpers for managing expenses and the daily spending limit.

use chrono::NaiveDateTime;

use crate::core::errors::FinanceError;
use crate::domain::{Expense, ExpenseDraft};

use super::{next_record_id, position_by_id, require_positive, ServiceResult};

/// Provides validated CRUD helpers for the expense list.
pub struct ExpenseService;

impl ExpenseService {
    /// Appends a new expense and returns its identifier.
    pub fn add(
        expenses: &mut Vec<Expense>,
        draft: ExpenseDraft,
        now: NaiveDateTime,
    ) -> ServiceResult<i64> {
        let amount = require_positive(draft.amount, "Expense amount")?;
        let id = next_record_id(expenses.iter().map(|expense| expense.id), now);
        let mut expense = Expense::new(id, amount, draft.category, draft.date.unwrap_or(now));
        if let Some(description) = draft.description {
            expense = expense.with_description(description);
        }
        expenses.push(expense);
        Ok(id)
    }

    /// Replaces the fields of expense `id`; the id is retained and a missing date keeps the old one.
    pub fn update(expenses: &mut [Expense], id: i64, draft: ExpenseDraft) -> ServiceResult<()> {
        let amount = require_positive(draft.amount, "Expense amount")?;
        let expense = expenses
            .iter_mut()
            .find(|expense| expense.id == id)
            .ok_or(FinanceError::ExpenseNotFound(id))?;
        expense.amount = amount;
        expense.category = draft.category;
        expense.description = draft
            .description
            .filter(|description| !description.trim().is_empty());
        if let Some(date) = draft.date {
            expense.date = date;
        }
        Ok(())
    }

    /// Removes expense `id`, returning the removed instance.
    pub fn remove(expenses: &mut Vec<Expense>, id: i64) -> ServiceResult<Expense> {
        let position = position_by_id(expenses, id).ok_or(FinanceError::ExpenseNotFound(id))?;
        Ok(expenses.remove(position))
    }

    pub fn find(expenses: &[Expense], id: i64) -> Option<&Expense> {
        expenses.iter().find(|expense| expense.id == id)
    }

    pub fn validate_spending_limit(limit: f64) -> ServiceResult<f64> {
        require_positive(limit, "Spending limit")
    }
}
