//! Validated mutations of the income record.

use chrono::NaiveDateTime;
use tracing::info;

use crate::core::errors::FinanceError;
use crate::domain::{Income, IncomeEntry};

use super::{require_positive, ServiceResult};

pub struct IncomeService;

impl IncomeService {
    /// Appends a deposit and raises the running total by the same amount.
    pub fn add(income: &mut Income, amount: f64, at: NaiveDateTime) -> ServiceResult<()> {
        let amount = require_positive(amount, "Income amount")?;
        income.history.push(IncomeEntry { amount, date: at });
        income.amount += amount;
        info!(amount, total = income.amount, "income added");
        Ok(())
    }

    /// Overrides the running total without touching history.
    ///
    /// This is the one operation that may leave `amount` out of step with `history`.
    pub fn set_total(income: &mut Income, amount: f64) -> ServiceResult<()> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(FinanceError::InvalidInput(
                "Income total must be zero or a positive number".into(),
            ));
        }
        income.amount = amount;
        Ok(())
    }

    /// Rewrites one history entry and shifts the total by the difference. Returns the delta.
    pub fn edit_entry(income: &mut Income, index: usize, amount: f64) -> ServiceResult<f64> {
        let amount = require_positive(amount, "Income amount")?;
        let entry = income
            .history
            .get_mut(index)
            .ok_or(FinanceError::IncomeEntryNotFound(index))?;
        let delta = amount - entry.amount;
        entry.amount = amount;
        income.amount += delta;
        Ok(delta)
    }
}
