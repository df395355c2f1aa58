//! Individual spending records.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use super::category::ExpenseCategory;
use super::common::{lenient_amount, lenient_timestamp, sanitize_amount, Amounted, Displayable, Identifiable};

/// A single expense. `id` is the creation timestamp in milliseconds and survives edits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(default)]
    pub category: ExpenseCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub date: NaiveDateTime,
}

impl Expense {
    pub fn new(id: i64, amount: f64, category: ExpenseCategory, date: NaiveDateTime) -> Self {
        Self {
            id,
            amount,
            category,
            description: None,
            date,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let text = description.into();
        self.description = if text.trim().is_empty() {
            None
        } else {
            Some(text)
        };
        self
    }

    /// Calendar day the expense falls on; time-of-day is ignored.
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }

    pub fn hour(&self) -> u32 {
        self.date.hour()
    }

    pub fn description_or_default(&self) -> &str {
        self.description.as_deref().unwrap_or("No description")
    }
}

impl Identifiable for Expense {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Amounted for Expense {
    fn amount(&self) -> f64 {
        sanitize_amount(self.amount)
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        format!(
            "{:.2} {} on {} - {}",
            Amounted::amount(self),
            self.category,
            self.day(),
            self.description_or_default()
        )
    }
}

/// User input for creating or replacing an expense.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub amount: f64,
    pub category: ExpenseCategory,
    pub description: Option<String>,
    /// Defaults to the current time when absent.
    pub date: Option<NaiveDateTime>,
}

impl ExpenseDraft {
    pub fn new(amount: f64, category: ExpenseCategory) -> Self {
        Self {
            amount,
            category,
            description: None,
            date: None,
        }
    }

    pub fn on(mut self, date: NaiveDateTime) -> Self {
        self.date = Some(date);
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_legacy_layout_with_string_amount() {
        let json = r#"{
            "id": 1700000000000,
            "amount": "250.5",
            "category": "Food",
            "description": "Lunch",
            "date": "2024-01-15T13:05:00"
        }"#;
        let expense: Expense = serde_json::from_str(json).expect("expense");
        assert_eq!(Amounted::amount(&expense), 250.5);
        assert_eq!(expense.category, ExpenseCategory::Food);
        assert_eq!(expense.hour(), 13);
        assert_eq!(expense.day(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn missing_amount_and_category_use_fallbacks() {
        let json = r#"{"id": 1, "date": "2024-01-15"}"#;
        let expense: Expense = serde_json::from_str(json).expect("expense");
        assert_eq!(Amounted::amount(&expense), 0.0);
        assert_eq!(expense.category, ExpenseCategory::Other);
        assert_eq!(expense.description_or_default(), "No description");
    }

    #[test]
    fn blank_description_is_dropped() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let expense = Expense::new(1, 5.0, ExpenseCategory::Bills, date).with_description("  ");
        assert!(expense.description.is_none());
    }
}
