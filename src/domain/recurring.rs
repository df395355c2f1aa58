//! Bills and subscriptions that repeat on a fixed cadence.

use std::fmt;

use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::category::ExpenseCategory;
use super::common::{lenient_amount, lenient_date, Displayable, Identifiable};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(Frequency::Daily),
            "weekly" => Some(Frequency::Weekly),
            "monthly" => Some(Frequency::Monthly),
            "yearly" => Some(Frequency::Yearly),
            _ => None,
        }
    }

    /// Moves `date` forward by one period. Month arithmetic clamps to the last valid day.
    pub fn advance(self, date: NaiveDate) -> NaiveDate {
        match self {
            Frequency::Daily => date + Duration::days(1),
            Frequency::Weekly => date + Duration::weeks(1),
            Frequency::Monthly => date
                .checked_add_months(Months::new(1))
                .unwrap_or(NaiveDate::MAX),
            Frequency::Yearly => date
                .checked_add_months(Months::new(12))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    /// First occurrence on or after `today`, stepping from `start`.
    pub fn next_due_from(self, start: NaiveDate, today: NaiveDate) -> NaiveDate {
        let mut due = start;
        while due < today {
            let next = self.advance(due);
            if next == due {
                break;
            }
            due = next;
        }
        due
    }

    /// Approximate cost per month of one occurrence of `amount`.
    pub fn monthly_equivalent(self, amount: f64) -> f64 {
        match self {
            Frequency::Daily => amount * 30.0,
            Frequency::Weekly => amount * 4.0,
            Frequency::Monthly => amount,
            Frequency::Yearly => amount / 12.0,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecurringExpense {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(default)]
    pub category: ExpenseCategory,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(deserialize_with = "lenient_date")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "lenient_date")]
    pub next_due_date: NaiveDate,
    #[serde(default = "default_remind_days", deserialize_with = "lenient_remind_days")]
    pub remind_days_before: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_remind_days() -> u32 {
    3
}

/// A blank reminder field is stored as `null`; that and any non-count value mean the default.
fn lenient_remind_days<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let days = match value {
        Some(Value::Number(number)) => number.as_u64(),
        Some(Value::String(text)) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(days
        .and_then(|days| u32::try_from(days).ok())
        .unwrap_or_else(default_remind_days))
}

fn default_active() -> bool {
    true
}

impl RecurringExpense {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        amount: f64,
        frequency: Frequency,
        start_date: NaiveDate,
        today: NaiveDate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            amount,
            category: ExpenseCategory::Bills,
            frequency,
            start_date,
            next_due_date: frequency.next_due_from(start_date, today),
            remind_days_before: default_remind_days(),
            is_active: true,
        }
    }

    /// Negative once the due date has passed.
    pub fn days_until_due(&self, today: NaiveDate) -> i64 {
        (self.next_due_date - today).num_days()
    }

    pub fn needs_reminder(&self, today: NaiveDate) -> bool {
        self.is_active && self.days_until_due(today) <= i64::from(self.remind_days_before)
    }

    pub fn monthly_cost(&self) -> f64 {
        self.frequency.monthly_equivalent(self.amount)
    }
}

impl Identifiable for RecurringExpense {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Displayable for RecurringExpense {
    fn display_label(&self) -> String {
        format!(
            "{} - {:.2} {} (next {}){}",
            self.name,
            self.amount,
            self.frequency,
            self.next_due_date,
            if self.is_active { "" } else { " [paused]" }
        )
    }
}
