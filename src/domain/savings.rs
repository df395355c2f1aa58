//! Savings goals tracked alongside spending.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::common::{lenient_amount, lenient_optional_date, Displayable, Identifiable};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl GoalPriority {
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(GoalPriority::Low),
            "medium" => Some(GoalPriority::Medium),
            "high" => Some(GoalPriority::High),
            _ => None,
        }
    }
}

impl fmt::Display for GoalPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GoalPriority::Low => "low",
            GoalPriority::Medium => "medium",
            GoalPriority::High => "high",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub target_amount: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub current_amount: f64,
    #[serde(
        default,
        deserialize_with = "lenient_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub priority: GoalPriority,
}

impl SavingsGoal {
    pub fn new(id: i64, name: impl Into<String>, target_amount: f64) -> Self {
        Self {
            id,
            name: name.into(),
            target_amount,
            current_amount: 0.0,
            deadline: None,
            priority: GoalPriority::default(),
        }
    }

    /// Percentage of the target saved so far; zero when the target is not positive.
    pub fn progress_percent(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        self.current_amount / self.target_amount * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.target_amount > 0.0 && self.current_amount >= self.target_amount
    }

    pub fn remaining(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }
}

impl Identifiable for SavingsGoal {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Displayable for SavingsGoal {
    fn display_label(&self) -> String {
        format!(
            "{} ({:.0}% of {:.2}, {} priority)",
            self.name,
            self.progress_percent(),
            self.target_amount,
            self.priority
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_handles_zero_target() {
        let goal = SavingsGoal::new(1, "Nothing", 0.0);
        assert_eq!(goal.progress_percent(), 0.0);
        assert!(!goal.is_complete());
    }

    #[test]
    fn progress_reports_percentage_and_completion() {
        let mut goal = SavingsGoal::new(1, "Laptop", 800.0);
        goal.current_amount = 200.0;
        assert_eq!(goal.progress_percent(), 25.0);
        assert_eq!(goal.remaining(), 600.0);
        goal.current_amount = 900.0;
        assert!(goal.is_complete());
        assert_eq!(goal.remaining(), 0.0);
    }

    #[test]
    fn priority_parses_labels() {
        assert_eq!(GoalPriority::from_label("HIGH"), Some(GoalPriority::High));
        assert_eq!(GoalPriority::from_label("urgent"), None);
    }
}
