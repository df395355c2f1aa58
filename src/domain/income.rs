//! Income totals and their deposit history.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::common::{lenient_amount, lenient_timestamp, sanitize_amount, Amounted};

const CONSISTENCY_EPSILON: f64 = 1e-6;

/// Running income total plus the deposits that produced it.
///
/// `amount` is stored rather than derived; add and edit operations keep it equal to the
/// sum of `history`. Only an explicit total override may break that equality.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub start_date: NaiveDateTime,
    #[serde(default)]
    pub history: Vec<IncomeEntry>,
}

impl Income {
    pub fn starting(start_date: NaiveDateTime) -> Self {
        Self {
            amount: 0.0,
            start_date,
            history: Vec::new(),
        }
    }

    /// Sum of every history entry, recomputed from scratch.
    pub fn derived_amount(&self) -> f64 {
        self.history.iter().map(Amounted::amount).sum()
    }

    pub fn is_consistent(&self) -> bool {
        (Amounted::amount(self) - self.derived_amount()).abs() < CONSISTENCY_EPSILON
    }
}

impl Amounted for Income {
    fn amount(&self) -> f64 {
        sanitize_amount(self.amount)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncomeEntry {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub date: NaiveDateTime,
}

impl Amounted for IncomeEntry {
    fn amount(&self) -> f64 {
        sanitize_amount(self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn derived_amount_sums_history() {
        let mut income = Income::starting(at(1));
        income.history.push(IncomeEntry {
            amount: 1000.0,
            date: at(1),
        });
        income.history.push(IncomeEntry {
            amount: 250.0,
            date: at(2),
        });
        income.amount = 1250.0;
        assert_eq!(income.derived_amount(), 1250.0);
        assert!(income.is_consistent());

        income.amount = 900.0;
        assert!(!income.is_consistent());
    }

    #[test]
    fn reads_camel_case_layout() {
        let json = r#"{"amount": 500, "startDate": "2024-05-01T00:00:00", "history": [{"amount": 500, "date": "2024-05-01T00:00:00"}]}"#;
        let income: Income = serde_json::from_str(json).expect("income");
        assert_eq!(income.history.len(), 1);
        assert!(income.is_consistent());
    }
}
