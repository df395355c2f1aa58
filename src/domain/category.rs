//! Expense categories.

use std::fmt;

use serde::{
    de::{self, Deserializer, Visitor},
    Deserialize, Serialize, Serializer,
};

/// Closed set of spending categories. Unknown labels collapse into [`ExpenseCategory::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ExpenseCategory {
    Food,
    Travel,
    Shopping,
    Entertainment,
    Bills,
    #[default]
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 6] = [
        ExpenseCategory::Food,
        ExpenseCategory::Travel,
        ExpenseCategory::Shopping,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Bills,
        ExpenseCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Travel => "Travel",
            ExpenseCategory::Shopping => "Shopping",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::Bills => "Bills",
            ExpenseCategory::Other => "Other",
        }
    }

    /// Case-insensitive lookup that returns `None` for unknown labels.
    pub fn try_from_label(value: &str) -> Option<Self> {
        let needle = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(needle))
    }

    /// Case-insensitive lookup falling back to `Other`.
    pub fn from_label(value: &str) -> Self {
        Self::try_from_label(value).unwrap_or_default()
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ExpenseCategory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

struct CategoryVisitor;

impl<'de> Visitor<'de> for CategoryVisitor {
    type Value = ExpenseCategory;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a category label")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(ExpenseCategory::from_label(value))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ExpenseCategory::Other)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ExpenseCategory::Other)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_i64<E: de::Error>(self, _value: i64) -> Result<Self::Value, E> {
        Ok(ExpenseCategory::Other)
    }

    fn visit_u64<E: de::Error>(self, _value: u64) -> Result<Self::Value, E> {
        Ok(ExpenseCategory::Other)
    }

    fn visit_f64<E: de::Error>(self, _value: f64) -> Result<Self::Value, E> {
        Ok(ExpenseCategory::Other)
    }

    fn visit_bool<E: de::Error>(self, _value: bool) -> Result<Self::Value, E> {
        Ok(ExpenseCategory::Other)
    }
}

impl<'de> Deserialize<'de> for ExpenseCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(CategoryVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!(ExpenseCategory::from_label("food"), ExpenseCategory::Food);
        assert_eq!(ExpenseCategory::from_label(" BILLS "), ExpenseCategory::Bills);
        assert_eq!(ExpenseCategory::from_label("Groceries"), ExpenseCategory::Other);
        assert!(ExpenseCategory::try_from_label("Groceries").is_none());
    }

    #[test]
    fn unknown_or_null_values_deserialize_to_other() {
        let parsed: Vec<ExpenseCategory> =
            serde_json::from_str(r#"["Travel", "Pets", null, 3]"#).expect("parse");
        assert_eq!(
            parsed,
            vec![
                ExpenseCategory::Travel,
                ExpenseCategory::Other,
                ExpenseCategory::Other,
                ExpenseCategory::Other
            ]
        );
    }

    #[test]
    fn categories_work_as_json_map_keys() {
        let mut totals = BTreeMap::new();
        totals.insert(ExpenseCategory::Shopping, 12.0);
        let json = serde_json::to_string(&totals).expect("serialize");
        assert_eq!(json, r#"{"Shopping":12.0}"#);
        let back: BTreeMap<ExpenseCategory, f64> = serde_json::from_str(&json).expect("parse");
        assert_eq!(back, totals);
    }
}
