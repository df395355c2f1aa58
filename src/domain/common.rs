//! Shared traits and lenient decoding helpers for persisted finance records.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{de::Error as DeError, Deserialize, Deserializer};
use serde_json::Value;

/// Exposes the stable numeric identifier of a stored record.
pub trait Identifiable {
    fn id(&self) -> i64;
}

/// Supplies the coerced amount used by every reducer.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Converts a record into a one-line, user-facing label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Maps NaN and infinities to zero so sums never poison.
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Parses user supplied text into a finite amount.
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Accepts numbers, numeric strings, `null`, or garbage; anything non-numeric reads as `0.0`.
pub fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_f64().map(sanitize_amount).unwrap_or(0.0),
        Some(Value::String(text)) => parse_amount(&text).unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Parses a wall-clock timestamp from any of the layouts the store has held.
///
/// Accepted forms: naive ISO-8601 (`2024-03-01T09:30:00`), RFC 3339 with an offset
/// (converted to local wall-clock time), and a bare date (midnight).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(naive) = raw.parse::<NaiveDateTime>() {
        return Some(naive);
    }
    if let Ok(aware) = DateTime::parse_from_rfc3339(raw) {
        return Some(aware.with_timezone(&Local).naive_local());
    }
    raw.parse::<NaiveDate>()
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp `{raw}`")))
}

/// Like [`lenient_timestamp`], but `null`, absent, and blank values read as `None`.
pub fn lenient_optional_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp `{raw}`"))),
        _ => Ok(None),
    }
}

/// Calendar day from a bare date or any full timestamp layout.
pub fn lenient_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_timestamp(deserializer).map(|timestamp| timestamp.date())
}

/// Optional calendar day; an empty form field (`""`) means no date was chosen.
pub fn lenient_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_optional_timestamp(deserializer).map(|timestamp| timestamp.map(|value| value.date()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "lenient_amount")]
        amount: f64,
    }

    fn decoded_amount(json: &str) -> f64 {
        serde_json::from_str::<Holder>(json).expect("amount holder").amount
    }

    #[test]
    fn lenient_amount_coerces_non_numeric_values_to_zero() {
        assert_eq!(decoded_amount(r#"{"amount": 12.5}"#), 12.5);
        assert_eq!(decoded_amount(r#"{"amount": "40"}"#), 40.0);
        assert_eq!(decoded_amount(r#"{"amount": "abc"}"#), 0.0);
        assert_eq!(decoded_amount(r#"{"amount": null}"#), 0.0);
        assert_eq!(decoded_amount(r#"{}"#), 0.0);
        assert_eq!(decoded_amount(r#"{"amount": [1]}"#), 0.0);
    }

    #[test]
    fn parse_timestamp_accepts_naive_and_date_only() {
        let naive = parse_timestamp("2024-03-01T09:30:00").expect("naive");
        assert_eq!(naive.to_string(), "2024-03-01 09:30:00");
        let date_only = parse_timestamp("2024-03-01").expect("date");
        assert_eq!(date_only.to_string(), "2024-03-01 00:00:00");
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn parse_timestamp_accepts_rfc3339() {
        assert!(parse_timestamp("2024-03-01T09:30:00.000Z").is_some());
    }

    #[derive(Deserialize)]
    struct Dated {
        #[serde(default, deserialize_with = "lenient_optional_date")]
        deadline: Option<NaiveDate>,
        #[serde(default, deserialize_with = "lenient_optional_timestamp")]
        stamped: Option<NaiveDateTime>,
    }

    fn dated(json: &str) -> Dated {
        serde_json::from_str(json).expect("dated")
    }

    #[test]
    fn optional_dates_treat_blank_as_missing() {
        assert_eq!(dated(r#"{"deadline": ""}"#).deadline, None);
        assert_eq!(dated(r#"{"deadline": null}"#).deadline, None);
        assert_eq!(dated(r#"{}"#).stamped, None);
        assert_eq!(
            dated(r#"{"deadline": "2024-12-31"}"#).deadline,
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
        assert!(dated(r#"{"stamped": "2024-05-20T10:00:00.000Z"}"#).stamped.is_some());
        assert!(serde_json::from_str::<Dated>(r#"{"deadline": "someday"}"#).is_err());
    }

    #[test]
    fn sanitize_amount_drops_non_finite() {
        assert_eq!(sanitize_amount(f64::NAN), 0.0);
        assert_eq!(sanitize_amount(f64::INFINITY), 0.0);
        assert_eq!(sanitize_amount(-3.5), -3.5);
    }
}
