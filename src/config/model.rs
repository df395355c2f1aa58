use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::domain::parse_amount;

/// Stores user-configurable preferences for the tracker and CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "Config::default_spending_limit_value")]
    pub default_spending_limit: f64,
    #[serde(default = "Config::default_insight_cache_ttl")]
    pub insight_cache_ttl_secs: u64,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default)]
    pub ai: AiSettings,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for stored finance data. Defaults to `<app dir>/data`.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-IN".into(),
            currency: "INR".into(),
            currency_symbol: Self::default_currency_symbol(),
            default_spending_limit: Self::default_spending_limit_value(),
            insight_cache_ttl_secs: Self::default_insight_cache_ttl(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            ai: AiSettings::default(),
            data_dir: None,
        }
    }
}

impl Config {
    /// Keys accepted by [`Config::set`], in display order.
    pub const KEYS: [&'static str; 10] = [
        "locale",
        "currency",
        "currency_symbol",
        "default_spending_limit",
        "insight_cache_ttl_secs",
        "ui_color_enabled",
        "ai.temperature",
        "ai.max_tokens",
        "ai.providers",
        "data_dir",
    ];

    pub fn default_currency_symbol() -> String {
        "₹".into()
    }

    pub fn default_spending_limit_value() -> f64 {
        200.0
    }

    pub fn default_insight_cache_ttl() -> u64 {
        3600
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Directory holding the key/value store, relative to the application directory.
    pub fn resolve_data_dir(&self, app_dir: &std::path::Path) -> PathBuf {
        match &self.data_dir {
            Some(path) => path.clone(),
            None => app_dir.join("data"),
        }
    }

    /// Formats `amount` with the configured currency symbol and two decimals.
    pub fn format_amount(&self, amount: f64) -> String {
        if amount < 0.0 {
            format!("-{}{:.2}", self.currency_symbol, amount.abs())
        } else {
            format!("{}{:.2}", self.currency_symbol, amount)
        }
    }

    /// Current value of `key` rendered as text.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "locale" => self.locale.clone(),
            "currency" => self.currency.clone(),
            "currency_symbol" => self.currency_symbol.clone(),
            "default_spending_limit" => format!("{:.2}", self.default_spending_limit),
            "insight_cache_ttl_secs" => self.insight_cache_ttl_secs.to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "ai.temperature" => format!("{:.2}", self.ai.temperature),
            "ai.max_tokens" => self.ai.max_tokens.to_string(),
            "ai.providers" => self.ai.providers.join(","),
            "data_dir" => self
                .data_dir
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "(default)".into()),
            other => return Err(unknown_key(other)),
        };
        Ok(value)
    }

    /// Parses `value` and assigns it to `key`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "locale" => self.locale = non_empty(key, value)?,
            "currency" => self.currency = non_empty(key, value)?.to_ascii_uppercase(),
            "currency_symbol" => self.currency_symbol = non_empty(key, value)?,
            "default_spending_limit" => {
                self.default_spending_limit = parse_amount(value)
                    .filter(|limit| *limit > 0.0)
                    .ok_or_else(|| invalid(key, "a positive number"))?;
            }
            "insight_cache_ttl_secs" => {
                self.insight_cache_ttl_secs = value
                    .parse()
                    .map_err(|_| invalid(key, "a whole number of seconds"))?;
            }
            "ui_color_enabled" => self.ui_color_enabled = parse_flag(key, value)?,
            "ai.temperature" => {
                self.ai.temperature = value
                    .parse::<f32>()
                    .ok()
                    .filter(|temp| (0.0..=2.0).contains(temp))
                    .ok_or_else(|| invalid(key, "a number between 0 and 2"))?;
            }
            "ai.max_tokens" => {
                self.ai.max_tokens = value
                    .parse::<u32>()
                    .ok()
                    .filter(|tokens| *tokens > 0)
                    .ok_or_else(|| invalid(key, "a positive whole number"))?;
            }
            "ai.providers" => {
                self.ai.providers = value
                    .split(',')
                    .map(|name| name.trim().to_ascii_lowercase())
                    .filter(|name| !name.is_empty())
                    .collect();
            }
            "data_dir" => {
                self.data_dir = match value {
                    "" | "default" => None,
                    path => Some(PathBuf::from(path)),
                };
            }
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }
}

/// Generation settings handed to every insight provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiSettings {
    #[serde(default = "AiSettings::default_temperature")]
    pub temperature: f32,
    #[serde(default = "AiSettings::default_max_tokens")]
    pub max_tokens: u32,
    /// Provider names in the order they should be tried.
    #[serde(default = "AiSettings::default_providers")]
    pub providers: Vec<String>,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            temperature: Self::default_temperature(),
            max_tokens: Self::default_max_tokens(),
            providers: Self::default_providers(),
        }
    }
}

impl AiSettings {
    pub fn default_temperature() -> f32 {
        0.7
    }

    pub fn default_max_tokens() -> u32 {
        1024
    }

    pub fn default_providers() -> Vec<String> {
        vec!["gemini".into(), "groq".into()]
    }
}

fn non_empty(key: &str, value: &str) -> Result<String, ConfigError> {
    if value.is_empty() {
        Err(invalid(key, "a non-empty value"))
    } else {
        Ok(value.to_string())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(invalid(key, "on or off")),
    }
}

fn invalid(key: &str, expected: &str) -> ConfigError {
    ConfigError::Invalid(format!("`{key}` expects {expected}"))
}

fn unknown_key(key: &str) -> ConfigError {
    ConfigError::Invalid(format!(
        "unknown setting `{key}` (expected one of: {})",
        Config::KEYS.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: Config =
            serde_json::from_str(r#"{"locale":"en-GB","currency":"GBP"}"#).unwrap();
        assert_eq!(config.currency_symbol, "₹");
        assert_eq!(config.default_spending_limit, 200.0);
        assert_eq!(config.insight_cache_ttl_secs, 3600);
        assert_eq!(config.ai, AiSettings::default());
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn set_validates_values() {
        let mut config = Config::default();
        config.set("default_spending_limit", "350").unwrap();
        config.set("ai.providers", "Groq, gemini").unwrap();
        config.set("ui_color_enabled", "off").unwrap();
        assert_eq!(config.default_spending_limit, 350.0);
        assert_eq!(config.ai.providers, vec!["groq", "gemini"]);
        assert!(!config.ui_color_enabled);

        assert!(matches!(
            config.set("default_spending_limit", "-1"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(config.set("ai.temperature", "9"), Err(ConfigError::Invalid(_))));
        assert!(matches!(config.set("theme", "dark"), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn every_key_is_readable() {
        let config = Config::default();
        for key in Config::KEYS {
            assert!(config.get(key).is_ok(), "{key}");
        }
        assert_eq!(config.format_amount(-12.5), "-₹12.50");
    }
}
