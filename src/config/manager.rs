use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use super::{Config, ConfigError};

const BACKUP_EXTENSION: &str = "json";
const BACKUP_PREFIX: &str = "config";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";

/// Handles persistence and backup management for [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf, backups_dir: PathBuf) -> Self {
        Self {
            config_path,
            backups_dir,
        }
    }

    /// Lays out `<base>/config/config.json` and `<base>/config/backups/`.
    pub fn with_base_dir(base: &Path) -> Result<Self, ConfigError> {
        let config_dir = base.join("config");
        let backups_dir = config_dir.join("backups");
        fs::create_dir_all(&backups_dir)?;
        Ok(Self::new(config_dir.join("config.json"), backups_dir))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Reads the active configuration; a missing file yields defaults.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.config_path)?;
        serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
    }

    /// Like [`ConfigManager::load`], but an unreadable file is logged and replaced by defaults.
    pub fn load_or_default(&self) -> Config {
        self.load().unwrap_or_else(|err| {
            warn!(path = %self.config_path.display(), error = %err, "config unreadable; using defaults");
            Config::default()
        })
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        let tmp = tmp_path(&self.config_path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.config_path)?;
        Ok(())
    }

    /// Writes a timestamped copy of `config` and returns the backup file name.
    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<String, ConfigError> {
        let timestamp = Local::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let label = sanitize_note(note)
            .map(|label| format!("_{label}"))
            .unwrap_or_default();
        let mut sequence = 1;
        let name = loop {
            let candidate = if sequence == 1 {
                format!("{BACKUP_PREFIX}_{timestamp}{label}.{BACKUP_EXTENSION}")
            } else {
                format!("{BACKUP_PREFIX}_{timestamp}-{sequence}{label}.{BACKUP_EXTENSION}")
            };
            if !self.backups_dir.join(&candidate).exists() {
                break candidate;
            }
            sequence += 1;
        };
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        write_atomic(&self.backups_dir.join(&name), &json)?;
        info!(backup = %name, "configuration backup written");
        Ok(name)
    }

    /// Reads backup `backup_name`; the caller decides whether to save it as active.
    pub fn restore(&self, backup_name: &str) -> Result<Config, ConfigError> {
        let path = self.backups_dir.join(backup_name);
        if backup_name.contains(['/', '\\']) || !path.exists() {
            return Err(ConfigError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("configuration backup `{backup_name}` not found"),
            )));
        }
        let data = fs::read_to_string(&path)?;
        serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
    }

    /// Backup file names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>, ConfigError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by_key(|name| Reverse((parse_timestamp(name), parse_sequence(name))));
        Ok(entries)
    }
}

fn sanitize_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_timestamp(name: &str) -> Option<NaiveDateTime> {
    let rest = name
        .strip_suffix(&format!(".{BACKUP_EXTENSION}"))?
        .strip_prefix(&format!("{BACKUP_PREFIX}_"))?;
    let stamp = rest.get(..13)?;
    NaiveDateTime::parse_from_str(stamp, BACKUP_TIMESTAMP_FORMAT).ok()
}

/// Backups written within the same minute carry `-<n>` right after the timestamp.
fn parse_sequence(name: &str) -> u32 {
    name.strip_prefix(&format!("{BACKUP_PREFIX}_"))
        .and_then(|rest| rest.get(13..))
        .and_then(|rest| rest.strip_prefix('-'))
        .and_then(|rest| {
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        })
        .unwrap_or(1)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_notes() {
        assert_eq!(sanitize_note(Some("Pre Import.v2")).as_deref(), Some("pre-import-v2"));
        assert_eq!(sanitize_note(Some("***")), None);
    }

    #[test]
    fn parses_backup_names() {
        let parsed = parse_timestamp("config_20240301_0915_pre-import.json").unwrap();
        assert_eq!(parsed.to_string(), "2024-03-01 09:15:00");
        assert!(parse_timestamp("notes.json").is_none());
    }

    #[test]
    fn newest_backup_listed_first() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
        for name in ["config_20240101_0900.json", "config_20240301_0900.json"] {
            fs::write(manager.backups_dir().join(name), "{}").unwrap();
        }
        assert_eq!(
            manager.list_backups().unwrap(),
            vec!["config_20240301_0900.json", "config_20240101_0900.json"]
        );
    }

    #[test]
    fn repeated_backups_do_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
        let mut config = Config::default();
        let first = manager.backup(&config, Some("setup")).unwrap();
        config.currency_symbol = "$".into();
        let second = manager.backup(&config, Some("setup")).unwrap();
        assert_ne!(first, second);
        assert_eq!(manager.list_backups().unwrap().len(), 2);
        assert_eq!(manager.restore(&first).unwrap().currency_symbol, "₹");
        assert_eq!(parse_sequence("config_20240301_0915-2_setup.json"), 2);
    }
}
