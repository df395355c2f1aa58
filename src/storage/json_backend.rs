//! Filesystem-backed store: one `<key>.json` file per key plus whole-store snapshots.

use std::{
    cmp::Reverse,
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use super::{validate_key, KeyValueStore, Result, StoreError};

const VALUE_EXTENSION: &str = "json";
const SNAPSHOT_PREFIX: &str = "snapshot";
const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    values_dir: PathBuf,
    snapshots_dir: PathBuf,
    retention: usize,
}

impl JsonFileStore {
    /// Opens (and creates when missing) a store rooted at `base`.
    pub fn open(base: &Path) -> Result<Self> {
        Self::with_retention(base, DEFAULT_RETENTION)
    }

    pub fn with_retention(base: &Path, retention: usize) -> Result<Self> {
        let values_dir = base.join("values");
        let snapshots_dir = base.join("snapshots");
        fs::create_dir_all(&values_dir)?;
        fs::create_dir_all(&snapshots_dir)?;
        Ok(Self {
            values_dir,
            snapshots_dir,
            retention: retention.max(1),
        })
    }

    pub fn value_path(&self, key: &str) -> PathBuf {
        self.values_dir.join(format!("{key}.{VALUE_EXTENSION}"))
    }

    /// Writes every key into a single timestamped snapshot file and prunes old ones.
    pub fn snapshot(&self, note: Option<&str>, at: NaiveDateTime) -> Result<String> {
        let mut contents = BTreeMap::new();
        for key in self.keys()? {
            if let Some(value) = self.get(&key)? {
                contents.insert(key, value);
            }
        }
        let stem = format!("{}_{}", SNAPSHOT_PREFIX, at.format(SNAPSHOT_TIMESTAMP_FORMAT));
        let label = sanitize_note(note)
            .map(|label| format!("_{label}"))
            .unwrap_or_default();
        let mut sequence = 1;
        let name = loop {
            let candidate = if sequence == 1 {
                format!("{stem}{label}.{VALUE_EXTENSION}")
            } else {
                format!("{stem}-{sequence}{label}.{VALUE_EXTENSION}")
            };
            if !self.snapshots_dir.join(&candidate).exists() {
                break candidate;
            }
            sequence += 1;
        };
        let json = serde_json::to_string_pretty(&contents).map_err(|err| StoreError::Serde {
            key: name.clone(),
            message: err.to_string(),
        })?;
        write_atomic(&self.snapshots_dir.join(&name), &json)?;
        self.prune_snapshots()?;
        debug!(snapshot = %name, keys = contents.len(), "store snapshot written");
        Ok(name)
    }

    /// Snapshot file names, newest first.
    pub fn list_snapshots(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.snapshots_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(VALUE_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                if name.starts_with(SNAPSHOT_PREFIX) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort_by_key(|name| {
            Reverse((parse_snapshot_timestamp(name), parse_snapshot_sequence(name)))
        });
        Ok(names)
    }

    /// Replaces the current contents with those of snapshot `name`.
    pub fn restore_snapshot(&self, name: &str) -> Result<()> {
        let path = self.snapshots_dir.join(name);
        if name.contains(['/', '\\']) || !path.exists() {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("snapshot `{name}` not found"),
            )));
        }
        let data = fs::read_to_string(&path)?;
        let contents: BTreeMap<String, String> =
            serde_json::from_str(&data).map_err(|err| StoreError::Serde {
                key: name.to_string(),
                message: err.to_string(),
            })?;
        self.clear()?;
        for (key, value) in contents {
            self.set(&key, &value)?;
        }
        Ok(())
    }

    fn prune_snapshots(&self) -> Result<()> {
        for stale in self.list_snapshots()?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(self.snapshots_dir.join(&stale)) {
                warn!(snapshot = %stale, error = %err, "failed to prune snapshot");
            }
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let path = self.value_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        let path = self.value_path(key);
        write_atomic(&path, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        let path = self.value_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        for key in self.keys()? {
            self.remove(&key)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.values_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(VALUE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
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
        } else if !sanitized.is_empty() && !last_dash {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_snapshot_timestamp(name: &str) -> Option<NaiveDateTime> {
    let rest = name
        .strip_suffix(&format!(".{VALUE_EXTENSION}"))?
        .strip_prefix(&format!("{SNAPSHOT_PREFIX}_"))?;
    let stamp = rest.get(..15)?;
    NaiveDateTime::parse_from_str(stamp, SNAPSHOT_TIMESTAMP_FORMAT).ok()
}

/// Snapshots taken within the same second carry `-<n>` right after the timestamp.
fn parse_snapshot_sequence(name: &str) -> u32 {
    let rest = name
        .strip_prefix(&format!("{SNAPSHOT_PREFIX}_"))
        .and_then(|rest| rest.get(15..))
        .and_then(|rest| rest.strip_prefix('-'));
    rest.and_then(|rest| {
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        digits.parse().ok()
    })
    .unwrap_or(1)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    tmp.set_extension(format!("{VALUE_EXTENSION}.{TMP_SUFFIX}"));
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_is_slugged() {
        assert_eq!(sanitize_note(Some("Before Import!")).as_deref(), Some("before-import"));
        assert_eq!(sanitize_note(Some("  ")), None);
        assert_eq!(sanitize_note(None), None);
    }

    #[test]
    fn snapshot_names_parse_back() {
        let parsed = parse_snapshot_timestamp("snapshot_20240102_030405_note.json").expect("timestamp");
        assert_eq!(parsed.to_string(), "2024-01-02 03:04:05");
        assert!(parse_snapshot_timestamp("other.json").is_none());
        assert_eq!(parse_snapshot_sequence("snapshot_20240102_030405_note.json"), 1);
        assert_eq!(parse_snapshot_sequence("snapshot_20240102_030405-3_note.json"), 3);
    }

    #[test]
    fn same_second_snapshots_keep_distinct_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::open(dir.path()).expect("store");
        let now = NaiveDateTime::parse_from_str("20240601_090000", SNAPSHOT_TIMESTAMP_FORMAT)
            .expect("timestamp");

        store.set("spendingLimit", "111").expect("set");
        let first = store.snapshot(Some("pre-import"), now).expect("snapshot");
        store.set("spendingLimit", "222").expect("set");
        let second = store.snapshot(Some("pre-import"), now).expect("snapshot");

        assert_eq!(first, "snapshot_20240601_090000_pre-import.json");
        assert_eq!(second, "snapshot_20240601_090000-2_pre-import.json");
        assert_eq!(store.list_snapshots().expect("list"), vec![second, first.clone()]);

        store.restore_snapshot(&first).expect("restore");
        assert_eq!(store.get("spendingLimit").expect("get").as_deref(), Some("111"));
    }

    #[test]
    fn values_round_trip_through_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::open(dir.path()).expect("store");
        store.set("dailyExpenses", "[]").expect("set");
        store.set("spendingLimit", "200").expect("set");
        assert_eq!(store.get("dailyExpenses").expect("get").as_deref(), Some("[]"));
        assert_eq!(store.keys().expect("keys"), vec!["dailyExpenses", "spendingLimit"]);
        assert!(!tmp_path(&store.value_path("dailyExpenses")).exists());

        store.remove("spendingLimit").expect("remove");
        store.remove("spendingLimit").expect("remove missing");
        assert_eq!(store.get("spendingLimit").expect("get"), None);
    }

    #[test]
    fn rejects_path_like_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::open(dir.path()).expect("store");
        assert!(matches!(store.set("../escape", "1"), Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn snapshots_restore_and_prune() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::with_retention(dir.path(), 2).expect("store");
        let base = NaiveDateTime::parse_from_str("2024-05-01 10:00:00", "%Y-%m-%d %H:%M:%S")
            .expect("timestamp");

        store.set("spendingLimit", "150").expect("set");
        let first = store.snapshot(Some("first"), base).expect("snapshot");
        store.set("spendingLimit", "300").expect("set");
        store
            .snapshot(None, base + chrono::Duration::minutes(1))
            .expect("snapshot");
        store
            .snapshot(None, base + chrono::Duration::minutes(2))
            .expect("snapshot");

        let names = store.list_snapshots().expect("list");
        assert_eq!(names.len(), 2);
        assert!(!names.contains(&first));

        store.restore_snapshot(&names[1]).expect("restore");
        assert_eq!(store.get("spendingLimit").expect("get").as_deref(), Some("300"));
        assert!(store.restore_snapshot("missing.json").is_err());
    }
}
