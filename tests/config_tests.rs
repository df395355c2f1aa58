use expense_core::config::{Config, ConfigManager};
use tempfile::tempdir;

#[test]
fn missing_file_loads_defaults() {
    let temp = tempdir().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path()).unwrap();
    let config = manager.load().unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.currency, "INR");
    assert_eq!(config.default_spending_limit, 200.0);
    assert_eq!(config.insight_cache_ttl_secs, 3600);
}

#[test]
fn backups_restore_earlier_settings() {
    let temp = tempdir().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path()).unwrap();
    let mut config = Config::default();
    config.set("currency_symbol", "€").unwrap();
    manager.save(&config).unwrap();
    let backup = manager.backup(&config, Some("Euro setup")).unwrap();
    assert!(backup.ends_with("_euro-setup.json"));

    config.set("currency_symbol", "$").unwrap();
    manager.save(&config).unwrap();
    assert_eq!(manager.load().unwrap().currency_symbol, "$");

    let restored = manager.restore(&backup).unwrap();
    assert_eq!(restored.currency_symbol, "€");
    assert_eq!(manager.list_backups().unwrap(), vec![backup]);
    assert!(manager.restore("../config.json").is_err());
}

#[test]
fn corrupt_file_is_replaced_by_defaults() {
    let temp = tempdir().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path()).unwrap();
    std::fs::write(manager.config_path(), "{ nope").unwrap();
    assert!(manager.load().is_err());
    assert_eq!(manager.load_or_default(), Config::default());
}
