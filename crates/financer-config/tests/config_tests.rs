use financer_config::{Config, ConfigError, ConfigManager};
use std::{fs, path::PathBuf};
use tempfile::tempdir;

#[test]
fn default_config_is_valid() {
    let cfg = Config::default();

    assert!(!cfg.currency.is_empty());
    assert!(!cfg.locale.is_empty());
    assert!(cfg.backup_retention > 0);
    cfg.validate().expect("defaults validate");
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    assert_eq!(manager.load().expect("load"), Config::default());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let cfg = Config {
        currency: "USD".into(),
        backup_retention: 2,
        last_opened_ledger: Some("household".into()),
        default_ledger_root: Some(dir.path().join("ledgers")),
        ..Config::default()
    };

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert_eq!(manager.config_path(), dir.path().join("config").join("config.json"));
    assert_eq!(
        loaded.resolve_ledger_path(),
        dir.path().join("ledgers").join("household.json")
    );
    assert_eq!(
        loaded.resolve_default_backup_root(),
        dir.path().join("ledgers").join("backups")
    );
}

#[test]
fn older_files_fill_in_missing_fields() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "locale": "de-DE", "currency": "EUR" }"#).expect("write");

    let loaded = ConfigManager::new(path).load().expect("load");

    assert_eq!(loaded.locale, "de-DE");
    assert_eq!(loaded.backup_retention, Config::default_backup_retention());
    assert!(loaded.ui_color_enabled);
}

#[test]
fn zero_retention_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));
    let cfg = Config {
        backup_retention: 0,
        ..Config::default()
    };

    let err = manager.save(&cfg).unwrap_err();

    assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "backup_retention"));
    assert!(!dir.path().join("config.json").exists());
}

#[test]
fn blank_ledger_name_falls_back_to_default_file() {
    let cfg = Config {
        last_opened_ledger: Some("  ".into()),
        default_ledger_root: Some(PathBuf::from("/srv/ledgers")),
        ..Config::default()
    };

    assert_eq!(
        cfg.resolve_ledger_path(),
        PathBuf::from("/srv/ledgers/financer.json")
    );
}
