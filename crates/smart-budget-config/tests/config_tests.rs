use std::time::Duration;

use smart_budget_config::{Config, ConfigError, ConfigKey, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_matches_documented_values() {
    let cfg = Config::default();

    assert!(!cfg.currency.is_empty());
    assert!(!cfg.locale.is_empty());
    assert_eq!(cfg.undo_window(), Duration::from_secs(5));
    assert_eq!(cfg.warning_threshold_percent, 80.0);
    assert!(cfg.ui_color_enabled);
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let mut cfg = Config::default();
    cfg.set(ConfigKey::Currency, "eur").expect("currency");
    cfg.set(ConfigKey::UndoWindowSecs, "8").expect("window");

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert_eq!(loaded.currency, "EUR");
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::for_home(dir.path());

    assert_eq!(manager.load().expect("load"), Config::default());
    assert_eq!(
        manager.config_path(),
        dir.path().join("config").join("config.json")
    );
    assert!(!dir.path().join("config").exists());
}

#[test]
fn partial_documents_fill_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"locale":"fr-FR","currency":"EUR"}"#).unwrap();

    let loaded = ConfigManager::new(path).load().expect("load");
    assert_eq!(loaded.locale, "fr-FR");
    assert_eq!(loaded.undo_window_secs, 5);
    assert_eq!(loaded.warning_threshold_percent, 80.0);
    assert!(loaded.data_root.is_none());
}

#[test]
fn corrupt_config_is_reported() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = ConfigManager::new(path).load().expect_err("corrupt");
    assert!(matches!(err, ConfigError::Serde(_)));
}

#[test]
fn rejects_invalid_values() {
    let mut cfg = Config::default();
    assert!(matches!(
        cfg.set(ConfigKey::UndoWindowSecs, "0"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        cfg.set(ConfigKey::UiColorEnabled, "maybe"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert_eq!(cfg, Config::default());
}

#[test]
fn hand_edited_out_of_range_values_are_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"locale":"en-US","currency":"USD","warning_threshold_percent":250}"#,
    )
    .unwrap();

    let err = ConfigManager::new(path).load().expect_err("out of range");
    assert!(matches!(
        err,
        ConfigError::InvalidValue {
            key: "warning_threshold_percent",
            ..
        }
    ));
}

#[test]
fn update_commits_only_after_save() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::for_home(dir.path());
    let mut cfg = Config::default();

    manager
        .update(&mut cfg, ConfigKey::Currency, "gbp")
        .expect("update");
    assert_eq!(cfg.currency, "GBP");
    assert_eq!(manager.load().expect("load").currency, "GBP");

    // A regular file where the config directory should be makes the save fail.
    let blocked_home = dir.path().join("blocked");
    std::fs::write(&blocked_home, "").unwrap();
    let blocked = ConfigManager::for_home(&blocked_home);
    let err = blocked
        .update(&mut cfg, ConfigKey::Currency, "eur")
        .expect_err("save fails");
    assert!(matches!(err, ConfigError::Io(_)));
    assert_eq!(cfg.currency, "GBP");
}
