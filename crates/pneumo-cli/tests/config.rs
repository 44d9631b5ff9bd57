use pneumo_cli::config::{load_config, migrate, save_config, PneumoConfig, CURRENT_VERSION};
use serde_json::json;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config(&dir.path().join("config.json")).unwrap();
    assert_eq!(config.history_capacity, 10);
    assert_eq!(config.brock_high_risk_cutoff_percent, 5.0);
    assert_eq!(config.log_filter, "info");
    assert!(!dir.path().join("config.json").exists());
}

#[test]
fn save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");
    let config = PneumoConfig {
        history_capacity: 25,
        brock_high_risk_cutoff_percent: 10.0,
        log_filter: "pneumo_calculators=debug".to_string(),
        ..Default::default()
    };
    save_config(&config, &path).unwrap();

    let loaded = load_config(&path).unwrap();
    assert_eq!(loaded.config_version, CURRENT_VERSION);
    assert_eq!(loaded.history_capacity, 25);
    assert_eq!(loaded.brock_high_risk_cutoff_percent, 10.0);
    assert_eq!(loaded.log_filter, "pneumo_calculators=debug");
    assert_eq!(loaded.created_at, config.created_at);
    assert!(!path.with_extension("json.tmp").exists());
}

#[cfg(unix)]
#[test]
fn saved_config_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    save_config(&PneumoConfig::default(), &path).unwrap();
    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn unversioned_config_is_migrated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{ "brock_high_risk_cutoff_percent": 8.0, "created_at": "2024-03-07T13:05:00Z" }"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.config_version, 1);
    assert_eq!(config.history_capacity, 10);
    assert_eq!(config.brock_high_risk_cutoff_percent, 8.0);
    assert_eq!(config.created_at.to_string(), "2024-03-07T13:05:00Z");
}

#[test]
fn migration_keeps_existing_values() {
    let migrated = migrate(json!({ "history_capacity": 3 }), 0).unwrap();
    assert_eq!(migrated["history_capacity"], 3);
    assert_eq!(migrated["config_version"], 1);
}

#[test]
fn newer_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "config_version": 99, "history_capacity": 10 }"#).unwrap();

    let error = load_config(&path).unwrap_err();
    assert!(error.to_string().contains("newer than this build supports"));
}

#[test]
fn non_object_config_is_rejected() {
    assert!(migrate(json!([1, 2, 3]), 0).is_err());
}
