use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use pneumo_calculators::calculators::brock::DEFAULT_HIGH_RISK_CUTOFF_PERCENT;
use pneumo_core::models::history::DEFAULT_HISTORY_CAPACITY;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PneumoConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// How many evaluations a session keeps. Added in v1.
    pub history_capacity: usize,
    /// Brock probability (%) at or above which a nodule counts as high risk.
    #[serde(default = "default_cutoff")]
    pub brock_high_risk_cutoff_percent: f64,
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default = "jiff::Timestamp::now")]
    pub created_at: jiff::Timestamp,
}

fn default_cutoff() -> f64 {
    DEFAULT_HIGH_RISK_CUTOFF_PERCENT
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for PneumoConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            brock_high_risk_cutoff_percent: default_cutoff(),
            log_filter: default_log_filter(),
            created_at: jiff::Timestamp::now(),
        }
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("sk.pneumocalc"))
}

/// `<platform config dir>/sk.pneumocalc/config.json`
pub fn default_config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Load the config at `path`, migrating older versions in memory.
///
/// A missing file yields the defaults; nothing is written.
pub fn load_config(path: &Path) -> eyre::Result<PneumoConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(PneumoConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: PneumoConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update pneumo-cli."
        ));
    }

    // v0 → v1: add history_capacity
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("history_capacity")
            .or_insert(serde_json::Value::Number(DEFAULT_HISTORY_CAPACITY.into()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added history_capacity)");
    }

    Ok(json)
}

pub fn save_config(config: &PneumoConfig, path: &Path) -> eyre::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
