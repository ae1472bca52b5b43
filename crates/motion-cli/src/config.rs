//! Reads/writes `~/.motionstate/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persisted settings for the `motionstate` shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Notifications buffered per listener before lag recovery kicks in.
    #[serde(default = "default_notification_capacity")]
    pub notification_capacity: usize,

    /// Age after which `/inactive` lists a device.
    #[serde(default = "default_inactive_after_secs")]
    pub inactive_after_secs: u64,

    /// Number of simulated walkers besides the local device.
    #[serde(default = "default_sim_devices")]
    pub sim_devices: usize,

    /// Interval between simulated engine updates.
    #[serde(default = "default_sim_update_rate_ms")]
    pub sim_update_rate_ms: u64,

    /// Id the simulated engine reports for the local device.
    #[serde(default = "default_current_device")]
    pub current_device: String,
}

fn default_notification_capacity() -> usize {
    256
}
fn default_inactive_after_secs() -> u64 {
    5
}
fn default_sim_devices() -> usize {
    3
}
fn default_sim_update_rate_ms() -> u64 {
    200
}
fn default_current_device() -> String {
    "self".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notification_capacity: default_notification_capacity(),
            inactive_after_secs: default_inactive_after_secs(),
            sim_devices: default_sim_devices(),
            sim_update_rate_ms: default_sim_update_rate_ms(),
            current_device: default_current_device(),
        }
    }
}

/// Return the path to `~/.motionstate/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".motionstate").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

pub(crate) fn load_from(path: &PathBuf) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `MOTIONSTATE_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `MOTIONSTATE_SIM_DEVICES` | `sim_devices` |
/// | `MOTIONSTATE_SIM_RATE_MS` | `sim_update_rate_ms` |
/// | `MOTIONSTATE_INACTIVE_AFTER_SECS` | `inactive_after_secs` |
///
/// Values that do not parse are ignored.
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("MOTIONSTATE_SIM_DEVICES")
        && let Ok(n) = v.parse::<usize>()
    {
        cfg.sim_devices = n;
    }
    if let Ok(v) = std::env::var("MOTIONSTATE_SIM_RATE_MS")
        && let Ok(ms) = v.parse::<u64>()
        && ms > 0
    {
        cfg.sim_update_rate_ms = ms;
    }
    if let Ok(v) = std::env::var("MOTIONSTATE_INACTIVE_AFTER_SECS")
        && let Ok(secs) = v.parse::<u64>()
    {
        cfg.inactive_after_secs = secs;
    }
}

/// Defaults with `MOTIONSTATE_*` overrides applied, for when no usable file
/// exists.
pub fn defaults_with_env() -> Config {
    let mut cfg = Config::default();
    apply_env_overrides(&mut cfg);
    cfg
}

/// Save the config to disk, creating `~/.motionstate/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

pub(crate) fn save_to(cfg: &Config, path: &PathBuf) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        save_to(&Config::default(), &path).expect("save");

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.notification_capacity, 256);
        assert_eq!(loaded.inactive_after_secs, 5);
        assert_eq!(loaded.sim_update_rate_ms, 200);
        assert_eq!(loaded.current_device, "self");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "current_device = \"phone-7\"\n").unwrap();

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.current_device, "phone-7");
        assert_eq!(loaded.notification_capacity, 256);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "sim_devices = \"many\"\n").unwrap();

        assert!(load_from(&path).is_err());
    }

    #[test]
    fn config_path_points_to_motionstate_dir() {
        let p = config_path_for_home("/home/testuser");
        assert!(p.to_string_lossy().contains(".motionstate"));
        assert!(p.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        assert!(load_from(&path).expect("no error").is_none());
    }

    // Each test owns a distinct variable, so parallel test threads never
    // race on the same one.

    #[test]
    fn apply_env_overrides_changes_sim_devices() {
        // SAFETY: no other test reads or writes this variable.
        unsafe { std::env::set_var("MOTIONSTATE_SIM_DEVICES", "8") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.sim_devices, 8);
        unsafe { std::env::remove_var("MOTIONSTATE_SIM_DEVICES") };
    }

    #[test]
    fn apply_env_overrides_ignores_zero_rate() {
        // SAFETY: no other test reads or writes this variable.
        unsafe { std::env::set_var("MOTIONSTATE_SIM_RATE_MS", "0") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.sim_update_rate_ms, 200);
        unsafe { std::env::remove_var("MOTIONSTATE_SIM_RATE_MS") };
    }

    #[test]
    fn inactive_after_override_is_validated_and_reaches_fallback() {
        // SAFETY: no other test reads or writes this variable.
        unsafe { std::env::set_var("MOTIONSTATE_INACTIVE_AFTER_SECS", "soon") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.inactive_after_secs, 5);

        // A malformed file falls back to defaults, overrides still applied.
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "inactive_after_secs = [\n").unwrap();
        assert!(load_from(&path).is_err());

        unsafe { std::env::set_var("MOTIONSTATE_INACTIVE_AFTER_SECS", "42") };
        assert_eq!(defaults_with_env().inactive_after_secs, 42);
        unsafe { std::env::remove_var("MOTIONSTATE_INACTIVE_AFTER_SECS") };
    }
}
