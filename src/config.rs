//! Application-level configuration loading.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "PITCHBOARD_BACK_CONFIG_PATH";

const DEFAULT_SYNC_PERIOD_SECS: u64 = 10;
const DEFAULT_DISCOVERY_LOOK_BACK_MINS: u64 = 180;
const DEFAULT_DISCOVERY_LOOK_AHEAD_MINS: u64 = 60;
const DEFAULT_MINUTES_PER_HALF: u32 = 25;
const DEFAULT_DATA_DIR: &str = "data/sessions";

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    sync_period: Duration,
    discovery_look_back: Duration,
    discovery_look_ahead: Duration,
    default_minutes_per_half: u32,
    data_dir: PathBuf,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// baked-in defaults when the file is absent or invalid.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Period of the active-game sync loop.
    pub fn sync_period(&self) -> Duration {
        self.sync_period
    }

    /// How far back discovery searches the match-event calendar.
    pub fn discovery_look_back(&self) -> Duration {
        self.discovery_look_back
    }

    /// How far ahead discovery searches the match-event calendar.
    pub fn discovery_look_ahead(&self) -> Duration {
        self.discovery_look_ahead
    }

    /// Half length applied when a session does not specify one.
    pub fn default_minutes_per_half(&self) -> u32 {
        self.default_minutes_per_half
    }

    /// Directory holding per-team crash-recovery files.
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sync_period: Duration::from_secs(DEFAULT_SYNC_PERIOD_SECS),
            discovery_look_back: Duration::from_secs(DEFAULT_DISCOVERY_LOOK_BACK_MINS * 60),
            discovery_look_ahead: Duration::from_secs(DEFAULT_DISCOVERY_LOOK_AHEAD_MINS * 60),
            default_minutes_per_half: DEFAULT_MINUTES_PER_HALF,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

/// JSON representation of the configuration file.
#[derive(Debug, Deserialize)]
struct RawConfig {
    sync_period_secs: Option<u64>,
    discovery_look_back_mins: Option<u64>,
    discovery_look_ahead_mins: Option<u64>,
    default_minutes_per_half: Option<u32>,
    data_dir: Option<PathBuf>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            sync_period: value
                .sync_period_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.sync_period),
            discovery_look_back: value
                .discovery_look_back_mins
                .map(|mins| Duration::from_secs(mins * 60))
                .unwrap_or(defaults.discovery_look_back),
            discovery_look_ahead: value
                .discovery_look_ahead_mins
                .map(|mins| Duration::from_secs(mins * 60))
                .unwrap_or(defaults.discovery_look_ahead),
            default_minutes_per_half: value
                .default_minutes_per_half
                .unwrap_or(defaults.default_minutes_per_half),
            data_dir: value.data_dir.unwrap_or(defaults.data_dir),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
