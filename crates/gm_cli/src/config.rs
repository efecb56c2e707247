use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::error::Result;

const CONFIG_FILE: &str = "gridmon.toml";
const STATE_FILE: &str = "replay.json";
const VARIABLE_PREFIX: &str = "GRIDMON_";

/// Runtime configuration: collaborator endpoints, state location, timers.
///
/// Loaded from `gridmon.toml` (current directory, or `--config`), then
/// overridden by `GRIDMON_*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL of the storage collaborator.
    pub storage_url: String,

    /// Base URL of the model collaborator.
    pub model_url: String,

    /// Directory holding the persisted replay state.
    pub state_dir: PathBuf,

    /// Seconds between replay reveal steps.
    pub replay_interval_secs: u64,

    /// Milliseconds between upload queue iterations.
    pub step_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_url: "http://127.0.0.1:5000".to_owned(),
            model_url: "http://127.0.0.1:8000".to_owned(),
            state_dir: default_state_dir(),
            replay_interval_secs: gm_replay::DEFAULT_REPLAY_INTERVAL.as_secs(),
            step_delay_ms: 250,
        }
    }
}

impl Config {
    /// Loads the configuration file, falling back to defaults when none
    /// exists, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map_or_else(|| PathBuf::from(CONFIG_FILE), Path::to_path_buf);

        let mut config = if path.is_file() {
            trace!(path = %path.display(), "Loading configuration file.");
            toml::from_str(&std::fs::read_to_string(&path)?)?
        } else {
            trace!(path = %path.display(), "No configuration file. Using defaults.");
            Self::default()
        };

        config.apply_overrides(std::env::vars());
        Ok(config)
    }

    /// Applies `GRIDMON_*` overrides from the given variables.
    fn apply_overrides(&mut self, vars: impl Iterator<Item = (String, String)>) {
        for (key, value) in vars {
            let Some(field) = key.strip_prefix(VARIABLE_PREFIX) else {
                continue;
            };

            match field {
                "STORAGE_URL" => self.storage_url = value,
                "MODEL_URL" => self.model_url = value,
                "STATE_DIR" => self.state_dir = PathBuf::from(value),
                "REPLAY_INTERVAL_SECS" => match value.parse() {
                    Ok(secs) => self.replay_interval_secs = secs,
                    Err(_) => warn!(key, value, "Ignoring unparseable override."),
                },
                "STEP_DELAY_MS" => match value.parse() {
                    Ok(ms) => self.step_delay_ms = ms,
                    Err(_) => warn!(key, value, "Ignoring unparseable override."),
                },
                _ => warn!(key, "Ignoring unknown override."),
            }
        }
    }

    #[must_use]
    pub fn replay_interval(&self) -> Duration {
        Duration::from_secs(self.replay_interval_secs)
    }

    #[must_use]
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    #[must_use]
    pub fn state_file(&self) -> PathBuf {
        self.state_dir.join(STATE_FILE)
    }
}

fn default_state_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "gridmon")
        .map_or_else(|| PathBuf::from(".gridmon"), |dirs| dirs.data_dir().to_owned())
}
