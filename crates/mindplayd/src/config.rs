use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const LISTEN_ENV: &str = "MINDPLAYD_LISTEN";

fn default_listen() -> String {
    "127.0.0.1:9877".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Default embed flag for sessions that do not ask for one.
    #[serde(default)]
    pub embed: bool,
    /// Fixed RNG seed for reproducible rounds. Entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            embed: false,
            seed: None,
        }
    }
}

impl DaemonConfig {
    /// Read `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn apply_env(self) -> Self {
        self.with_listen_override(std::env::var(LISTEN_ENV).ok())
    }

    pub fn with_listen_override(mut self, listen: Option<String>) -> Self {
        if let Some(listen) = listen.filter(|l| !l.trim().is_empty()) {
            self.listen = listen.trim().to_string();
        }
        self
    }
}
