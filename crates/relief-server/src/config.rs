//! Layered configuration
//!
//! Config is loaded with two layers of precedence (highest wins):
//! 1. Environment variables: `RELIEF_DATA_DIR`, `RELIEF_RESULT_WAIT_SECS`,
//!    `RELIEF_WORKER_WAIT_SECS`
//! 2. Project-local: `relief.toml`
//! Every field has a default, so both layers are optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use relief_core::{ReliefError, Result};

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReliefConfig {
    /// Root directory of the filesystem artifact store
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Long-poll wait of the reconciliation loop, in seconds
    #[serde(default = "default_result_wait_secs")]
    pub result_wait_secs: u64,
    /// Long-poll wait of worker task receives, in seconds
    #[serde(default = "default_worker_wait_secs")]
    pub worker_wait_secs: u64,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".relief/data")
}
fn default_result_wait_secs() -> u64 {
    1
}
fn default_worker_wait_secs() -> u64 {
    2
}

impl Default for ReliefConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            result_wait_secs: default_result_wait_secs(),
            worker_wait_secs: default_worker_wait_secs(),
        }
    }
}

impl ReliefConfig {
    /// Load `relief.toml` from the current directory (if present) and
    /// apply environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("relief.toml"))
    }

    /// Load from an explicit path, falling back to defaults if the file
    /// is absent, then apply environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)
                .map_err(|e| ReliefError::Config(format!("failed to parse {}: {}", path.display(), e)))?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Long-poll wait fed to the reconciliation loop
    pub fn result_wait(&self) -> Duration {
        Duration::from_secs(self.result_wait_secs)
    }

    /// Long-poll wait fed to worker task receives
    pub fn worker_wait(&self) -> Duration {
        Duration::from_secs(self.worker_wait_secs)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("RELIEF_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(secs) = env_u64("RELIEF_RESULT_WAIT_SECS") {
            self.result_wait_secs = secs;
        }
        if let Some(secs) = env_u64("RELIEF_WORKER_WAIT_SECS") {
            self.worker_wait_secs = secs;
        }
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReliefConfig::default();
        assert_eq!(config.data_dir, PathBuf::from(".relief/data"));
        assert_eq!(config.result_wait(), Duration::from_secs(1));
        assert_eq!(config.worker_wait(), Duration::from_secs(2));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join(format!("relief_cfg_{}.toml", uuid::Uuid::new_v4()));
        let config = ReliefConfig::load_from(&path).unwrap();
        assert_eq!(config.result_wait_secs, 1);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = std::env::temp_dir().join(format!("relief_cfg_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "data_dir = \"/var/relief\"\nworker_wait_secs = 5\n").unwrap();

        let config = ReliefConfig::load_from(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/relief"));
        assert_eq!(config.worker_wait(), Duration::from_secs(5));
        assert_eq!(config.result_wait_secs, 1);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("relief_cfg_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "worker_wait_secs = \"soon\"").unwrap();
        assert!(ReliefConfig::load_from(&path).is_err());
        std::fs::remove_file(&path).ok();
    }
}
