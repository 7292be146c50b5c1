// Configuration for the tasklist binary

use crate::storage::validate_key;
use crate::store::DEFAULT_KEY;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const FILE_NAME: &str = "tasklist.yml";

/// Main tasklist configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the task file (default: platform data dir)
    #[serde(rename = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Storage key the task collection is written under
    #[serde(rename = "storage-key")]
    pub storage_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: DEFAULT_KEY.to_string(),
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist and parse. Otherwise the first readable
    /// file among [`Config::search_paths`] wins, falling back to defaults.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).with_context(|| format!("Failed to load config from {}", path.display()));
        }

        for path in Self::search_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(&path) {
                Ok(config) => return Ok(config),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unusable config"),
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// `./.tasklist.yml`, then `<config dir>/tasklist/tasklist.yml`
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(format!(".{}", FILE_NAME))];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("tasklist").join(FILE_NAME));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        // The key names a file in the data dir, so reject it here rather than on first write
        validate_key(&config.storage_key).context("Invalid storage-key")?;

        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Resolved data directory
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tasklist")
        })
    }
}
