//! Persisted bkp configuration
//!
//! The config file holds the default bucket and path that new manifest
//! templates are pre-filled with, and that catalog syncs list from.

use serde::{Deserialize, Serialize};

use super::paths::BkpPaths;
use crate::error::BkpError;

const CONFIG_HEADER: &str = "\
# The default bucket where all backups will be stored
#
# The default path where all backups will be stored
# Think about it this way: bucket/path/[backups live here]
";

/// User configuration for bkp
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Bucket every backup is stored in
    #[serde(default)]
    pub bucket: String,

    /// Key prefix inside the bucket that holds one folder per backup
    #[serde(default)]
    pub path: String,
}

/// What to do when the config file is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Ask for bucket and path, then write a new config file
    Create,
    /// Leave without touching anything
    Exit,
}

/// Decide how to handle a missing config file given the user's answer
pub fn decide_config_creation(confirmed: bool) -> ConfigAction {
    if confirmed {
        ConfigAction::Create
    } else {
        ConfigAction::Exit
    }
}

impl Config {
    /// Create a config for the given bucket and path
    pub fn new(bucket: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            path: path.into(),
        }
    }

    /// Load the config from disk
    ///
    /// Returns `ConfigMissing` when the file has not been created yet.
    pub fn load(paths: &BkpPaths) -> Result<Self, BkpError> {
        let config_path = paths.config_file();

        if !paths.is_configured() {
            return Err(BkpError::ConfigMissing(config_path));
        }

        let contents = std::fs::read_to_string(&config_path)
            .map_err(|e| BkpError::Io(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_yaml::from_str(&contents)
            .map_err(|e| BkpError::Config(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save the config to disk, creating `~/.bkp` if needed
    pub fn save(&self, paths: &BkpPaths) -> Result<(), BkpError> {
        paths.ensure_directories()?;

        let body = serde_yaml::to_string(self)
            .map_err(|e| BkpError::Config(format!("Failed to serialize config: {}", e)))?;

        let mut contents = String::from(CONFIG_HEADER);
        contents.push_str(&body);

        std::fs::write(paths.config_file(), contents)
            .map_err(|e| BkpError::Io(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
