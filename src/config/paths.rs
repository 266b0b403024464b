//! Path management for bkp
//!
//! ## Path Resolution Order
//!
//! 1. `BKP_HOME` environment variable (if set)
//! 2. `~/.bkp` in the user's home directory

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::BkpError;

/// Manages all paths used by bkp
#[derive(Debug, Clone)]
pub struct BkpPaths {
    /// Base directory for all bkp state
    base_dir: PathBuf,
}

impl BkpPaths {
    /// Create a new BkpPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, BkpError> {
        let base_dir = if let Ok(custom) = std::env::var("BKP_HOME") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create BkpPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.bkp/)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the config file
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.yml")
    }

    /// Get the manifest cache directory (~/.bkp/manifests/)
    pub fn manifests_dir(&self) -> PathBuf {
        self.base_dir.join("manifests")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Ensure the base and manifest cache directories exist
    pub fn ensure_directories(&self) -> Result<(), BkpError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BkpError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.manifests_dir()).map_err(|e| {
            BkpError::Io(format!("Failed to create manifest cache directory: {}", e))
        })?;

        Ok(())
    }

    /// Check if bkp has been configured (config file exists)
    pub fn is_configured(&self) -> bool {
        self.config_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, BkpError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| BkpError::Config("Could not determine home directory".into()))?;
    Ok(dirs.home_dir().join(".bkp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BkpPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.manifests_dir(), temp_dir.path().join("manifests"));
        assert_eq!(paths.config_file(), temp_dir.path().join("config.yml"));
        assert_eq!(paths.audit_log(), temp_dir.path().join("audit.log"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().to_str().unwrap();

        env::set_var("BKP_HOME", custom_path);

        let paths = BkpPaths::new().unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());

        env::remove_var("BKP_HOME");
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BkpPaths::with_base_dir(temp_dir.path().join("home"));

        paths.ensure_directories().unwrap();

        assert!(paths.base_dir().exists());
        assert!(paths.manifests_dir().exists());
        assert!(!paths.is_configured());
    }
}
