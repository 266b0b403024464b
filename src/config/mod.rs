//! Configuration module for bkp
//!
//! This module provides configuration management including:
//! - Path resolution for the `~/.bkp` state directory
//! - The persisted bucket/path config and the first-run decision

pub mod paths;
pub mod settings;

pub use paths::BkpPaths;
pub use settings::{decide_config_creation, Config, ConfigAction};
