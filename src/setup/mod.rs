//! First-run configuration prompt
//!
//! When `~/.bkp/config.yml` is missing, ask whether to create it and, if so,
//! for the default bucket and path. The yes/no answer is turned into an
//! action by [`decide_config_creation`]; this module only does the asking.

pub mod prompt;

pub use prompt::{ensure_config, ConfigPrompt};
