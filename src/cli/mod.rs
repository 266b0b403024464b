//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod catalog;
pub mod info;

pub use backup::{handle_create, handle_template, handle_validate};
pub use catalog::{handle_list, handle_show, handle_sync};
pub use info::{handle_config, handle_log};

use crate::audit::AuditLogger;
use crate::blobstore::AwsCliStore;
use crate::config::BkpPaths;
use crate::process::CommandRunner;

/// Everything a command handler needs from the process environment
#[derive(Debug, Clone)]
pub struct CliContext {
    pub paths: BkpPaths,
    /// Named `aws` CLI profile, if any
    pub aws_profile: Option<String>,
}

impl CliContext {
    pub fn new(paths: BkpPaths, aws_profile: Option<String>) -> Self {
        Self { paths, aws_profile }
    }

    pub fn audit(&self) -> AuditLogger {
        AuditLogger::new(self.paths.audit_log())
    }

    /// Runner that records every external command in the audit log
    pub fn runner(&self) -> CommandRunner {
        CommandRunner::with_audit(self.audit()).with_banner()
    }

    pub fn store(&self) -> AwsCliStore {
        let store = AwsCliStore::new(self.runner());
        match &self.aws_profile {
            Some(profile) => store.with_profile(profile),
            None => store,
        }
    }
}
