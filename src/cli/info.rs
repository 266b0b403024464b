//! Informational commands
//!
//! Neither command prompts for a missing config.

use super::CliContext;
use crate::config::Config;
use crate::display::format_audit_entries;
use crate::error::{BkpError, BkpResult};

/// Show paths and the configured bucket/path
pub fn handle_config(ctx: &CliContext) -> BkpResult<()> {
    let paths = &ctx.paths;

    println!("bkp Configuration");
    println!("=================");
    println!("Base directory:  {}", paths.base_dir().display());
    println!("Config file:     {}", paths.config_file().display());
    println!("Manifest cache:  {}", paths.manifests_dir().display());
    println!("Audit log:       {}", paths.audit_log().display());
    println!();

    match Config::load(paths) {
        Ok(config) => {
            println!("Settings:");
            println!("  Bucket: {}", config.bucket);
            println!("  Path:   {}", config.path);
        }
        Err(BkpError::ConfigMissing(_)) => {
            println!("No config file yet. Any other command will offer to create one.");
        }
        Err(e) => return Err(e),
    }

    if let Some(profile) = &ctx.aws_profile {
        println!("  AWS profile: {}", profile);
    }
    Ok(())
}

/// Print the most recent audit entries
pub fn handle_log(ctx: &CliContext, limit: usize) -> BkpResult<()> {
    let entries = ctx.audit().read_recent(limit)?;
    println!("{}", format_audit_entries(&entries));
    Ok(())
}
