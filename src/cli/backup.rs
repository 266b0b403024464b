//! Manifest authoring and publishing commands
//!
//! `template`, `validate` and `create` all work from a manifest source file
//! on the local machine.

use std::path::Path;

use chrono::Local;

use super::CliContext;
use crate::error::BkpResult;
use crate::models::{validate_batch, Manifest};
use crate::services::{FailurePolicy, Publisher, TarArchiver};
use crate::setup::ensure_config;
use crate::storage::load_source;
use crate::template::generate_template;

/// Print a manifest template pre-filled from the config
pub fn handle_template(ctx: &CliContext) -> BkpResult<()> {
    let config = ensure_config(&ctx.paths)?;
    print!("{}", generate_template(&config, Local::now())?);
    Ok(())
}

/// Load and validate every manifest in `file`, printing their names
pub fn handle_validate(ctx: &CliContext, file: &Path) -> BkpResult<()> {
    ensure_config(&ctx.paths)?;
    let manifests = load_and_validate(file)?;

    for (index, manifest) in manifests.iter().enumerate() {
        println!("Backup({}) OK: {}", index, manifest.name());
    }
    println!();
    println!("{} backup(s) valid. Nothing was uploaded.", manifests.len());
    Ok(())
}

/// Validate the whole batch, then archive and upload each backup
pub fn handle_create(ctx: &CliContext, file: &Path, keep_going: bool) -> BkpResult<()> {
    ensure_config(&ctx.paths)?;
    let manifests = load_and_validate(file)?;

    let store = ctx.store();
    let archiver = TarArchiver::new(ctx.runner());
    let policy = if keep_going {
        FailurePolicy::Continue
    } else {
        FailurePolicy::Abort
    };
    let publisher = Publisher::new(&store, &archiver)
        .with_policy(policy)
        .with_audit(ctx.audit());

    let mut incomplete = 0;
    for manifest in &manifests {
        println!("Creating backup {}...", manifest.name());
        let report = publisher.publish(manifest)?;

        for key in &report.uploaded {
            println!("  Uploaded {}", key);
        }
        for failure in &report.failures {
            println!("  FAILED {}", failure);
        }
        if !report.is_complete() {
            incomplete += 1;
        }
    }

    println!();
    println!(
        "Published {} backup(s), {} with failures.",
        manifests.len(),
        incomplete
    );
    Ok(())
}

fn load_and_validate(file: &Path) -> BkpResult<Vec<Manifest>> {
    let drafts = load_source(file)?;
    tracing::debug!(file = %file.display(), count = drafts.len(), "loaded manifest source");
    Ok(validate_batch(&drafts)?)
}
