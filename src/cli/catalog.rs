//! Catalog commands
//!
//! `sync` rebuilds the local manifest cache; `list` and `show` read it.

use super::CliContext;
use crate::display::{format_manifest_body, format_manifest_list};
use crate::error::BkpResult;
use crate::services::CatalogSyncer;
use crate::setup::ensure_config;
use crate::storage::ManifestRegistry;

/// Mirror every remote manifest into the local cache
pub fn handle_sync(ctx: &CliContext) -> BkpResult<()> {
    let config = ensure_config(&ctx.paths)?;
    let store = ctx.store();
    let syncer = CatalogSyncer::new(&store, &config).with_audit(ctx.audit());

    println!("Syncing manifests from {}...", syncer.root());
    let mut registry = ManifestRegistry::new(ctx.paths.manifests_dir());
    let report = syncer.sync(&mut registry)?;

    println!(
        "Fetched {} manifest(s), removed {} stale cache file(s).",
        report.fetched.len(),
        report.removed
    );
    for name in &report.missing {
        println!("  Skipped {}: no manifest.json", name);
    }
    Ok(())
}

/// List cached manifests
pub fn handle_list(ctx: &CliContext) -> BkpResult<()> {
    ensure_config(&ctx.paths)?;
    let registry = load_registry(ctx)?;
    println!("{}", format_manifest_list(registry.all()));
    Ok(())
}

/// Show one cached manifest by list id or name
pub fn handle_show(ctx: &CliContext, identifier: &str) -> BkpResult<()> {
    ensure_config(&ctx.paths)?;
    let registry = load_registry(ctx)?;
    let manifest = registry.resolve(identifier)?;
    println!("{}", format_manifest_body(manifest));
    Ok(())
}

fn load_registry(ctx: &CliContext) -> BkpResult<ManifestRegistry> {
    let mut registry = ManifestRegistry::new(ctx.paths.manifests_dir());
    registry.load()?;
    Ok(registry)
}
