//! Catalog sync
//!
//! Rebuilds the local manifest cache from the remote listing: list the
//! backup folders, clear the cache, download every `manifest.json` as
//! `<name>.json`, then reload the registry. The syncer keeps no state of its
//! own, so running it twice against the same remote gives the same cache.

use std::fs;

use crate::audit::{AuditEntry, AuditLogger, Operation};
use crate::blobstore::{BlobStore, ObjectKey};
use crate::config::Config;
use crate::error::{BkpError, BkpResult};
use crate::storage::{cached_manifest_files, ManifestRegistry};

/// Outcome of a catalog sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Backup names whose manifests were downloaded, in listing order
    pub fetched: Vec<String>,
    /// Stale cache files removed before downloading
    pub removed: usize,
    /// Backup folders without a downloadable `manifest.json`
    pub missing: Vec<String>,
}

/// Mirrors remote manifests into the local cache
pub struct CatalogSyncer<'a> {
    store: &'a dyn BlobStore,
    bucket: String,
    path: String,
    audit: Option<AuditLogger>,
}

impl<'a> CatalogSyncer<'a> {
    /// Create a syncer for the configured bucket and path
    pub fn new(store: &'a dyn BlobStore, config: &Config) -> Self {
        Self {
            store,
            bucket: config.bucket.clone(),
            path: config.path.clone(),
            audit: None,
        }
    }

    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    /// The remote prefix holding every backup folder
    pub fn root(&self) -> ObjectKey {
        ObjectKey::backups_root(&self.bucket, &self.path)
    }

    /// List, clear the cache, fetch every manifest, reload the registry
    pub fn sync(&self, registry: &mut ManifestRegistry) -> BkpResult<SyncReport> {
        let result = self.run(registry);

        if let Some(audit) = &self.audit {
            let entry = match &result {
                Ok(report) => AuditEntry::new(Operation::Sync, self.root().uri(), true)
                    .with_detail(format!(
                        "{} manifest(s), {} missing",
                        report.fetched.len(),
                        report.missing.len()
                    )),
                Err(e) => AuditEntry::new(Operation::Sync, self.root().uri(), false)
                    .with_detail(e.to_string()),
            };
            audit.record(entry);
        }

        result
    }

    fn run(&self, registry: &mut ManifestRegistry) -> BkpResult<SyncReport> {
        let root = self.root();
        let lines = self.store.list(&root)?;
        let names = backup_names(&lines);
        tracing::info!(prefix = %root, count = names.len(), "listed remote backups");

        let cache_dir = registry.cache_dir().to_path_buf();
        fs::create_dir_all(&cache_dir)
            .map_err(|e| BkpError::Io(format!("Failed to create manifest cache: {}", e)))?;

        let stale = cached_manifest_files(&cache_dir)?;
        for path in &stale {
            fs::remove_file(path).map_err(|e| {
                BkpError::Io(format!("Failed to remove {}: {}", path.display(), e))
            })?;
        }

        let mut fetched = Vec::new();
        let mut missing = Vec::new();
        for name in names {
            let remote = ObjectKey::manifest_of(&self.bucket, &self.path, &name);
            let local = cache_dir.join(format!("{}.json", name));
            match self.store.get(&remote, &local) {
                Ok(()) => fetched.push(name),
                Err(e) if e.is_external() => {
                    tracing::warn!(backup = %name, error = %e, "no manifest for backup, skipping");
                    if local.exists() {
                        fs::remove_file(&local).map_err(|e| {
                            BkpError::Io(format!("Failed to remove {}: {}", local.display(), e))
                        })?;
                    }
                    missing.push(name);
                }
                Err(e) => return Err(e),
            }
        }

        registry.reload()?;

        Ok(SyncReport {
            fetched,
            removed: stale.len(),
            missing,
        })
    }
}

/// Backup folder names in a raw listing
///
/// Each line's last whitespace-separated token is its leaf; folder leaves
/// end with `/` and their first path segment is the backup name. Plain
/// objects sitting directly under the prefix are not backups and are
/// skipped.
pub fn backup_names(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| line.split_whitespace().last())
        .filter_map(|leaf| {
            if !leaf.ends_with('/') {
                tracing::debug!(leaf, "skipping non-folder entry");
                return None;
            }
            leaf.split('/').next()
        })
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
