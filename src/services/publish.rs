//! Backup publishing
//!
//! Publishing one manifest is four steps run in a private scratch
//! directory: archive the directory, upload the archive, write the manifest
//! JSON, upload the manifest. The scratch directory is removed when
//! `publish` returns, whatever the outcome.

use std::path::Path;

use crate::audit::{AuditEntry, AuditLogger, Operation};
use crate::blobstore::{BlobStore, ObjectKey, MANIFEST_FILE};
use crate::error::{BkpError, BkpResult};
use crate::models::Manifest;
use crate::storage::write_json_atomic;

use super::archive::Archiver;

/// What to do when a publish step fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failing step and return its error
    #[default]
    Abort,
    /// Record the failure and attempt the remaining steps anyway
    Continue,
}

/// Outcome of publishing one manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// Backup name
    pub name: String,
    /// Objects uploaded, in upload order
    pub uploaded: Vec<ObjectKey>,
    /// Failed steps (only populated under [`FailurePolicy::Continue`])
    pub failures: Vec<String>,
}

impl PublishReport {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            uploaded: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// True when every step succeeded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Publishes validated manifests to the blob store
pub struct Publisher<'a> {
    store: &'a dyn BlobStore,
    archiver: &'a dyn Archiver,
    policy: FailurePolicy,
    audit: Option<AuditLogger>,
}

impl<'a> Publisher<'a> {
    /// Create a publisher that aborts on the first failure
    pub fn new(store: &'a dyn BlobStore, archiver: &'a dyn Archiver) -> Self {
        Self {
            store,
            archiver,
            policy: FailurePolicy::default(),
            audit: None,
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Archive and upload one manifest's directory, then its manifest
    pub fn publish(&self, manifest: &Manifest) -> BkpResult<PublishReport> {
        let scratch = tempfile::Builder::new()
            .prefix("bkp-")
            .tempdir()
            .map_err(|e| BkpError::Io(format!("Failed to create scratch directory: {}", e)))?;

        tracing::info!(name = manifest.name(), scratch = %scratch.path().display(), "publishing backup");

        let mut report = PublishReport::new(manifest.name());
        let result = self.run_steps(manifest, scratch.path(), &mut report);

        if let Some(audit) = &self.audit {
            let mut entry = AuditEntry::new(
                Operation::Publish,
                manifest.name(),
                result.is_ok() && report.is_complete(),
            );
            if let Err(e) = &result {
                entry = entry.with_detail(e.to_string());
            } else if !report.is_complete() {
                entry = entry.with_detail(report.failures.join("; "));
            }
            audit.record(entry);
        }

        result.map(|()| report)
    }

    fn run_steps(
        &self,
        manifest: &Manifest,
        scratch: &Path,
        report: &mut PublishReport,
    ) -> BkpResult<()> {
        let archive_path = scratch.join(manifest.archive_file_name());
        let archive_key = manifest.archive_key();
        self.step(
            report,
            "archive",
            self.archiver
                .archive(Path::new(&manifest.directory), &archive_path),
        )?;
        self.upload(report, &archive_path, archive_key)?;

        let manifest_path = scratch.join(MANIFEST_FILE);
        self.step(
            report,
            "write manifest",
            write_json_atomic(&manifest_path, manifest),
        )?;
        self.upload(report, &manifest_path, manifest.manifest_key())?;

        Ok(())
    }

    fn upload(&self, report: &mut PublishReport, local: &Path, remote: ObjectKey) -> BkpResult<()> {
        let what = format!("upload {}", remote);
        if self.step(report, &what, self.store.put(local, &remote))? {
            report.uploaded.push(remote);
        }
        Ok(())
    }

    /// Apply the failure policy to a step result; `Ok(true)` means it succeeded
    fn step(&self, report: &mut PublishReport, what: &str, result: BkpResult<()>) -> BkpResult<bool> {
        match (result, self.policy) {
            (Ok(()), _) => Ok(true),
            (Err(e), FailurePolicy::Abort) => Err(e),
            (Err(e), FailurePolicy::Continue) => {
                tracing::error!(step = what, error = %e, "publish step failed, continuing");
                report.failures.push(format!("{}: {}", what, e));
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blobstore::MemoryStore;
    use crate::models::manifest::tests::draft;
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Writes a fixed payload and remembers where it wrote it
    #[derive(Default)]
    struct FakeArchiver {
        destinations: RefCell<Vec<PathBuf>>,
        fail: bool,
    }

    impl Archiver for FakeArchiver {
        fn archive(&self, _directory: &Path, destination: &Path) -> BkpResult<()> {
            self.destinations.borrow_mut().push(destination.to_path_buf());
            if self.fail {
                return Err(BkpError::ExternalTool {
                    command: "tar".into(),
                    status: "exit status: 2".into(),
                    output: "tar: boom".into(),
                });
            }
            fs::write(destination, b"archive-bytes")?;
            Ok(())
        }
    }

    fn manifest() -> Manifest {
        Manifest::try_from(draft("Nightly DB Dump", "2024-03-05")).unwrap()
    }

    #[test]
    fn test_publish_uploads_exactly_two_objects() {
        let store = MemoryStore::new();
        let archiver = FakeArchiver::default();

        let report = Publisher::new(&store, &archiver).publish(&manifest()).unwrap();

        let keys: Vec<String> = store.keys().iter().map(|k| k.to_string()).collect();
        assert_eq!(
            keys,
            [
                "s3://my-backups/team/db/2024-03-05-nightly-db-dump/2024-03-05-nightly-db-dump.tar.gz",
                "s3://my-backups/team/db/2024-03-05-nightly-db-dump/manifest.json",
            ]
        );
        assert!(report.is_complete());
        assert_eq!(report.uploaded.len(), 2);
    }

    #[test]
    fn test_uploaded_manifest_carries_name() {
        let store = MemoryStore::new();
        let archiver = FakeArchiver::default();
        let manifest = manifest();

        Publisher::new(&store, &archiver).publish(&manifest).unwrap();

        let bytes = store.object(&manifest.manifest_key()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["name"], "2024-03-05-nightly-db-dump");
        assert_eq!(
            store.object(&manifest.archive_key()).unwrap(),
            b"archive-bytes"
        );
    }

    #[test]
    fn test_scratch_directory_removed_on_success_and_failure() {
        let store = MemoryStore::new();

        let ok = FakeArchiver::default();
        Publisher::new(&store, &ok).publish(&manifest()).unwrap();

        let failing = FakeArchiver {
            fail: true,
            ..Default::default()
        };
        assert!(Publisher::new(&store, &failing).publish(&manifest()).is_err());

        for archiver in [&ok, &failing] {
            let destination = archiver.destinations.borrow()[0].clone();
            assert!(!destination.parent().unwrap().exists());
        }
    }

    #[test]
    fn test_abort_stops_after_failed_archive_upload() {
        let store = MemoryStore::new();
        store.fail_puts_ending_with(".tar.gz");
        let archiver = FakeArchiver::default();

        let err = Publisher::new(&store, &archiver)
            .publish(&manifest())
            .unwrap_err();

        assert!(err.is_external());
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_continue_still_uploads_manifest() {
        let store = MemoryStore::new();
        store.fail_puts_ending_with(".tar.gz");
        let archiver = FakeArchiver::default();
        let manifest = manifest();

        let report = Publisher::new(&store, &archiver)
            .with_policy(FailurePolicy::Continue)
            .publish(&manifest)
            .unwrap();

        assert!(!report.is_complete());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.uploaded, vec![manifest.manifest_key()]);
    }

    #[test]
    fn test_publish_is_audited() {
        let temp = TempDir::new().unwrap();
        let audit = AuditLogger::new(temp.path().join("audit.log"));
        let store = MemoryStore::new();
        let archiver = FakeArchiver::default();

        Publisher::new(&store, &archiver)
            .with_audit(audit.clone())
            .publish(&manifest())
            .unwrap();

        let entries = audit.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Publish);
        assert!(entries[0].success);
    }
}
