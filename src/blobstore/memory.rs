//! In-process blob store

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use super::{BlobStore, ObjectKey};
use crate::error::{BkpError, BkpResult};

/// Keeps objects in memory and answers listings the way `aws s3 ls` does
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RefCell<BTreeMap<ObjectKey, Vec<u8>>>,
    failing_puts: RefCell<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object directly
    pub fn insert(&self, key: ObjectKey, bytes: impl Into<Vec<u8>>) {
        self.objects.borrow_mut().insert(key, bytes.into());
    }

    /// Contents of an object, if present
    pub fn object(&self, key: &ObjectKey) -> Option<Vec<u8>> {
        self.objects.borrow().get(key).cloned()
    }

    /// Every stored key, sorted
    pub fn keys(&self) -> Vec<ObjectKey> {
        self.objects.borrow().keys().cloned().collect()
    }

    /// Make uploads whose key ends with `suffix` fail
    pub fn fail_puts_ending_with(&self, suffix: impl Into<String>) {
        self.failing_puts.borrow_mut().push(suffix.into());
    }

    fn rejected(action: &str, key: &ObjectKey, reason: &str) -> BkpError {
        BkpError::ExternalTool {
            command: format!("{} {}", action, key),
            status: "exit status: 1".into(),
            output: reason.into(),
        }
    }
}

impl BlobStore for MemoryStore {
    fn put(&self, local: &Path, remote: &ObjectKey) -> BkpResult<()> {
        if self
            .failing_puts
            .borrow()
            .iter()
            .any(|suffix| remote.key().ends_with(suffix.as_str()))
        {
            return Err(Self::rejected("put", remote, "upload rejected"));
        }

        let bytes = fs::read(local)
            .map_err(|e| BkpError::Io(format!("Failed to read {}: {}", local.display(), e)))?;
        self.insert(remote.clone(), bytes);
        Ok(())
    }

    fn get(&self, remote: &ObjectKey, local: &Path) -> BkpResult<()> {
        let bytes = self
            .object(remote)
            .ok_or_else(|| Self::rejected("get", remote, "(404) Not Found"))?;
        fs::write(local, bytes)
            .map_err(|e| BkpError::Io(format!("Failed to write {}: {}", local.display(), e)))?;
        Ok(())
    }

    fn list(&self, prefix: &ObjectKey) -> BkpResult<Vec<String>> {
        let objects = self.objects.borrow();
        let mut folders = BTreeSet::new();
        let mut files = Vec::new();

        for (key, bytes) in objects.iter() {
            if key.bucket() != prefix.bucket() {
                continue;
            }
            let Some(rest) = key.key().strip_prefix(prefix.key()) else {
                continue;
            };
            match rest.split_once('/') {
                Some((folder, _)) => {
                    folders.insert(folder.to_string());
                }
                None => files.push(format!(
                    "1970-01-01 00:00:00 {:>10} {}",
                    bytes.len(),
                    rest
                )),
            }
        }

        let mut lines: Vec<String> = folders
            .into_iter()
            .map(|folder| format!("{:>30} {}/", "PRE", folder))
            .collect();
        lines.extend(files);
        Ok(lines)
    }
}
