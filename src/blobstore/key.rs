//! Remote object keys
//!
//! Backups live at `<bucket>/<path>/<name>/`, one folder per backup holding
//! the archive and `manifest.json`.

use std::fmt;

/// File name of the manifest inside every backup folder
pub const MANIFEST_FILE: &str = "manifest.json";

/// A bucket plus a key (or key prefix) inside it
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectKey {
    bucket: String,
    key: String,
}

impl ObjectKey {
    /// Create a key from raw parts
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// The prefix that holds every backup folder: `<path>/`
    pub fn backups_root(bucket: &str, path: &str) -> Self {
        let root = join_segments(&[path]);
        let key = if root.is_empty() {
            root
        } else {
            format!("{}/", root)
        };
        Self::new(bucket, key)
    }

    /// A file inside a backup folder: `<path>/<name>/<file>`
    pub fn in_backup(bucket: &str, path: &str, name: &str, file: &str) -> Self {
        Self::new(bucket, join_segments(&[path, name, file]))
    }

    /// The manifest of a backup: `<path>/<name>/manifest.json`
    pub fn manifest_of(bucket: &str, path: &str, name: &str) -> Self {
        Self::in_backup(bucket, path, name, MANIFEST_FILE)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// `s3://<bucket>/<key>`
    pub fn uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

fn join_segments(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim_matches('/'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
