//! Backup manifest model
//!
//! A manifest describes one published backup. Users write drafts in a YAML
//! source file; validated drafts become [`Manifest`]s, whose `name` is always
//! recomputed from `date` and `summary`.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};

use super::naming::{derive_name, parse_date};
use crate::blobstore::ObjectKey;

/// Manifest fields as written by the user, before validation
///
/// Every field is optional so that a missing or `null` value can be told
/// apart from an empty string in validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDraft {
    #[serde(default, deserialize_with = "scalar_text")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub background: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub directory: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub owner: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub ticket: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub bucket: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub path: Option<String>,
    /// Accepted so published manifests can be read back; never trusted
    #[serde(default, skip_serializing)]
    pub name: Option<String>,
}

/// Accept any YAML/JSON scalar as text so `ticket: 42` reads as `"42"`
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_yaml::Value;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(de::Error::custom("expected a plain value")),
    }
}

/// A named backup manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ManifestDraft")]
pub struct Manifest {
    /// Short one-line description of the backup
    pub summary: String,
    /// Why the backup was taken
    pub background: String,
    /// Local directory that was archived
    pub directory: String,
    /// Backup date as written by the owner
    pub date: String,
    /// Who created the backup
    pub owner: String,
    /// Ticket URL associated with the backup
    pub ticket: String,
    /// Bucket holding the backup
    pub bucket: String,
    /// Prefix inside the bucket that holds all backups
    pub path: String,
    name: String,
}

/// The manifest date could not be parsed, so no name can be derived
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnparseableDate(pub String);

impl fmt::Display for UnparseableDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "date is not a valid date: {:?}", self.0)
    }
}

impl TryFrom<ManifestDraft> for Manifest {
    type Error = UnparseableDate;

    fn try_from(draft: ManifestDraft) -> Result<Self, Self::Error> {
        let date = draft.date.unwrap_or_default();
        let summary = draft.summary.unwrap_or_default();
        let day = parse_date(&date).ok_or_else(|| UnparseableDate(date.clone()))?;
        let name = derive_name(day, &summary);

        Ok(Self {
            summary,
            background: draft.background.unwrap_or_default(),
            directory: draft.directory.unwrap_or_default(),
            date,
            owner: draft.owner.unwrap_or_default(),
            ticket: draft.ticket.unwrap_or_default(),
            bucket: draft.bucket.unwrap_or_default(),
            path: draft.path.unwrap_or_default(),
            name,
        })
    }
}

impl Manifest {
    /// The derived backup name, `<YYYY-MM-DD>-<slug>`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File name of the archive inside the backup folder
    pub fn archive_file_name(&self) -> String {
        format!("{}.tar.gz", self.name)
    }

    /// Remote key of the archive: `<bucket>/<path>/<name>/<name>.tar.gz`
    pub fn archive_key(&self) -> ObjectKey {
        ObjectKey::in_backup(&self.bucket, &self.path, &self.name, &self.archive_file_name())
    }

    /// Remote key of the manifest: `<bucket>/<path>/<name>/manifest.json`
    pub fn manifest_key(&self) -> ObjectKey {
        ObjectKey::manifest_of(&self.bucket, &self.path, &self.name)
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.summary)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn draft(summary: &str, date: &str) -> ManifestDraft {
        ManifestDraft {
            summary: Some(summary.into()),
            background: Some("b".repeat(80)),
            directory: Some(".".into()),
            date: Some(date.into()),
            owner: Some("alex".into()),
            ticket: Some("https://tickets.example.com/OPS-1".into()),
            bucket: Some("my-backups".into()),
            path: Some("team/db".into()),
            name: None,
        }
    }

    #[test]
    fn test_name_is_derived() {
        let manifest = Manifest::try_from(draft("Nightly DB Dump", "2024-03-05")).unwrap();
        assert_eq!(manifest.name(), "2024-03-05-nightly-db-dump");
    }

    #[test]
    fn test_stored_name_is_ignored() {
        let json = serde_json::json!({
            "summary": "Nightly DB Dump",
            "background": "b",
            "directory": "/data",
            "date": "2024-03-05 01:00:00 +0000",
            "owner": "alex",
            "ticket": "OPS-1",
            "bucket": "my-backups",
            "path": "team/db",
            "name": "something-else"
        });

        let manifest: Manifest = serde_json::from_value(json).unwrap();
        assert_eq!(manifest.name(), "2024-03-05-nightly-db-dump");
    }

    #[test]
    fn test_serialized_manifest_includes_name() {
        let manifest = Manifest::try_from(draft("Nightly DB Dump", "2024-03-05")).unwrap();
        let value = serde_json::to_value(&manifest).unwrap();

        assert_eq!(value["name"], "2024-03-05-nightly-db-dump");
        assert_eq!(value["summary"], "Nightly DB Dump");
    }

    #[test]
    fn test_unparseable_date_is_rejected() {
        let err = Manifest::try_from(draft("x", "not a date")).unwrap_err();
        assert_eq!(err, UnparseableDate("not a date".into()));
    }

    #[test]
    fn test_remote_keys() {
        let manifest = Manifest::try_from(draft("Nightly DB Dump", "2024-03-05")).unwrap();

        assert_eq!(
            manifest.archive_key().to_string(),
            "s3://my-backups/team/db/2024-03-05-nightly-db-dump/2024-03-05-nightly-db-dump.tar.gz"
        );
        assert_eq!(
            manifest.manifest_key().to_string(),
            "s3://my-backups/team/db/2024-03-05-nightly-db-dump/manifest.json"
        );
    }
}
