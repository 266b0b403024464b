//! Manifest source files
//!
//! A source file is a YAML stream. Each document holds either one manifest
//! mapping or a sequence of them; the generated template uses a sequence.

use std::path::Path;

use serde::Deserialize;

use crate::error::{BkpError, BkpResult};
use crate::models::ManifestDraft;

#[derive(Deserialize)]
#[serde(untagged)]
enum SourceDocument {
    Many(Vec<ManifestDraft>),
    One(ManifestDraft),
}

/// Parse every draft out of YAML text, in file order
pub fn parse_source(text: &str) -> BkpResult<Vec<ManifestDraft>> {
    let mut drafts = Vec::new();

    for document in serde_yaml::Deserializer::from_str(text) {
        let value = serde_yaml::Value::deserialize(document)
            .map_err(|e| BkpError::Yaml(format!("Failed to parse backup file: {}", e)))?;

        if value.is_null() {
            continue;
        }

        let parsed: SourceDocument = serde_yaml::from_value(value)
            .map_err(|e| BkpError::Yaml(format!("Unexpected backup file layout: {}", e)))?;

        match parsed {
            SourceDocument::Many(many) => drafts.extend(many),
            SourceDocument::One(one) => drafts.push(one),
        }
    }

    Ok(drafts)
}

/// Load the drafts from a source file
///
/// A missing file is reported as [`BkpError::SourceMissing`].
pub fn load_source(path: &Path) -> BkpResult<Vec<ManifestDraft>> {
    if !path.exists() {
        return Err(BkpError::SourceMissing(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path)
        .map_err(|e| BkpError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

    parse_source(&text)
}
