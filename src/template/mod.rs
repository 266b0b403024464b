//! Manifest template generation
//!
//! The template is a fixed YAML text with `{{ placeholder }}` markers. It is
//! rendered from an explicit map of values, each YAML-quoted before
//! insertion, and any marker without a value is an error.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};

use crate::config::Config;
use crate::error::{BkpError, BkpResult};

const TEMPLATE: &str = "---
-
  # A short one line easy to understand summary of what the backup is for.
  summary:

  # Some context about the backup (why are we doing this?)
  background: |-
    This is a backup of the database for the website.
    You can find the website at http://www.example.com

    It is important to backup the database because it contains all the information for the website.

  # The local directory you want to backup
  directory: ./mydata

  # The date of the backup
  date: {{ date }}

  # Who created the backup. (usually your name)
  owner:

  # The ticket url associated with the backup
  ticket: ''

  # The bucket where the backup will be stored
  # (probably okay to keep as is)
  bucket: {{ bucket }}

  # The path where all the backups are stored in the bucket
  # Think about it this way: bucket/path/[backups live here]
  # (probably okay to keep as is)
  path: {{ path }}
";

/// Named values substituted into a template
#[derive(Debug, Clone, Default)]
pub struct TemplateValues {
    values: BTreeMap<&'static str, String>,
}

impl TemplateValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a placeholder's value; it is YAML-quoted on insertion
    pub fn set(mut self, placeholder: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(placeholder, value.into());
        self
    }

    /// Values for a fresh manifest template
    pub fn for_new_backup(config: &Config, now: DateTime<Local>) -> Self {
        Self::new()
            .set("date", now.format("%Y-%m-%d %H:%M:%S %z").to_string())
            .set("bucket", config.bucket.clone())
            .set("path", config.path.clone())
    }
}

/// Render the manifest template for `config` at time `now`
pub fn generate_template(config: &Config, now: DateTime<Local>) -> BkpResult<String> {
    render(TEMPLATE, &TemplateValues::for_new_backup(config, now))
}

/// Fill every `{{ name }}` marker in `template` from `values`
pub fn render(template: &str, values: &TemplateValues) -> BkpResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| BkpError::Template("unterminated placeholder".into()))?;

        let name = after[..end].trim();
        let value = values
            .values
            .get(name)
            .ok_or_else(|| BkpError::Template(format!("no value for placeholder '{}'", name)))?;
        out.push_str(&yaml_scalar(value)?);

        rest = &after[end + 2..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Quote a value as a single-line YAML scalar
fn yaml_scalar(value: &str) -> BkpResult<String> {
    if value.contains(['\n', '\r']) {
        return Err(BkpError::Template(format!(
            "value {:?} spans several lines",
            value
        )));
    }
    let rendered = serde_yaml::to_string(value)
        .map_err(|e| BkpError::Template(format!("cannot render value: {}", e)))?;
    Ok(rendered.trim_end().to_string())
}
