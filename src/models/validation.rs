//! Manifest validation
//!
//! Fields are checked in a fixed order and the first failure stops the
//! whole batch: nothing is published unless every draft is valid.

use std::fmt;
use std::path::Path;

use thiserror::Error;

use super::manifest::{Manifest, ManifestDraft};
use super::naming::parse_date;

/// Longest allowed summary, in characters
pub const SUMMARY_MAX_CHARS: usize = 80;

/// Shortest allowed background, in characters
pub const BACKGROUND_MIN_CHARS: usize = 80;

/// A manifest field subject to validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Summary,
    Background,
    Directory,
    Date,
    Owner,
    Ticket,
    Bucket,
    Path,
}

impl Field {
    /// Validation order
    pub const ORDER: [Field; 8] = [
        Field::Summary,
        Field::Background,
        Field::Directory,
        Field::Date,
        Field::Owner,
        Field::Ticket,
        Field::Bucket,
        Field::Path,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Summary => "summary",
            Field::Background => "background",
            Field::Directory => "directory",
            Field::Date => "date",
            Field::Owner => "owner",
            Field::Ticket => "ticket",
            Field::Bucket => "bucket",
            Field::Path => "path",
        }
    }

    fn value<'a>(&self, draft: &'a ManifestDraft) -> Option<&'a str> {
        let value = match self {
            Field::Summary => &draft.summary,
            Field::Background => &draft.background,
            Field::Directory => &draft.directory,
            Field::Date => &draft.date,
            Field::Owner => &draft.owner,
            Field::Ticket => &draft.ticket,
            Field::Bucket => &draft.bucket,
            Field::Path => &draft.path,
        };
        value.as_deref()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a field was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    /// Field absent or null
    Missing,
    /// Field present but empty
    Empty,
    /// Longer than allowed; carries the character count
    TooLong(usize),
    /// Shorter than required; carries the character count
    TooShort(usize),
    /// Directory does not exist (or is not a directory)
    DirectoryMissing(String),
    /// Date text did not parse
    InvalidDate(String),
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Missing => write!(f, "is empty: nil"),
            Reason::Empty => write!(f, "is empty: \"\""),
            Reason::TooLong(n) => write!(f, "is too long: {} characters", n),
            Reason::TooShort(n) => write!(f, "is too short: {} characters", n),
            Reason::DirectoryMissing(dir) => write!(f, "does not exist: {:?}", dir),
            Reason::InvalidDate(date) => write!(f, "is not a valid date: {:?}", date),
        }
    }
}

/// A validation failure for one field of one backup in a batch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Backup({index}) {field} {reason}")]
pub struct ValidationError {
    /// Position of the backup in its source file
    pub index: usize,
    pub field: Field,
    pub reason: Reason,
}

impl ValidationError {
    pub fn new(index: usize, field: Field, reason: Reason) -> Self {
        Self {
            index,
            field,
            reason,
        }
    }
}

/// Validate one draft and turn it into a named manifest
///
/// The directory check hits the filesystem now, not at publish time.
pub fn validate(draft: &ManifestDraft, index: usize) -> Result<Manifest, ValidationError> {
    for field in Field::ORDER {
        check_field(field, field.value(draft))
            .map_err(|reason| ValidationError::new(index, field, reason))?;
    }

    Manifest::try_from(draft.clone())
        .map_err(|e| ValidationError::new(index, Field::Date, Reason::InvalidDate(e.0)))
}

/// Validate every draft in order, stopping at the first failure
pub fn validate_batch(drafts: &[ManifestDraft]) -> Result<Vec<Manifest>, ValidationError> {
    drafts
        .iter()
        .enumerate()
        .map(|(index, draft)| validate(draft, index))
        .collect()
}

fn check_field(field: Field, value: Option<&str>) -> Result<(), Reason> {
    let value = match value {
        None => return Err(Reason::Missing),
        Some("") => return Err(Reason::Empty),
        Some(value) => value,
    };

    match field {
        Field::Summary => {
            let len = value.chars().count();
            if len > SUMMARY_MAX_CHARS {
                return Err(Reason::TooLong(len));
            }
        }
        Field::Background => {
            let len = value.chars().count();
            if len < BACKGROUND_MIN_CHARS {
                return Err(Reason::TooShort(len));
            }
        }
        Field::Directory => {
            if !Path::new(value).is_dir() {
                return Err(Reason::DirectoryMissing(value.to_string()));
            }
        }
        Field::Date => {
            if parse_date(value).is_none() {
                return Err(Reason::InvalidDate(value.to_string()));
            }
        }
        Field::Owner | Field::Ticket | Field::Bucket | Field::Path => {}
    }

    Ok(())
}
