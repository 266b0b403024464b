//! Core data models for bkp
//!
//! - `manifest`: manifest drafts and named manifests
//! - `naming`: slug and backup name derivation
//! - `validation`: field rules applied to drafts

pub mod manifest;
pub mod naming;
pub mod validation;

pub use manifest::{Manifest, ManifestDraft};
pub use naming::{derive_name, parse_date, slug};
pub use validation::{validate, validate_batch, Field, Reason, ValidationError};
