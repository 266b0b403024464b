//! Display formatting for terminal output
//!
//! Formats cached manifests and audit entries as plain text for stdout.

pub mod audit;
pub mod manifest;

pub use audit::format_audit_entries;
pub use manifest::{format_manifest_body, format_manifest_list};
