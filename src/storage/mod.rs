//! Storage layer for bkp
//!
//! Provides JSON file storage with atomic writes, the manifest source
//! loader, and the in-memory manifest registry over the local cache.

pub mod file_io;
pub mod registry;
pub mod source;

pub use file_io::{read_json, write_json_atomic};
pub use registry::{cached_manifest_files, ManifestRegistry};
pub use source::{load_source, parse_source};
