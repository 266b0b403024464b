//! bkp - personal backup bookkeeping
//!
//! This library provides the core functionality for the `bkp` command line
//! tool. Backups are described by YAML manifests; each validated manifest is
//! archived and uploaded to S3 next to a `manifest.json`, and the published
//! manifests can be mirrored back into a local catalog for browsing.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and the persisted bucket/path config
//! - `error`: Custom error types
//! - `models`: Manifests, name derivation and validation
//! - `storage`: JSON file I/O, the manifest source loader and the registry
//! - `blobstore`: Object storage behind a trait, backed by the `aws` CLI
//! - `process`: External command execution
//! - `services`: Publishing backups and syncing the catalog
//! - `template`: Manifest template rendering
//! - `audit`: Audit logging system
//! - `display`: Terminal output formatting
//! - `setup`: First-run config prompt
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use bkp::config::{BkpPaths, Config};
//! use bkp::storage::ManifestRegistry;
//!
//! let paths = BkpPaths::new()?;
//! let config = Config::load(&paths)?;
//! let mut registry = ManifestRegistry::new(paths.manifests_dir());
//! registry.load()?;
//! ```

pub mod audit;
pub mod blobstore;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod process;
pub mod services;
pub mod setup;
pub mod storage;
pub mod template;

pub use error::{BkpError, BkpResult};
