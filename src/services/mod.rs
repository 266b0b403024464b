//! Service layer for bkp
//!
//! The service layer orchestrates the blob store, the archiver and the
//! local cache: publishing new backups and syncing the catalog.

pub mod archive;
pub mod catalog;
pub mod publish;

pub use archive::{Archiver, TarArchiver};
pub use catalog::{backup_names, CatalogSyncer, SyncReport};
pub use publish::{FailurePolicy, PublishReport, Publisher};
