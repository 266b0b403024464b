//! Blob store collaborator
//!
//! bkp only ever needs three things from object storage: upload a local
//! file, download an object to a local file, and list what sits under a
//! prefix. [`BlobStore`] is that seam; [`AwsCliStore`] fulfils it with the
//! `aws` command-line tool and [`MemoryStore`] keeps objects in process.

mod aws;
mod key;
mod memory;

use std::path::Path;

use crate::error::BkpResult;

pub use aws::AwsCliStore;
pub use key::{ObjectKey, MANIFEST_FILE};
pub use memory::MemoryStore;

/// Object storage operations consumed by the publisher and catalog syncer
pub trait BlobStore {
    /// Upload a local file to `remote`
    fn put(&self, local: &Path, remote: &ObjectKey) -> BkpResult<()>;

    /// Download `remote` into a local file
    fn get(&self, remote: &ObjectKey, local: &Path) -> BkpResult<()>;

    /// List entries directly under `prefix`, one raw listing line each
    ///
    /// Lines follow `aws s3 ls`: the last whitespace-separated token is the
    /// entry's leaf name, with a trailing `/` for folders.
    fn list(&self, prefix: &ObjectKey) -> BkpResult<Vec<String>>;
}
