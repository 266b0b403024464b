//! Directory archiving
//!
//! Archives keep the backed-up directory's own name as their top-level
//! entry: `tar` runs from the directory's parent.

use std::path::Path;
use std::process::Command;

use crate::error::{BkpError, BkpResult};
use crate::process::CommandRunner;

/// Packs a directory into a compressed archive file
pub trait Archiver {
    fn archive(&self, directory: &Path, destination: &Path) -> BkpResult<()>;
}

/// Builds `.tar.gz` archives with the system `tar`
#[derive(Debug, Clone, Default)]
pub struct TarArchiver {
    runner: CommandRunner,
}

impl TarArchiver {
    pub fn new(runner: CommandRunner) -> Self {
        Self { runner }
    }
}

impl Archiver for TarArchiver {
    fn archive(&self, directory: &Path, destination: &Path) -> BkpResult<()> {
        let directory = directory.canonicalize().map_err(|e| {
            BkpError::Io(format!("Failed to resolve {}: {}", directory.display(), e))
        })?;

        let (parent, leaf) = match (directory.parent(), directory.file_name()) {
            (Some(parent), Some(leaf)) => (parent, leaf),
            _ => {
                return Err(BkpError::Storage(format!(
                    "Cannot archive {}: it has no parent directory",
                    directory.display()
                )))
            }
        };

        let mut cmd = Command::new("tar");
        cmd.arg("-czf")
            .arg(destination)
            .arg("-C")
            .arg(parent)
            .arg(leaf);
        self.runner.run(cmd)?;
        Ok(())
    }
}
