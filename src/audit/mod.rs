//! Audit logging system for bkp
//!
//! Records every external command, publish and catalog sync in an
//! append-only audit log.
//!
//! # Architecture
//!
//! - `AuditEntry`: a single log entry with timestamp, operation, subject and
//!   outcome.
//! - `AuditLogger`: writes entries to the audit log file using a
//!   line-delimited JSON format (JSONL).
//!
//! # Example
//!
//! ```rust,ignore
//! use bkp::audit::{AuditEntry, AuditLogger, Operation};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::new(Operation::Publish, manifest.name(), true))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
