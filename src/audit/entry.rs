//! Audit entry data structures
//!
//! Defines the structure of audit log entries and the operations that are
//! recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Types of operations that are audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// An external command was executed
    Command,
    /// A backup was published
    Publish,
    /// The local catalog was rebuilt from the remote listing
    Sync,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Command => write!(f, "COMMAND"),
            Operation::Publish => write!(f, "PUBLISH"),
            Operation::Sync => write!(f, "SYNC"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// Type of operation performed
    pub operation: Operation,

    /// What the operation acted on (command line, backup name, remote prefix)
    pub subject: String,

    /// Whether the operation succeeded
    pub success: bool,

    /// Extra context, usually the failure message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AuditEntry {
    /// Create a new entry stamped with the current time
    pub fn new(operation: Operation, subject: impl Into<String>, success: bool) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            subject: subject.into(),
            success,
            detail: None,
        }
    }

    /// Attach extra context to the entry
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Format the entry as a human-readable line
    pub fn format_human_readable(&self) -> String {
        let status = if self.success { "ok" } else { "FAILED" };
        let mut line = format!(
            "[{}] {} {} ({})",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.subject,
            status
        );

        if let Some(detail) = &self.detail {
            line.push_str(&format!("\n  {}", detail));
        }

        line
    }
}
