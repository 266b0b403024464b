//! External command execution
//!
//! Every archive, upload, download and listing goes through an external
//! tool. Commands run to completion one at a time; their output is captured
//! and a non-zero exit becomes [`BkpError::ExternalTool`].

use std::process::{Command, Output};

use chrono::Local;

use crate::audit::{AuditEntry, AuditLogger, Operation};
use crate::error::{BkpError, BkpResult};

/// Runs external commands, logging and auditing each one
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    audit: Option<AuditLogger>,
    banner: bool,
}

impl CommandRunner {
    /// Create a runner that only logs
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner that also appends every command to the audit log
    pub fn with_audit(audit: AuditLogger) -> Self {
        Self {
            audit: Some(audit),
            banner: false,
        }
    }

    /// Print a `# Command:` / `# Executed at:` banner to stderr before each command
    pub fn with_banner(mut self) -> Self {
        self.banner = true;
        self
    }

    /// Run a command and wait for it, failing on a non-zero exit
    pub fn run(&self, cmd: Command) -> BkpResult<Output> {
        self.run_accepting(cmd, |output| output.status.success())
    }

    /// Run a command, failing when `accept` rejects its output
    pub fn run_accepting<F>(&self, mut cmd: Command, accept: F) -> BkpResult<Output>
    where
        F: Fn(&Output) -> bool,
    {
        let line = render_command(&cmd);
        let executed_at = Local::now().format("%Y-%m-%d %H:%M:%S %z").to_string();
        if self.banner {
            eprintln!("# Command: {}", line);
            eprintln!("# Executed at: {}", executed_at);
        }
        tracing::info!(command = %line, executed_at = %executed_at, "running command");

        let output = match cmd.output() {
            Ok(output) => output,
            Err(e) => {
                let err = BkpError::ExternalTool {
                    command: line.clone(),
                    status: "not started".into(),
                    output: e.to_string(),
                };
                self.audit(&line, false, Some(err.to_string()));
                return Err(err);
            }
        };

        if !accept(&output) {
            let err = BkpError::ExternalTool {
                command: line.clone(),
                status: output.status.to_string(),
                output: command_summary(&output),
            };
            tracing::error!(command = %line, status = %output.status, "command failed");
            self.audit(&line, false, Some(err.to_string()));
            return Err(err);
        }

        tracing::debug!(command = %line, "command finished");
        self.audit(&line, true, None);
        Ok(output)
    }

    fn audit(&self, line: &str, success: bool, detail: Option<String>) {
        if let Some(logger) = &self.audit {
            let mut entry = AuditEntry::new(Operation::Command, line, success);
            if let Some(detail) = detail {
                entry = entry.with_detail(detail);
            }
            logger.record(entry);
        }
    }
}

/// Render a command as a single shell-like line for logs
pub fn render_command(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().into_owned()];
    parts.extend(cmd.get_args().map(|arg| arg.to_string_lossy().into_owned()));
    parts.join(" ")
}

fn command_summary(out: &Output) -> String {
    let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
    let stdout = String::from_utf8_lossy(&out.stdout).trim().to_string();
    if !stderr.is_empty() {
        return stderr;
    }
    if !stdout.is_empty() {
        return stdout;
    }
    format!("status {}", out.status)
}
