//! `aws` CLI backed blob store

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use super::{BlobStore, ObjectKey};
use crate::error::BkpResult;
use crate::process::CommandRunner;

/// Talks to S3 through `aws s3 cp` and `aws s3 ls`
#[derive(Debug, Clone)]
pub struct AwsCliStore {
    program: OsString,
    global_args: Vec<OsString>,
    runner: CommandRunner,
}

impl AwsCliStore {
    /// Use the `aws` binary found on `PATH`
    pub fn new(runner: CommandRunner) -> Self {
        Self::with_program("aws", runner)
    }

    /// Use a specific executable in place of `aws`
    pub fn with_program(program: impl Into<OsString>, runner: CommandRunner) -> Self {
        Self {
            program: program.into(),
            global_args: Vec::new(),
            runner,
        }
    }

    /// Pass `--profile <name>` to every invocation
    pub fn with_profile(self, profile: &str) -> Self {
        self.global_arg("--profile").global_arg(profile)
    }

    /// Add an argument placed before the `s3` subcommand
    pub fn global_arg(mut self, arg: impl Into<OsString>) -> Self {
        self.global_args.push(arg.into());
        self
    }

    fn s3(&self, subcommand: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.global_args).arg("s3").arg(subcommand);
        cmd
    }
}

impl BlobStore for AwsCliStore {
    fn put(&self, local: &Path, remote: &ObjectKey) -> BkpResult<()> {
        let mut cmd = self.s3("cp");
        cmd.arg(local).arg(remote.uri());
        self.runner.run(cmd)?;
        Ok(())
    }

    fn get(&self, remote: &ObjectKey, local: &Path) -> BkpResult<()> {
        let mut cmd = self.s3("cp");
        cmd.arg(remote.uri()).arg(local);
        self.runner.run(cmd)?;
        Ok(())
    }

    /// `aws s3 ls` exits 1 without output when nothing is under the prefix
    fn list(&self, prefix: &ObjectKey) -> BkpResult<Vec<String>> {
        let mut cmd = self.s3("ls");
        cmd.arg(prefix.uri());
        let output = self.runner.run_accepting(cmd, |out| {
            out.status.success()
                || (out.status.code() == Some(1) && out.stdout.is_empty() && out.stderr.is_empty())
        })?;

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Write a stand-in `aws` script that records its arguments
    fn fake_aws(dir: &TempDir, body: &str) -> AwsCliStore {
        let script = write_script(dir, body);
        AwsCliStore::with_program("sh", CommandRunner::new()).global_arg(script)
    }

    fn write_script(dir: &TempDir, body: &str) -> PathBuf {
        let script = dir.path().join("aws");
        let calls = dir.path().join("calls.txt");
        fs::write(
            &script,
            format!(
                "#!/bin/sh\necho \"$@\" >> '{}'\n{}\n",
                calls.display(),
                body
            ),
        )
        .unwrap();
        script
    }

    fn calls(dir: &TempDir) -> String {
        fs::read_to_string(dir.path().join("calls.txt")).unwrap()
    }

    #[test]
    fn test_put_and_get_use_s3_cp() {
        let dir = TempDir::new().unwrap();
        let store = fake_aws(&dir, "exit 0");
        let key = ObjectKey::manifest_of("b", "p", "n");

        store.put(Path::new("/tmp/manifest.json"), &key).unwrap();
        store.get(&key, Path::new("/tmp/n.json")).unwrap();

        let calls = calls(&dir);
        assert!(calls.contains("s3 cp /tmp/manifest.json s3://b/p/n/manifest.json"));
        assert!(calls.contains("s3 cp s3://b/p/n/manifest.json /tmp/n.json"));
    }

    #[test]
    fn test_list_returns_stdout_lines() {
        let dir = TempDir::new().unwrap();
        let body = "printf '                           PRE 2024-03-05-a/\\n                           PRE 2024-03-06-b/\\n'";
        let store = fake_aws(&dir, body);

        let lines = store.list(&ObjectKey::backups_root("b", "p")).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with("PRE 2024-03-06-b/"));
        assert!(calls(&dir).contains("s3 ls s3://b/p/"));
    }

    #[test]
    fn test_profile_goes_before_subcommand() {
        let dir = TempDir::new().unwrap();
        let store = fake_aws(&dir, "exit 0").with_profile("backups");

        store.list(&ObjectKey::backups_root("b", "p")).unwrap();
        assert!(calls(&dir).contains("--profile backups s3 ls s3://b/p/"));
    }

    #[test]
    fn test_silent_exit_one_lists_nothing() {
        let dir = TempDir::new().unwrap();
        let store = fake_aws(&dir, "exit 1");

        let lines = store.list(&ObjectKey::backups_root("b", "p")).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_list_failure_with_message_is_error() {
        let dir = TempDir::new().unwrap();
        let store = fake_aws(&dir, "echo 'An error occurred (AccessDenied)' >&2; exit 1");

        let err = store.list(&ObjectKey::backups_root("b", "p")).unwrap_err();
        assert!(err.is_external());
    }

    #[test]
    fn test_nonzero_exit_is_error() {
        let dir = TempDir::new().unwrap();
        let store = fake_aws(&dir, "exit 1");

        let err = store
            .put(Path::new("/tmp/x"), &ObjectKey::new("b", "k"))
            .unwrap_err();
        assert!(err.is_external());
    }
}
