//! Common test utilities for Blueprint CLI tests.
//!
//! Provides `TestEnv`: an isolated workspace plus an isolated HOME, and a
//! helper to run the `blueprint` binary against them.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Result of running a Blueprint CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse stdout as NDJSON
    pub fn events(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("bad NDJSON line {l:?}: {e}")))
            .collect()
    }
}

/// Isolated workspace and HOME
pub struct TestEnv {
    pub workspace: TempDir,
    pub home: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            workspace: TempDir::new().unwrap(),
            home: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.workspace.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) -> &Self {
        let path = self.path(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
        self
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("cannot read {relative}: {e}"))
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }

    /// Run `blueprint --root <workspace> <args>`
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_from(self.workspace.path(), args, true)
    }

    /// Run from `cwd`, optionally passing `--root`
    pub fn run_from(&self, cwd: &Path, args: &[&str], with_root: bool) -> TestResult {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_blueprint"));
        cmd.current_dir(cwd)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"))
            .env_remove("RUST_LOG")
            .env_remove("BLUEPRINT_INTERNAL_DIR")
            .env_remove("BLUEPRINT_DEBOUNCE_MS")
            .env_remove("BLUEPRINT_RECONCILE");
        if with_root {
            cmd.arg("--root").arg(self.workspace.path());
        }
        let output = cmd.args(args).output().expect("failed to execute blueprint");
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Two decisions, the second superseding the first
pub const FIRST: &str = "title = \"Use PostgreSQL\"\nstatus = \"superseded\"\n";
pub const SECOND: &str =
    "title = \"Use CockroachDB\"\nstatus = \"accepted\"\nsupersedes = [\"0001\"]\n";
