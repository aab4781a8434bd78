//! Shared helpers for the CLI specs
//!
//! Every test gets its own temporary data directory and drives the `wk`
//! binary against it through `WK_DATA_DIR`.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway data directory
pub struct Project {
    dir: TempDir,
}

impl Project {
    /// An empty data directory; nothing initialized
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// A data directory after `wk init`
    pub fn initialized() -> Self {
        let project = Self::empty();
        project.wk().arg("init").passes();
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the data directory
    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(rel)).unwrap()
    }

    /// `wk` bound to this data directory
    pub fn wk(&self) -> CliBuilder {
        let mut cmd = Command::cargo_bin("wk").unwrap();
        cmd.env("WK_DATA_DIR", self.dir.path())
            .env("RUST_LOG", "warn");
        CliBuilder { cmd }
    }

    /// Run `wk --format json <args>` and parse stdout
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let mut full = vec!["--format", "json"];
        full.extend_from_slice(args);
        let out = self.wk().args(&full).passes();
        serde_json::from_str(&out.stdout).unwrap()
    }
}

/// `wk` with no data directory, for help and argument errors
pub fn cli() -> CliBuilder {
    CliBuilder {
        cmd: Command::cargo_bin("wk").unwrap(),
    }
}

pub struct CliBuilder {
    cmd: Command,
}

impl CliBuilder {
    pub fn arg(mut self, arg: &str) -> Self {
        self.cmd.arg(arg);
        self
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    fn run(mut self) -> RunAssert {
        let output = self.cmd.output().unwrap();
        RunAssert {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    /// Run and expect exit code 0
    pub fn passes(self) -> RunAssert {
        let run = self.run();
        assert_eq!(
            run.code,
            Some(0),
            "expected success\nstdout:\n{}\nstderr:\n{}",
            run.stdout,
            run.stderr
        );
        run
    }

    /// Run and expect a non-zero exit code
    pub fn fails(self) -> RunAssert {
        let run = self.run();
        assert_ne!(
            run.code,
            Some(0),
            "expected failure\nstdout:\n{}\nstderr:\n{}",
            run.stdout,
            run.stderr
        );
        run
    }
}

pub struct RunAssert {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RunAssert {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(
            self.stdout.contains(needle),
            "stdout does not contain {needle:?}\nstdout:\n{}",
            self.stdout
        );
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(
            !self.stdout.contains(needle),
            "stdout unexpectedly contains {needle:?}\nstdout:\n{}",
            self.stdout
        );
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(
            self.stderr.contains(needle),
            "stderr does not contain {needle:?}\nstderr:\n{}",
            self.stderr
        );
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout.trim_end(), expected.trim_end());
        self
    }
}
