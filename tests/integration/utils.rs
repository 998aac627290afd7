//! Utility functions to help run our CLI as part of a test
use assert_cmd::Command;
use assert_fs::TempDir;
use std::{path::Path, process};

pub(crate) struct TestFs {
    pub(crate) home: TempDir,
    pub(crate) cwd: TempDir,
}

impl TestFs {
    fn new() -> Self {
        let home = TempDir::with_prefix("release-tools-home-").unwrap();
        let cwd = TempDir::with_prefix("release-tools-cwd-").unwrap();

        Self { home, cwd }
    }
}

/// Represents the `release-tools` binary for use in tests.
pub(crate) struct ReleaseTools {
    pub(crate) cmd: Command,
    pub(crate) test_fs: Option<TestFs>,
}

impl ReleaseTools {
    /// Creates a new `ReleaseTools` that locates the bin
    pub(crate) fn find() -> Self {
        Self {
            cmd: Command::cargo_bin("release-tools").unwrap(),
            test_fs: None,
        }
    }

    /// Run the command in an isolated filesystem so config files and environment variables from
    /// the host can't leak into the result.
    pub(crate) fn with_test_fs() -> Self {
        let mut me = Self::find();
        let test_fs = TestFs::new();

        me.cmd
            .current_dir(test_fs.cwd.path())
            .env("HOME", test_fs.home.path())
            .env("XDG_CONFIG_HOME", test_fs.home.path().join(".config"))
            .env_remove("RELEASE_TOOLS_BUILT_BY")
            .env_remove("RELEASE_TOOLS_TOOLCHAIN")
            .env_remove("RELEASE_TOOLS_LOG")
            .env_remove("RUST_LOG");

        me.test_fs = Some(test_fs);
        me
    }

    pub(crate) fn test_fs(&self) -> &TestFs {
        self.test_fs.as_ref().expect("test_fs not set")
    }
}

/// Commit time of every commit made by [`git`]: 2021-03-04T05:06:07Z.
const COMMIT_DATE: &str = "@1614834367 +0000";

/// Run the `git` binary in `dir` with a fixed identity and commit date, returning its trimmed
/// stdout.
pub(crate) fn git(dir: &Path, args: &[&str]) -> String {
    let output = process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_CONFIG_GLOBAL", "/dev/null")
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GIT_AUTHOR_NAME", "Release Tools")
        .env("GIT_AUTHOR_EMAIL", "release-tools@example.com")
        .env("GIT_AUTHOR_DATE", COMMIT_DATE)
        .env("GIT_COMMITTER_NAME", "Release Tools")
        .env("GIT_COMMITTER_EMAIL", "release-tools@example.com")
        .env("GIT_COMMITTER_DATE", COMMIT_DATE)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

/// Turn `dir` into a repository with a single commit tagged `tag`, returning the commit hash.
pub(crate) fn init_tagged_repo(dir: &Path, tag: &str) -> String {
    git(dir, &["init", "--quiet"]);
    std::fs::write(dir.join("main.go"), "package main\n").unwrap();
    git(dir, &["add", "main.go"]);
    git(dir, &["commit", "--quiet", "--message", "initial"]);
    git(dir, &["tag", "--annotate", tag, "--message", tag]);

    git(dir, &["rev-parse", "HEAD"])
}
