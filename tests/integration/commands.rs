//! Rendering of build, install and test commands through the CLI
use crate::utils::{ReleaseTools, init_tagged_repo};
use assert_json_diff::assert_json_eq;
use predicates::prelude::*;
use serde_json::json;

#[test]
fn build_defaults_as_shell() {
    let mut rt = ReleaseTools::with_test_fs();

    rt.cmd
        .arg("build")
        .assert()
        .success()
        .stdout("CGO_ENABLED=0 go build -trimpath -ldflags '-s -w' ./...\n");
}

#[test]
fn install_with_packages_and_built_by_as_json() {
    let mut rt = ReleaseTools::with_test_fs();

    let output = rt
        .cmd
        .args(["install", "-p", "./cmd/one", "-p", "./cmd/two", "--built-by", "bob"])
        .args(["--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let actual: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_json_eq!(
        actual,
        json!({
            "program": "go",
            "env": { "CGO_ENABLED": "0" },
            "args": [
                "install",
                "-trimpath",
                "-ldflags",
                "-s -w -X main.builtBy=bob",
                "./cmd/one",
                "./cmd/two"
            ]
        })
    );
}

#[test]
fn test_with_cover_profile() {
    let mut rt = ReleaseTools::with_test_fs();

    rt.cmd
        .args(["test", "--cover-profile", "cover.out"])
        .assert()
        .success()
        .stdout("go test -race -coverprofile cover.out ./...\n");
}

#[test]
fn toolchain_flag_changes_program() {
    let mut rt = ReleaseTools::with_test_fs();

    rt.cmd
        .args(["test", "--toolchain", "/opt/go/bin/go"])
        .assert()
        .success()
        .stdout("/opt/go/bin/go test -race -cover ./...\n");
}

#[test]
fn invalid_version_override_names_the_option() {
    let mut rt = ReleaseTools::with_test_fs();

    rt.cmd
        .args(["build", "--version-override", "one.two"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("(version)").and(predicate::str::contains("one.two")));
}

#[test]
fn git_dir_outside_a_repository_fails() {
    let mut rt = ReleaseTools::with_test_fs();
    let cwd = rt.test_fs().cwd.path().to_path_buf();

    rt.cmd
        .arg("build")
        .arg("--git-dir")
        .arg(&cwd)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open git repository"));
}

#[test]
fn describe_outside_a_repository_fails() {
    let mut rt = ReleaseTools::with_test_fs();

    rt.cmd
        .arg("describe")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}

#[test]
fn describe_tagged_repository() {
    let mut rt = ReleaseTools::with_test_fs();
    let commit = init_tagged_repo(rt.test_fs().cwd.path(), "v1.2.3");

    let output = rt
        .cmd
        .arg("describe")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let actual: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_json_eq!(
        actual,
        json!({
            "commit_hash": commit,
            "is_clean": true,
            "commit_time": "2021-03-04T05:06:07Z",
            "tag": "v1.2.3",
            "commits_since_tag": 0,
            "state": "clean",
            "version": "1.2.3"
        })
    );
}

#[test]
fn build_stamps_provenance_from_git_dir() {
    let mut rt = ReleaseTools::with_test_fs();
    let repo = rt.test_fs().cwd.path().join("repo");
    std::fs::create_dir(&repo).unwrap();
    let commit = init_tagged_repo(&repo, "v0.9.1");

    rt.cmd
        .args(["build", "--built-by", "ci", "--git-dir", "repo"])
        .assert()
        .success()
        .stdout(format!(
            "CGO_ENABLED=0 go build -trimpath -ldflags '-s -w -X main.builtBy=ci -X main.commit={commit} \
             -X main.date=2021-03-04T05:06:07Z -X main.state=clean -X main.version=0.9.1' ./...\n"
        ));
}
