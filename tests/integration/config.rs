//! Integration tests for config file handling
//!
//! The hierarchy is user config < nearest `release-tools.toml` < environment < CLI flags.

use crate::utils::ReleaseTools;
use assert_fs::prelude::*;
use predicates::prelude::*;

#[test]
fn cwd_config_sets_built_by() {
    let mut rt = ReleaseTools::with_test_fs();

    rt.test_fs()
        .cwd
        .child("release-tools.toml")
        .write_str("built_by = \"mage\"\n")
        .unwrap();

    rt.cmd
        .arg("build")
        .assert()
        .success()
        .stdout("CGO_ENABLED=0 go build -trimpath -ldflags '-s -w -X main.builtBy=mage' ./...\n");
}

#[test]
fn cli_built_by_overrides_config() {
    let mut rt = ReleaseTools::with_test_fs();

    rt.test_fs()
        .cwd
        .child("release-tools.toml")
        .write_str("built_by = \"mage\"\n")
        .unwrap();

    rt.cmd
        .args(["build", "--built-by", "goreleaser"])
        .assert()
        .success()
        .stdout(predicate::str::contains("main.builtBy=goreleaser"))
        .stdout(predicate::str::contains("mage").not());
}

#[test]
fn env_overrides_config_file() {
    let mut rt = ReleaseTools::with_test_fs();

    rt.test_fs()
        .cwd
        .child("release-tools.toml")
        .write_str("toolchain = \"go1.21\"\n")
        .unwrap();

    rt.cmd
        .env("RELEASE_TOOLS_TOOLCHAIN", "go1.22")
        .arg("test")
        .assert()
        .success()
        .stdout("go1.22 test -race -cover ./...\n");
}

/// Only Linux resolves the user config directory from `XDG_CONFIG_HOME`.
#[cfg(target_os = "linux")]
#[test]
fn user_config_is_read() {
    let mut rt = ReleaseTools::with_test_fs();

    rt.test_fs()
        .home
        .child(".config/release-tools/release-tools.toml")
        .write_str("built_by = \"ci\"\n")
        .unwrap();

    rt.cmd
        .arg("install")
        .assert()
        .success()
        .stdout(predicate::str::contains("main.builtBy=ci"));
}

#[test]
fn explicit_config_file_must_exist() {
    let mut rt = ReleaseTools::with_test_fs();

    rt.cmd
        .args(["build", "--config-file", "missing.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}
