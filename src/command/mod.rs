//! Construction of `go` toolchain invocations.
//!
//! Each constructor starts from defaults specific to the operation, folds the caller's options
//! into an accumulator in order, and renders the result into a [`Command`]: an environment overlay
//! plus the argument list that follows the toolchain binary on the command line.  Nothing here
//! runs a process.

mod build;

pub use build::{BuildOption, new_build_command, new_install_command};
pub use test::{TestOption, new_test_command};

use serde::Serialize;
use std::{collections::BTreeMap, ffi::OsStr};

/// A fully rendered toolchain invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Command {
    env: BTreeMap<String, String>,
    args: Vec<String>,
}

impl Command {
    /// Environment variables to set on top of the inherited environment.
    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Arguments to the toolchain binary, starting with the subcommand.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Prepare a [`std::process::Command`] that runs `program` with this invocation.
    ///
    /// The environment overlay is merged over the inherited environment.  The process is not
    /// spawned.
    pub fn to_process_command(&self, program: impl AsRef<OsStr>) -> std::process::Command {
        let mut cmd = std::process::Command::new(program);
        cmd.args(&self.args);
        cmd.envs(&self.env);
        cmd
    }

    /// Render the invocation as a single POSIX shell command line.
    pub fn to_shell_string(&self, program: &str) -> String {
        self.env
            .iter()
            .map(|(name, value)| format!("{name}={}", shell_quote(value)))
            .chain(std::iter::once(shell_quote(program)))
            .chain(self.args.iter().map(String::as_str).map(shell_quote))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Quote `s` for a POSIX shell, leaving it bare if it only contains characters that the shell
/// treats literally.
fn shell_quote(s: &str) -> String {
    let is_safe = |c: char| c.is_ascii_alphanumeric() || "_./:=@%+,-".contains(c);

    if !s.is_empty() && s.chars().all(is_safe) {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// Environment overlay shared by all operations.
fn render_env(disable_cgo: bool) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();

    if disable_cgo {
        env.insert("CGO_ENABLED".to_string(), "0".to_string());
    }

    env
}

/// Append either the requested packages or the operation's default target.
fn push_packages(args: &mut Vec<String>, packages: Vec<String>, default_target: &str) {
    if packages.is_empty() {
        args.push(default_target.to_string());
    } else {
        args.extend(packages);
    }
}
