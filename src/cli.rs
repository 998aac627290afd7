use crate::{BuildOption, Description, Result, TestOption, config::Config};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// How a rendered command is written to stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// A single POSIX shell command line
    #[default]
    Shell,

    /// A JSON object with `program`, `env` and `args` fields
    Json,
}

#[derive(Clone, Debug, Default, Args)]
pub struct OutputArgs {
    /// Output format of the rendered command
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Arguments shared by `build` and `install`.
#[derive(Clone, Debug, Default, Args)]
pub struct BuildArgs {
    /// Package to build; may be repeated.  Defaults to `./...` for build and `./cmd/...` for
    /// install
    #[arg(short = 'p', long = "package", value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Entity that created the build, stamped into `main.builtBy`
    #[arg(long, value_name = "NAME")]
    pub built_by: Option<String>,

    /// Stamp commit, date, state and version from the git working copy containing DIR
    #[arg(long, value_name = "DIR")]
    pub git_dir: Option<PathBuf>,

    /// Stamp this version into `main.version`, overriding any version derived from git
    #[arg(long, value_name = "VERSION")]
    pub version_override: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl BuildArgs {
    /// Translate the arguments into build options, in the order they should be applied.
    ///
    /// `--built-by` falls back to the configured building entity.  If `--git-dir` was given, the
    /// working copy is described now; this is the only step that touches the filesystem.
    pub(crate) fn to_options(&self, config: &Config) -> Result<Vec<BuildOption>> {
        let mut opts = Vec::new();

        if !self.packages.is_empty() {
            opts.push(BuildOption::packages(self.packages.iter().cloned()));
        }

        if let Some(built_by) = self.built_by.as_ref().or(config.built_by.as_ref()) {
            opts.push(BuildOption::built_by(built_by.clone()));
        }

        if let Some(git_dir) = &self.git_dir {
            let description = Description::from_repository(git_dir)?;
            opts.push(BuildOption::git_description(&description));
        }

        if let Some(version) = &self.version_override {
            opts.push(BuildOption::version(version.clone()));
        }

        Ok(opts)
    }
}

#[derive(Clone, Debug, Default, Args)]
pub struct TestArgs {
    /// Package to test; may be repeated.  Defaults to `./...`
    #[arg(short = 'p', long = "package", value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Write a coverage profile to PATH instead of printing a coverage summary
    #[arg(long, value_name = "PATH")]
    pub cover_profile: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl TestArgs {
    pub(crate) fn to_options(&self) -> Vec<TestOption> {
        let mut opts = Vec::new();

        if !self.packages.is_empty() {
            opts.push(TestOption::packages(self.packages.iter().cloned()));
        }

        if let Some(path) = &self.cover_profile {
            opts.push(TestOption::cover_path(path.clone()));
        }

        opts
    }
}

#[derive(Clone, Debug, Args)]
pub struct DescribeArgs {
    /// Any path inside the git working copy to describe
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub git_dir: PathBuf,
}

#[derive(Clone, Debug, Subcommand)]
pub enum CliCommand {
    /// Print a `go build` invocation that produces stripped, reproducible binaries
    Build(BuildArgs),

    /// Print a `go install` invocation that produces stripped, reproducible binaries
    Install(BuildArgs),

    /// Print a `go test` invocation with race detection and coverage enabled
    Test(TestArgs),

    /// Describe a git working copy as JSON: commit, state, nearest tag and derived version
    Describe(DescribeArgs),
}

#[derive(Clone, Debug, Parser)]
#[command(name = "release-tools")]
#[command(about = "Render reproducible `go build`, `go install` and `go test` invocations")]
#[command(disable_version_flag = true)]
#[non_exhaustive]
pub struct CliArgs {
    /// Print version information
    #[arg(short = 'V', long)]
    pub version: bool,

    /// Use verbose output (repeat for more detail)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Read configuration from the given TOML file only, bypassing the usual config search
    ///
    /// By default, release-tools reads `release-tools.toml` from the user's config directory and
    /// the nearest `release-tools.toml` found walking up from the current directory, the latter
    /// taking priority.
    #[arg(long, value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Toolchain program to show in shell output (default: `go`)
    #[arg(long, value_name = "PROGRAM", global = true)]
    pub toolchain: Option<String>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

impl CliArgs {
    /// Parse the arguments of the current process, exiting with a usage message on error.
    pub fn parse_from_cli_args() -> Self {
        Self::parse()
    }
}
