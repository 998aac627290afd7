use super::{Command, push_packages, render_env};
use crate::{
    error::{self, Result},
    git::{Description, WorkingTreeState},
};
use chrono::{DateTime, SecondsFormat, Utc};
use semver::Version;
use snafu::{IntoError, ResultExt};
use std::cmp::Ordering;

/// Default target of `go build` when no packages were requested.
const DEFAULT_BUILD_TARGET: &str = "./...";

/// Default target of `go install` when no packages were requested.
const DEFAULT_INSTALL_TARGET: &str = "./cmd/...";

/// An option that configures a build or install [`Command`].
///
/// Options are applied in the order given; when two options set the same value, the later one
/// wins.
#[derive(Clone, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum BuildOption {
    /// Packages to build or install, appended to any already requested.
    Packages(Vec<String>),

    /// Entity that created the build (ex. `mage`, `goreleaser`).  Sets `main.builtBy`.
    BuiltBy(String),

    /// Provenance of the build.  Sets `main.commit`, `main.date`, `main.state` and, when a version
    /// can be derived from the description, `main.version`.
    GitDescription(Description),

    /// Explicit version, overriding any version derived from a git description applied earlier.
    /// Sets `main.version`.
    Version(String),
}

impl BuildOption {
    /// Add package(s) to the build.
    pub fn packages<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Packages(packages.into_iter().map(Into::into).collect())
    }

    /// Set the building entity.
    pub fn built_by(built_by: impl Into<String>) -> Self {
        Self::BuiltBy(built_by.into())
    }

    /// Set values in the build according to a git description.
    ///
    /// `main.commit` and `main.state` reflect `description`.  If the working copy was clean,
    /// `main.date` is the commit time; otherwise it is the time at which the option is applied.
    /// A failure to derive a version from `description` is not an error; `main.version` is simply
    /// left alone.
    pub fn git_description(description: &Description) -> Self {
        Self::GitDescription(description.clone())
    }

    /// Set the version explicitly.  A leading `v` is ignored.  The value is validated when the
    /// option is applied.
    pub fn version(version: impl Into<String>) -> Self {
        Self::Version(version.into())
    }

    fn name(&self) -> &'static str {
        self.into()
    }
}

/// Accumulates build/install options.
#[derive(Clone, Debug, PartialEq, Eq)]
struct BuildOpts {
    /// If true, disable CGO.
    disable_cgo: bool,

    /// Remove all file system paths from the resulting executable.  Sets the `-trimpath` flag.
    trim_path: bool,

    /// Omit the symbol table.  Sets the `-s` linker flag.
    omit_symbols: bool,

    /// Omit DWARF debug information.  Sets the `-w` linker flag.
    omit_debug_info: bool,

    built_by: Option<String>,
    commit_hash: Option<String>,

    /// Set if and only if `working_tree_state` is set.
    commit_date: Option<DateTime<Utc>>,
    working_tree_state: Option<WorkingTreeState>,

    version: Option<Version>,
    packages: Vec<String>,
}

impl Default for BuildOpts {
    /// Static, stripped, reproducible binaries.
    fn default() -> Self {
        Self {
            disable_cgo: true,
            trim_path: true,
            omit_symbols: true,
            omit_debug_info: true,
            built_by: None,
            commit_hash: None,
            commit_date: None,
            working_tree_state: None,
            version: None,
            packages: Vec::new(),
        }
    }
}

impl BuildOpts {
    fn apply(&mut self, option: BuildOption, now: &dyn Fn() -> DateTime<Utc>) -> Result<()> {
        match option {
            BuildOption::Packages(packages) => {
                self.packages.extend(packages);
            }
            BuildOption::BuiltBy(built_by) => {
                self.built_by = Some(built_by);
            }
            BuildOption::GitDescription(description) => {
                self.commit_hash = Some(description.commit_hash().to_string());

                let state = description.working_tree_state();
                self.commit_date = Some(match state {
                    WorkingTreeState::Clean => description.commit_time(),
                    WorkingTreeState::Dirty => now(),
                });
                self.working_tree_state = Some(state);

                match description.version() {
                    Ok(version) => self.version = Some(version),
                    Err(e) => tracing::debug!("Not setting version from git description: {e}"),
                }
            }
            BuildOption::Version(version) => {
                let raw = version.strip_prefix('v').unwrap_or(&version);
                self.version = Some(Version::parse(raw).context(error::InvalidVersionSnafu {
                    version: &version,
                })?);
            }
        }

        Ok(())
    }

    /// Linker flags, in the order the linker sees them.
    fn link_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();

        if self.omit_symbols {
            flags.push("-s".to_string());
        }

        if self.omit_debug_info {
            flags.push("-w".to_string());
        }

        let mut set_var = |name: &str, value: &dyn std::fmt::Display| {
            flags.push("-X".to_string());
            flags.push(format!("main.{name}={value}"));
        };

        if let Some(built_by) = self.built_by.as_deref().filter(|s| !s.is_empty()) {
            set_var("builtBy", &built_by);
        }

        if let Some(commit) = self.commit_hash.as_deref().filter(|s| !s.is_empty()) {
            set_var("commit", &commit);
        }

        // The zero timestamp means "no date", as does the zero version below.
        if let Some(date) = self.commit_date.filter(|d| *d != DateTime::<Utc>::default()) {
            set_var("date", &date.to_rfc3339_opts(SecondsFormat::Secs, true));
        }

        if let Some(state) = self.working_tree_state {
            set_var("state", &state);
        }

        if let Some(version) = self
            .version
            .as_ref()
            .filter(|v| v.cmp_precedence(&Version::new(0, 0, 0)) != Ordering::Equal)
        {
            set_var("version", version);
        }

        flags
    }

    fn build_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();

        if self.trim_path {
            flags.push("-trimpath".to_string());
        }

        let ld_flags = self.link_flags();
        if !ld_flags.is_empty() {
            flags.push("-ldflags".to_string());
            flags.push(ld_flags.join(" "));
        }

        flags
    }

    fn render(self, subcommand: &str, default_target: &str) -> Command {
        let mut args = vec![subcommand.to_string()];
        args.extend(self.build_flags());
        push_packages(&mut args, self.packages, default_target);

        let command = Command {
            env: render_env(self.disable_cgo),
            args,
        };

        tracing::debug!(env = ?command.env, args = ?command.args, "Rendered {subcommand} command");

        command
    }
}

/// Fold `opts` over the build defaults, stopping at the first option that fails.
fn build_command<I>(
    subcommand: &str,
    default_target: &str,
    opts: I,
    now: &dyn Fn() -> DateTime<Utc>,
) -> Result<Command>
where
    I: IntoIterator<Item = BuildOption>,
{
    let bo = opts
        .into_iter()
        .enumerate()
        .try_fold(BuildOpts::default(), |mut bo, (index, opt)| -> Result<BuildOpts> {
            let option = opt.name();
            bo.apply(opt, now)
                .map_err(|e| error::ApplyOptionSnafu { index, option }.into_error(Box::new(e)))?;
            Ok(bo)
        })?;

    Ok(bo.render(subcommand, default_target))
}

/// Returns a [`Command`] that builds packages, configured by `opts`.
///
/// The symbol table and DWARF debug information are omitted, file system paths are trimmed from
/// the binary to assist reproducible builds, and CGO is disabled.
///
/// By default, all packages (`./...`) are built.  To change this, use
/// [`BuildOption::packages`].
pub fn new_build_command<I>(opts: I) -> Result<Command>
where
    I: IntoIterator<Item = BuildOption>,
{
    build_command("build", DEFAULT_BUILD_TARGET, opts, &Utc::now)
}

/// Returns a [`Command`] that installs packages, configured by `opts`.
///
/// Flags are the same as for [`new_build_command`].  By default, the packages under `./cmd/...`
/// are installed.  To change this, use [`BuildOption::packages`].
pub fn new_install_command<I>(opts: I) -> Result<Command>
where
    I: IntoIterator<Item = BuildOption>,
{
    build_command("install", DEFAULT_INSTALL_TARGET, opts, &Utc::now)
}
