//! Helpers for constructing `go build`, `go install` and `go test` invocations.
//!
//! The heart of the crate is [`new_build_command`], [`new_install_command`] and
//! [`new_test_command`], which combine a set of options with per-operation defaults into a
//! [`Command`].  Build provenance (commit, date, working tree state and version) comes from a git
//! [`Description`].
//!
//! ```
//! use release_tools::{BuildOption, new_build_command};
//!
//! let cmd = new_build_command([BuildOption::built_by("mage")]).unwrap();
//! assert_eq!(cmd.args(), ["build", "-trimpath", "-ldflags", "-s -w -X main.builtBy=mage", "./..."]);
//! assert_eq!(cmd.env()["CGO_ENABLED"], "0");
//! ```

pub mod cli;
mod command;
pub mod config;
mod error;
mod git;
mod logging;

pub use cli::CliArgs;
pub use command::{
    BuildOption, Command, TestOption, new_build_command, new_install_command, new_test_command,
};
use config::Config;
pub use error::{Error, Result};
pub use git::{Description, WorkingTreeState};
use serde::Serialize;
use snafu::ResultExt;

/// Re-export of the snafu [`snafu::Report`] type so that callers can refer to this type without
/// taking an explicit snafu dep
pub use snafu::Report as SnafuReport;

/// A rendered command together with the program it is meant for.
#[derive(Serialize)]
struct Invocation<'a> {
    program: &'a str,
    #[serde(flatten)]
    command: &'a Command,
}

/// JSON shape of the `describe` subcommand.
#[derive(Serialize)]
struct DescribeOutput<'a> {
    #[serde(flatten)]
    description: &'a Description,
    state: WorkingTreeState,
    version: Option<String>,
}

/// Main entry point for the `release-tools` binary.
///
/// Meant to be called from `main.rs` or other frontends.
#[snafu::report]
pub fn release_tools_main() -> Result<()> {
    let args = CliArgs::parse_from_cli_args();

    logging::init(&args);

    if args.version {
        let version = env!("CARGO_PKG_VERSION");

        match (
            option_env!("VERGEN_GIT_SHA"),
            option_env!("VERGEN_GIT_COMMIT_DATE"),
        ) {
            (Some(sha), Some(date))
                if sha != "VERGEN_IDEMPOTENT_OUTPUT" && date != "VERGEN_IDEMPOTENT_OUTPUT" =>
            {
                eprintln!("release-tools {} ({} {})", version, sha, date);
            }
            _ => {
                eprintln!("release-tools {}", version);
            }
        }
        return Ok(());
    }

    let Some(command) = &args.command else {
        <CliArgs as clap::CommandFactory>::command()
            .error(
                clap::error::ErrorKind::MissingSubcommand,
                "a subcommand is required",
            )
            .exit();
    };

    let config = Config::load(&args)?;

    let output = match command {
        cli::CliCommand::Build(build) => {
            let cmd = new_build_command(build.to_options(&config)?)?;
            render(&cmd, &config, build.output.format)?
        }
        cli::CliCommand::Install(install) => {
            let cmd = new_install_command(install.to_options(&config)?)?;
            render(&cmd, &config, install.output.format)?
        }
        cli::CliCommand::Test(test) => {
            let cmd = new_test_command(test.to_options())?;
            render(&cmd, &config, test.output.format)?
        }
        cli::CliCommand::Describe(describe) => {
            let description = Description::from_repository(&describe.git_dir)?;
            let version = match description.version() {
                Ok(version) => Some(version.to_string()),
                Err(e) => {
                    tracing::info!("{e}");
                    None
                }
            };

            serde_json::to_string_pretty(&DescribeOutput {
                description: &description,
                state: description.working_tree_state(),
                version,
            })
            .context(error::JsonSnafu)?
        }
    };

    println!("{output}");

    Ok(())
}

fn render(cmd: &Command, config: &Config, format: cli::OutputFormat) -> Result<String> {
    match format {
        cli::OutputFormat::Shell => Ok(cmd.to_shell_string(&config.toolchain)),
        cli::OutputFormat::Json => serde_json::to_string_pretty(&Invocation {
            program: &config.toolchain,
            command: cmd,
        })
        .context(error::JsonSnafu),
    }
}
