use std::io::IsTerminal;
use tracing::Level;

use crate::CliArgs;

/// Environment variable holding a tracing filter expression specific to this tool.  Takes
/// priority over `RUST_LOG`.
const LOG_ENV_VAR: &str = "RELEASE_TOOLS_LOG";

/// Initialize tracing/logging based on the contents of the parsed CLI args.
///
/// # Verbosity levels
///
/// - `0`: WARN and ERROR only, simple format with color (silent on happy path)
/// - `1`: INFO level, structured format with timestamp/target
/// - `2`: DEBUG level, structured format
/// - `3+`: TRACE level, structured format
///
/// Log filtering can be overridden with `RELEASE_TOOLS_LOG`, then `RUST_LOG`.
///
/// Logs always go to stderr; stdout carries only the rendered command.
///
/// # Panics
///
/// This function will panic if called more than once in the same process, as the
/// global tracing subscriber can only be initialized once.
pub(crate) fn init(args: &CliArgs) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let (level, use_simple_format) = match args.verbose {
        0 => (Level::WARN, true),
        1 => (Level::INFO, false),
        2 => (Level::DEBUG, false),
        _ => (Level::TRACE, false),
    };

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let use_ansi = std::io::stderr().is_terminal();

    if use_simple_format {
        // Just the message, one per line.  This isn't meant to look like a log.
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_level(true)
                    .with_ansi(use_ansi)
                    .without_time(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(use_ansi),
            )
            .init();
    }
}

/// Initialize tracing for tests with sensible defaults.
///
/// Uses the test writer so output only shows up for failed tests, and a [`std::sync::OnceLock`]
/// so it can be called from every test that wants logs.
///
/// Defaults to DEBUG level, but can be overridden by setting `RELEASE_TOOLS_LOG` or `RUST_LOG`.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    use std::sync::OnceLock;
    use tracing_subscriber::{EnvFilter, fmt};

    static INIT: OnceLock<()> = OnceLock::new();

    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("debug"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_level(true)
            .init();
    });
}
