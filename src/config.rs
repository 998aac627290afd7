use crate::{Result, cli::CliArgs, error};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, ensure};
use std::path::{Path, PathBuf};

/// Name of the config file searched for in the current directory (and its ancestors) and in the
/// user's config directory.
pub const CONFIG_FILE_NAME: &str = "release-tools.toml";

/// Prefix of environment variables that override config file settings.
pub const ENV_PREFIX: &str = "RELEASE_TOOLS_";

/// Configuration settings for release-tools.
///
/// Layered, lowest priority first: built-in defaults, the user config file, the nearest
/// `release-tools.toml` walking up from the current directory, then `RELEASE_TOOLS_*`
/// environment variables.  Command line flags override all of these.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Building entity stamped into build/install commands when `--built-by` isn't given
    pub built_by: Option<String>,

    /// Toolchain program used when rendering commands for a shell
    pub toolchain: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            built_by: None,
            toolchain: "go".to_string(),
        }
    }
}

impl Config {
    /// Load the configuration, honoring any config-related command line arguments the user
    /// provided.
    pub fn load(args: &CliArgs) -> Result<Self> {
        let figment = Self::figment(args.config_file.as_deref(), user_config_file())?;
        let mut config = Self::extract(&figment)?;

        if let Some(toolchain) = &args.toolchain {
            config.toolchain = toolchain.clone();
        }

        tracing::debug!(?config, "Loaded configuration");

        Ok(config)
    }

    /// Build the provider stack.
    ///
    /// An explicit `config_file` replaces the file search entirely and must exist.
    fn figment(config_file: Option<&Path>, user_config_file: Option<PathBuf>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match config_file {
            Some(path) => {
                ensure!(path.is_file(), error::ConfigFileNotFoundSnafu { path });
                figment = figment.merge(Toml::file_exact(path));
            }
            None => {
                if let Some(path) = user_config_file.filter(|path| path.is_file()) {
                    figment = figment.merge(Toml::file_exact(path));
                }
                figment = figment.merge(Toml::file(CONFIG_FILE_NAME));
            }
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    fn extract(figment: &Figment) -> Result<Self> {
        figment.extract().context(error::ConfigSnafu)
    }
}

/// Location of the per-user config file, if the platform has a notion of one.
fn user_config_file() -> Option<PathBuf> {
    use etcetera::{AppStrategy, AppStrategyArgs, choose_app_strategy};

    let strategy = choose_app_strategy(AppStrategyArgs {
        top_level_domain: "io".to_string(),
        author: "Sylabs".to_string(),
        app_name: "release-tools".to_string(),
    })
    .ok()?;

    Some(strategy.in_config_dir(CONFIG_FILE_NAME))
}
