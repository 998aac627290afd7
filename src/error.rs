use snafu::prelude::*;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("No version tag is reachable from the described commit"))]
    NoVersionTag,

    #[snafu(display("Failed to parse version '{version}': {source}"))]
    InvalidVersion { version: String, source: semver::Error },

    #[snafu(display("Version {version} has no successor patch release"))]
    VersionOverflow { version: String },

    #[snafu(display("Failed to apply option #{index} ({option}): {source}"))]
    ApplyOption {
        index: usize,
        option: &'static str,
        source: Box<Error>,
    },

    // Source control errors
    #[snafu(display("Failed to open git repository containing {}", path.display()))]
    OpenRepository {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[snafu(display("Failed to read HEAD commit of repository at {}", path.display()))]
    ReadHead {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[snafu(display("Failed to determine worktree status of repository at {}", path.display()))]
    WorktreeStatus {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[snafu(display("Failed to describe commit {commit}"))]
    DescribeCommit {
        commit: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[snafu(display("Commit {commit} has an out of range timestamp: {seconds}"))]
    InvalidCommitTime { commit: String, seconds: i64 },

    #[snafu(display("Config file {} does not exist", path.display()))]
    ConfigFileNotFound { path: PathBuf },

    #[snafu(display("Failed to load configuration: {source}"))]
    Config {
        #[snafu(source(from(figment::Error, Box::new)))]
        source: Box<figment::Error>,
    },

    #[snafu(display("JSON serialization error: {source}"))]
    Json { source: serde_json::Error },
}

pub type Result<T> = std::result::Result<T, Error>;
