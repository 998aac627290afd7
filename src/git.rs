//! Source control metadata used to stamp build provenance into binaries.
//!
//! A [`Description`] is a point-in-time snapshot of a working copy: which commit is checked out,
//! when it was committed, whether there are uncommitted changes, and which tag (if any) the commit
//! descends from.  The command builders consume it through
//! [`BuildOption::git_description`](crate::BuildOption::git_description); they never look at the
//! repository themselves.

use crate::error::{self, Result};
use chrono::{DateTime, Utc};
use semver::{BuildMetadata, Prerelease, Version};
use serde::Serialize;
use snafu::{IntoError, OptionExt, ResultExt};
use std::path::Path;

/// Whether a working copy had uncommitted changes when it was described.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum::Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WorkingTreeState {
    Clean,
    Dirty,
}

/// Immutable description of a git working copy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Description {
    commit_hash: String,
    is_clean: bool,
    commit_time: DateTime<Utc>,

    /// Name of the nearest tag reachable from the commit, if there is one.
    tag: Option<String>,

    /// Number of commits between `tag` and the described commit.  Zero when the commit is tagged.
    commits_since_tag: u32,
}

impl Description {
    pub fn new(commit_hash: impl Into<String>, is_clean: bool, commit_time: DateTime<Utc>) -> Self {
        Self {
            commit_hash: commit_hash.into(),
            is_clean,
            commit_time,
            tag: None,
            commits_since_tag: 0,
        }
    }

    /// Record the nearest tag, and how many commits the described commit is ahead of it.
    pub fn with_tag(mut self, tag: impl Into<String>, commits_since_tag: u32) -> Self {
        self.tag = Some(tag.into());
        self.commits_since_tag = commits_since_tag;
        self
    }

    /// Describe the working copy that contains `path`.
    ///
    /// The repository is discovered by walking up from `path`.  The HEAD commit supplies the hash
    /// and commit time, the worktree status decides cleanliness, and the nearest tag (of any kind)
    /// reachable from HEAD supplies the version information.
    pub fn from_repository(path: &Path) -> Result<Self> {
        let repo = gix::discover(path)
            .map_err(|e| error::OpenRepositorySnafu { path }.into_error(Box::new(e)))?;

        let head = repo
            .head_commit()
            .map_err(|e| error::ReadHeadSnafu { path }.into_error(Box::new(e)))?;
        let commit_hash = head.id.to_string();

        let time = head
            .time()
            .map_err(|e| error::ReadHeadSnafu { path }.into_error(Box::new(e)))?;
        let commit_time =
            DateTime::from_timestamp(time.seconds, 0).context(error::InvalidCommitTimeSnafu {
                commit: &commit_hash,
                seconds: time.seconds,
            })?;

        let is_dirty = repo
            .is_dirty()
            .map_err(|e| error::WorktreeStatusSnafu { path }.into_error(Box::new(e)))?;

        let resolution = head
            .describe()
            .names(gix::commit::describe::SelectRef::AllTags)
            .try_resolve()
            .map_err(|e| {
                error::DescribeCommitSnafu {
                    commit: &commit_hash,
                }
                .into_error(Box::new(e))
            })?;

        let mut description = Self::new(commit_hash, !is_dirty, commit_time);
        if let Some(resolution) = resolution {
            if let Some(name) = resolution.outcome.name {
                description = description.with_tag(name.to_string(), resolution.outcome.depth);
            }
        }

        tracing::debug!(
            commit = %description.commit_hash,
            state = %description.working_tree_state(),
            tag = ?description.tag(),
            commits_since_tag = description.commits_since_tag(),
            "Described working copy at {}",
            path.display()
        );

        Ok(description)
    }

    pub fn commit_hash(&self) -> &str {
        &self.commit_hash
    }

    pub fn is_clean(&self) -> bool {
        self.is_clean
    }

    pub fn commit_time(&self) -> DateTime<Utc> {
        self.commit_time
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn commits_since_tag(&self) -> u32 {
        self.commits_since_tag
    }

    pub fn working_tree_state(&self) -> WorkingTreeState {
        if self.is_clean {
            WorkingTreeState::Clean
        } else {
            WorkingTreeState::Dirty
        }
    }

    /// Derive a semantic version from the nearest tag.
    ///
    /// A leading `v` on the tag is ignored.  When the commit is exactly on the tag, the tag's
    /// version is returned as-is.  Otherwise the result is a development version that sorts after
    /// the tag: the patch number is bumped if the tag was a release, and `devel.<n>` is appended
    /// to the pre-release, where `n` is the number of commits since the tag.
    ///
    /// Fails with [`Error::NoVersionTag`](crate::Error::NoVersionTag) when no tag was found, with
    /// [`Error::InvalidVersion`](crate::Error::InvalidVersion) when the tag isn't a semantic
    /// version, and with [`Error::VersionOverflow`](crate::Error::VersionOverflow) when a release
    /// tag's patch number can't be bumped.
    pub fn version(&self) -> Result<Version> {
        let tag = self.tag.as_deref().context(error::NoVersionTagSnafu)?;
        let raw = tag.strip_prefix('v').unwrap_or(tag);

        let mut version = Version::parse(raw).context(error::InvalidVersionSnafu { version: tag })?;

        if self.commits_since_tag == 0 {
            return Ok(version);
        }

        let pre = if version.pre.is_empty() {
            version.patch = version
                .patch
                .checked_add(1)
                .context(error::VersionOverflowSnafu { version: tag })?;
            format!("devel.{}", self.commits_since_tag)
        } else {
            format!("{}.devel.{}", version.pre, self.commits_since_tag)
        };
        version.pre = Prerelease::new(&pre).context(error::InvalidVersionSnafu { version: &pre })?;
        version.build = BuildMetadata::EMPTY;

        Ok(version)
    }
}
