//! Repository reconciliation: clone when absent, fetch and fast-forward
//! when present.

use crate::constants::GIT_DIR;
use crate::error::{Error, Result};
use crate::git::GitBackend;
use std::fmt;
use std::path::Path;

/// Local tip, peeled so annotated tags compare as the commit they point at.
const HEAD_COMMIT: &str = "HEAD^{commit}";
const FETCH_HEAD_COMMIT: &str = "FETCH_HEAD^{commit}";

/// What is on disk at a checkout path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryState {
    Absent,
    Present,
    /// Something exists at the path but it is not a git working copy.
    /// Running git there would act on whichever repository encloses it.
    Unmanaged,
}

impl RepositoryState {
    #[must_use]
    pub fn of(path: &Path) -> Self {
        if !path.exists() {
            RepositoryState::Absent
        } else if path.join(GIT_DIR).exists() {
            RepositoryState::Present
        } else {
            RepositoryState::Unmanaged
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStep {
    Cloning { git_ref: String },
    ReadingHead,
    Fetching,
    ReadingFetchHead,
    Merging { from: String, to: String },
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStep::Cloning { git_ref } => write!(f, "cloning '{}'", git_ref),
            SyncStep::ReadingHead => write!(f, "reading HEAD"),
            SyncStep::Fetching => write!(f, "fetching updates"),
            SyncStep::ReadingFetchHead => write!(f, "reading FETCH_HEAD"),
            SyncStep::Merging { from, to } => {
                write!(f, "fast-forwarding {}..{}", short_sha(from), short_sha(to))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Cloned { head: String },
    UpToDate { head: String },
    FastForwarded { from: String, to: String },
}

#[must_use]
pub fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

/// Brings one checkout in line with its remote.
pub struct RepositorySyncer<G> {
    git: G,
}

impl<G: GitBackend> RepositorySyncer<G> {
    pub fn new(git: G) -> Self {
        Self { git }
    }

    pub fn git(&self) -> &G {
        &self.git
    }

    /// Clones `remote_uri` at `git_ref` into `local_path` if nothing is
    /// there, otherwise fetches `git_ref` and fast-forwards to it.
    ///
    /// `on_step` is called before each git invocation. A diverged checkout
    /// fails at the merge step; nothing is resolved automatically. A path
    /// that exists without being a git checkout is refused untouched.
    pub fn sync<F>(
        &self,
        remote_uri: &str,
        git_ref: &str,
        local_path: &Path,
        on_step: F,
    ) -> Result<SyncOutcome>
    where
        F: Fn(&SyncStep),
    {
        match RepositoryState::of(local_path) {
            RepositoryState::Absent => self.clone_fresh(remote_uri, git_ref, local_path, &on_step),
            RepositoryState::Present => self.update(remote_uri, git_ref, local_path, &on_step),
            RepositoryState::Unmanaged => Err(Error::NotARepository {
                path: local_path.to_path_buf(),
            }),
        }
    }

    fn clone_fresh<F>(
        &self,
        remote_uri: &str,
        git_ref: &str,
        local_path: &Path,
        on_step: &F,
    ) -> Result<SyncOutcome>
    where
        F: Fn(&SyncStep),
    {
        let step = SyncStep::Cloning {
            git_ref: git_ref.to_string(),
        };
        on_step(&step);
        at_step(
            local_path,
            step,
            self.git.clone_branch(remote_uri, git_ref, local_path),
        )?;

        on_step(&SyncStep::ReadingHead);
        let head = at_step(
            local_path,
            SyncStep::ReadingHead,
            self.git.rev_parse(local_path, HEAD_COMMIT),
        )?;
        Ok(SyncOutcome::Cloned { head })
    }

    fn update<F>(
        &self,
        remote_uri: &str,
        git_ref: &str,
        local_path: &Path,
        on_step: &F,
    ) -> Result<SyncOutcome>
    where
        F: Fn(&SyncStep),
    {
        on_step(&SyncStep::ReadingHead);
        let current = at_step(
            local_path,
            SyncStep::ReadingHead,
            self.git.rev_parse(local_path, HEAD_COMMIT),
        )?;

        on_step(&SyncStep::Fetching);
        at_step(
            local_path,
            SyncStep::Fetching,
            self.git.fetch(local_path, remote_uri, git_ref),
        )?;

        on_step(&SyncStep::ReadingFetchHead);
        let fetched = at_step(
            local_path,
            SyncStep::ReadingFetchHead,
            self.git.rev_parse(local_path, FETCH_HEAD_COMMIT),
        )?;

        if current == fetched {
            return Ok(SyncOutcome::UpToDate { head: current });
        }

        let step = SyncStep::Merging {
            from: current.clone(),
            to: fetched.clone(),
        };
        on_step(&step);
        at_step(local_path, step, self.git.merge_ff_only(local_path, &fetched))?;

        Ok(SyncOutcome::FastForwarded {
            from: current,
            to: fetched,
        })
    }
}

fn at_step<T>(path: &Path, step: SyncStep, result: anyhow::Result<T>) -> Result<T> {
    result.map_err(|e| {
        if e.downcast_ref::<Error>().is_some_and(Error::is_interrupted) {
            Error::Interrupted
        } else {
            Error::Sync {
                path: path.to_path_buf(),
                step,
                message: format!("{:#}", e),
            }
        }
    })
}
