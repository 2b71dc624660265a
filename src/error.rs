//! Error taxonomy for a bootstrap/update run.
//!
//! `Configuration`, `ManifestRead` and `ManifestParse` abort the run before
//! (or instead of) any role work. `Sync` names the repository and the step
//! that failed so the user can match it with the last progress line.
//! `NotARepository` is raised before any git command runs in a path that
//! git would resolve to an enclosing repository.
//! `Interrupted` is reported with a short message and a distinct exit code.

use crate::repo::SyncStep;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The install location cannot be used.
    #[error("cannot use {} as project directory: {message}", .path.display())]
    Configuration { path: PathBuf, message: String },

    #[error("cannot read requirements file {}: {source}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A manifest line is missing its role name. `line` is 1-based.
    #[error("{}:{line}: {message}", .path.display())]
    ManifestParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("failed to sync {} while {step}: {message}", .path.display())]
    Sync {
        path: PathBuf,
        step: SyncStep,
        message: String,
    },

    /// A checkout path is occupied by something that is not a git working copy.
    #[error("{} exists but is not a git checkout; move it aside and rerun", .path.display())]
    NotARepository { path: PathBuf },

    #[error("aborted by user")]
    Interrupted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Error::Interrupted)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
