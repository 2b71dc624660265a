//! Configuration types: CLI verbosity and the naming conventions that
//! decide where repositories come from and where they land.

use crate::constants::{
    DATA_DIR_NAME, FALLBACK_DATA_DIR, GALAXY_ACCOUNT, GIT_URI, MASTER_BRANCH, PLAYBOOKS_ENTRY,
    PLAYBOOKS_REPO, PROJECT_MARKER, REQUIREMENTS_FILE, ROLE_PREFIX, ROLES_DIR, SYSTEM_DATA_DIRS,
};
use crate::git::{self, GitLogger};
use std::path::{Path, PathBuf};

/// Runtime configuration derived from CLI arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    /// Controls the verbosity level of CLI output.
    pub verbosity: Verbosity,
}

impl Config {
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Returns the git command logger matching the verbosity.
    #[must_use]
    pub fn git_logger(&self) -> GitLogger {
        if self.is_verbose() {
            git::verbose_logger
        } else {
            git::no_op_logger
        }
    }
}

/// Verbosity level for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    /// Maps the `--quiet` / `--verbose` flags to a level. Quiet wins.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        }
    }
}

/// Naming conventions and well-known locations.
///
/// Every component receives this by reference instead of reading globals,
/// so tests can point `git_uri` at a directory of local bare repositories
/// and `data_dirs` at temporary directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conventions {
    /// Base URI; repositories live at `<git_uri>/<name>`.
    pub git_uri: String,
    /// Playbook repository name and install directory name.
    pub playbooks_repo: String,
    /// Prefix of role repository names on the git host.
    pub role_prefix: String,
    /// Account namespace for local role directories.
    pub account: String,
    /// Version used when none is given.
    pub default_branch: String,
    /// Manifest path relative to the install path.
    pub requirements_file: PathBuf,
    /// Roles directory relative to the install path.
    pub roles_dir: PathBuf,
    /// Installation marker relative to the install path.
    pub playbooks_entry: PathBuf,
    /// File name marking a project root.
    pub project_marker: String,
    /// Data directories searched in order; the first one hosts the default install.
    pub data_dirs: Vec<PathBuf>,
}

impl Default for Conventions {
    fn default() -> Self {
        let user_data = dirs::data_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(FALLBACK_DATA_DIR)))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR));

        let data_dirs = std::iter::once(user_data)
            .chain(SYSTEM_DATA_DIRS.iter().map(PathBuf::from))
            .map(|dir| dir.join(DATA_DIR_NAME))
            .collect();

        Self {
            git_uri: GIT_URI.to_string(),
            playbooks_repo: PLAYBOOKS_REPO.to_string(),
            role_prefix: ROLE_PREFIX.to_string(),
            account: GALAXY_ACCOUNT.to_string(),
            default_branch: MASTER_BRANCH.to_string(),
            requirements_file: PathBuf::from(REQUIREMENTS_FILE),
            roles_dir: PathBuf::from(ROLES_DIR),
            playbooks_entry: PathBuf::from(PLAYBOOKS_ENTRY),
            project_marker: PROJECT_MARKER.to_string(),
            data_dirs,
        }
    }
}

impl Conventions {
    fn base_uri(&self) -> &str {
        self.git_uri.trim_end_matches('/')
    }

    #[must_use]
    pub fn playbooks_remote_uri(&self) -> String {
        format!("{}/{}", self.base_uri(), self.playbooks_repo)
    }

    #[must_use]
    pub fn role_remote_uri(&self, role_name: &str) -> String {
        format!("{}/{}{}", self.base_uri(), self.role_prefix, role_name)
    }

    /// The `<account>.` prefix used to namespace role directories.
    #[must_use]
    pub fn namespace_prefix(&self) -> String {
        format!("{}.", self.account)
    }

    /// Install path for a project directory: `<dir>/<playbooks_repo>`.
    #[must_use]
    pub fn install_path_in(&self, dir: &Path) -> PathBuf {
        dir.join(&self.playbooks_repo)
    }

    /// Candidate install paths in priority order.
    ///
    /// A known project root comes first, then each data directory.
    #[must_use]
    pub fn install_search_paths(&self, project_root: Option<&Path>) -> Vec<PathBuf> {
        project_root
            .into_iter()
            .map(|root| self.install_path_in(root))
            .chain(self.data_dirs.iter().map(|dir| self.install_path_in(dir)))
            .collect()
    }

    /// Where a fresh installation goes when nothing else is found.
    #[must_use]
    pub fn default_install_path(&self) -> PathBuf {
        match self.data_dirs.first() {
            Some(dir) => self.install_path_in(dir),
            None => PathBuf::from(FALLBACK_DATA_DIR)
                .join(DATA_DIR_NAME)
                .join(&self.playbooks_repo),
        }
    }

    #[must_use]
    pub fn has_installation(&self, install_path: &Path) -> bool {
        install_path.join(&self.playbooks_entry).is_file()
    }

    #[must_use]
    pub fn requirements_path(&self, install_path: &Path) -> PathBuf {
        install_path.join(&self.requirements_file)
    }

    #[must_use]
    pub fn roles_path(&self, install_path: &Path) -> PathBuf {
        install_path.join(&self.roles_dir)
    }
}
