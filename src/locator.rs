//! Works out where the playbooks live, or should live.

use crate::config::Conventions;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLocation {
    /// Directory given on the command line, made absolute.
    pub explicit_dir: Option<PathBuf>,
    pub install_path: PathBuf,
    /// Whether the installation marker exists under `install_path`.
    pub playbooks_present: bool,
}

pub struct ProjectLocator<'a> {
    conventions: &'a Conventions,
    search_paths: Vec<PathBuf>,
}

impl<'a> ProjectLocator<'a> {
    /// Searches the given install paths, in order, when no directory is explicit.
    pub fn new(conventions: &'a Conventions, search_paths: Vec<PathBuf>) -> Self {
        Self {
            conventions,
            search_paths,
        }
    }

    /// Builds the search list from `start_dir`: the enclosing project (if
    /// any) first, then every data directory.
    pub fn discover(conventions: &'a Conventions, start_dir: &Path) -> Self {
        let project_root = find_project_root(start_dir, &conventions.project_marker);
        Self::new(
            conventions,
            conventions.install_search_paths(project_root.as_deref()),
        )
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    pub fn locate(&self, explicit_dir: Option<&Path>) -> Result<ProjectLocation> {
        match explicit_dir {
            Some(dir) => self.locate_in(dir),
            None => Ok(self.search()),
        }
    }

    fn locate_in(&self, dir: &Path) -> Result<ProjectLocation> {
        let configuration_error = |message: String| Error::Configuration {
            path: dir.to_path_buf(),
            message,
        };

        let dir = std::path::absolute(dir).map_err(|e| configuration_error(e.to_string()))?;
        if dir.exists() && !dir.is_dir() {
            return Err(configuration_error("not a directory".to_string()));
        }
        std::fs::create_dir_all(&dir).map_err(|e| configuration_error(e.to_string()))?;

        let install_path = self.conventions.install_path_in(&dir);
        Ok(ProjectLocation {
            playbooks_present: self.conventions.has_installation(&install_path),
            explicit_dir: Some(dir),
            install_path,
        })
    }

    fn search(&self) -> ProjectLocation {
        let found = self
            .search_paths
            .iter()
            .find(|path| self.conventions.has_installation(path));

        match found {
            Some(install_path) => ProjectLocation {
                explicit_dir: None,
                install_path: install_path.clone(),
                playbooks_present: true,
            },
            None => ProjectLocation {
                explicit_dir: None,
                install_path: self.conventions.default_install_path(),
                playbooks_present: false,
            },
        }
    }
}

/// Walks up from `start` looking for a directory containing `marker`.
pub fn find_project_root(start: &Path, marker: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(marker).is_file())
        .map(Path::to_path_buf)
}
