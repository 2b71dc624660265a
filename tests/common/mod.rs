//! Test infrastructure for debops-update integration tests.
#![allow(dead_code)]

use anyhow::Result;
use debops_update::config::{Config, Conventions, Verbosity};
use debops_update::git::{GitBackend, no_op_logger, run_git};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Runs git in `dir` without logging.
pub fn git_in(dir: &Path, args: &[&str]) -> Result<String> {
    run_git(dir, args, no_op_logger)
}

pub fn quiet_config() -> Config {
    Config {
        verbosity: Verbosity::Quiet,
    }
}

/// Conventions pointing at a local hub and a private data directory.
pub fn test_conventions(hub: &TestHub, data_dir: &Path) -> Conventions {
    Conventions {
        git_uri: hub.uri(),
        data_dirs: vec![data_dir.to_path_buf()],
        ..Conventions::default()
    }
}

fn configure_identity(dir: &Path) -> Result<()> {
    git_in(dir, &["config", "user.email", "test@example.com"])?;
    git_in(dir, &["config", "user.name", "Test User"])?;
    git_in(dir, &["config", "commit.gpgsign", "false"])?;
    git_in(dir, &["config", "tag.gpgsign", "false"])?;
    Ok(())
}

/// Gives an existing checkout a committer identity so tests can commit in it.
pub fn make_committable(checkout: &Path) -> Result<()> {
    configure_identity(checkout)
}

/// Commits `content` to `file` in a checkout and returns the new HEAD.
pub fn commit_file(checkout: &Path, file: &str, content: &str) -> Result<String> {
    let path = checkout.join(file);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, content)?;
    git_in(checkout, &["add", "--all"])?;
    git_in(checkout, &["commit", "--quiet", "-m", &format!("Update {}", file)])?;
    git_in(checkout, &["rev-parse", "HEAD"])
}

pub fn head_of(checkout: &Path) -> Result<String> {
    git_in(checkout, &["rev-parse", "HEAD"])
}

/// A directory of bare repositories standing in for the git host.
/// Each bare repository has a working clone under `.work/` used to
/// publish commits. Cleaned up when dropped.
pub struct TestHub {
    _temp_dir: TempDir,
    path: PathBuf,
}

impl TestHub {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().to_path_buf();
        Ok(Self {
            _temp_dir: temp_dir,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn uri(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    pub fn repo_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    fn work_path(&self, name: &str) -> PathBuf {
        self.path.join(".work").join(name)
    }

    /// Publishes a new repository with one commit on `master` holding `files`.
    pub fn add_repo(&self, name: &str, files: &[(&str, &str)]) -> Result<String> {
        let bare = self.repo_path(name);
        std::fs::create_dir_all(&bare)?;
        git_in(&bare, &["init", "--quiet", "--bare", "-b", "master"])?;

        let work = self.work_path(name);
        std::fs::create_dir_all(&work)?;
        git_in(&work, &["init", "--quiet", "-b", "master"])?;
        configure_identity(&work)?;
        git_in(&work, &["remote", "add", "origin", &bare.to_string_lossy()])?;

        std::fs::write(work.join("README.md"), format!("# {}\n", name))?;
        for (file, content) in files {
            let path = work.join(file);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
        }
        git_in(&work, &["add", "--all"])?;
        git_in(&work, &["commit", "--quiet", "-m", "Initial commit"])?;
        git_in(&work, &["push", "--quiet", "origin", "master"])?;
        head_of(&work)
    }

    /// Creates `branch` from master with one extra commit and publishes it.
    pub fn add_branch(&self, name: &str, branch: &str) -> Result<String> {
        let work = self.work_path(name);
        git_in(&work, &["checkout", "--quiet", "-b", branch, "master"])?;
        let sha = commit_file(&work, "VERSION", branch)?;
        git_in(&work, &["push", "--quiet", "origin", branch])?;
        git_in(&work, &["checkout", "--quiet", "master"])?;
        Ok(sha)
    }

    /// Commits `content` to `file` on `branch` and publishes it.
    pub fn push_commit(&self, name: &str, branch: &str, file: &str, content: &str) -> Result<String> {
        let work = self.work_path(name);
        git_in(&work, &["checkout", "--quiet", branch])?;
        let sha = commit_file(&work, file, content)?;
        git_in(&work, &["push", "--quiet", "origin", branch])?;
        git_in(&work, &["checkout", "--quiet", "master"])?;
        Ok(sha)
    }

    /// Publishes an annotated tag on master's tip and returns the tagged commit.
    pub fn add_annotated_tag(&self, name: &str, tag: &str) -> Result<String> {
        let work = self.work_path(name);
        git_in(&work, &["tag", "-a", tag, "-m", &format!("Release {}", tag)])?;
        git_in(&work, &["push", "--quiet", "origin", tag])?;
        head_of(&work)
    }

    pub fn head(&self, name: &str, branch: &str) -> Result<String> {
        git_in(
            &self.repo_path(name),
            &["rev-parse", &format!("refs/heads/{}", branch)],
        )
    }

    /// Publishes a playbooks repository with a site entry point and a manifest.
    pub fn add_playbooks(&self, requirements: &str) -> Result<String> {
        self.add_repo(
            "debops-playbooks",
            &[
                ("playbooks/site.yml", "---\n- import_playbook: common.yml\n"),
                ("galaxy/requirements.txt", requirements),
            ],
        )
    }
}

/// In-memory [`GitBackend`] recording every call.
///
/// Remote refs are registered up front; local checkouts are directories
/// created on clone whose HEAD is tracked in memory.
#[derive(Default)]
pub struct FakeGit {
    calls: RefCell<Vec<String>>,
    remote_refs: HashMap<(String, String), String>,
    local_heads: RefCell<HashMap<PathBuf, String>>,
    fetch_heads: RefCell<HashMap<PathBuf, String>>,
    fail_on: Option<&'static str>,
}

impl FakeGit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_remote(mut self, uri: &str, git_ref: &str, sha: &str) -> Self {
        self.remote_refs
            .insert((uri.to_string(), git_ref.to_string()), sha.to_string());
        self
    }

    /// Makes the named operation (`clone`, `fetch`, `merge`, `rev-parse`) fail.
    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.fail_on = Some(operation);
        self
    }

    /// Registers an existing checkout at `path` with HEAD at `sha`.
    pub fn with_checkout(self, path: &Path, sha: &str) -> Result<Self> {
        std::fs::create_dir_all(path.join(".git"))?;
        self.local_heads
            .borrow_mut()
            .insert(path.to_path_buf(), sha.to_string());
        Ok(self)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.split_whitespace().next() == Some(operation))
            .count()
    }

    pub fn local_head(&self, path: &Path) -> Option<String> {
        self.local_heads.borrow().get(path).cloned()
    }

    fn record(&self, operation: &'static str, detail: String) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(format!("{} {}", operation, detail).trim_end().to_string());
        if self.fail_on == Some(operation) {
            anyhow::bail!("injected {} failure", operation);
        }
        Ok(())
    }

    fn remote_ref(&self, uri: &str, git_ref: &str) -> Result<String> {
        self.remote_refs
            .get(&(uri.to_string(), git_ref.to_string()))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Remote branch {} not found in {}", git_ref, uri))
    }
}

impl GitBackend for FakeGit {
    fn clone_branch(&self, remote_uri: &str, git_ref: &str, dest: &Path) -> Result<()> {
        self.record("clone", format!("{} {} {}", remote_uri, git_ref, dest.display()))?;
        let sha = self.remote_ref(remote_uri, git_ref)?;
        std::fs::create_dir_all(dest.join(".git"))?;
        self.local_heads.borrow_mut().insert(dest.to_path_buf(), sha);
        Ok(())
    }

    fn rev_parse(&self, repo: &Path, rev: &str) -> Result<String> {
        self.record("rev-parse", rev.to_string())?;
        let heads = match rev.trim_end_matches("^{commit}") {
            "FETCH_HEAD" => self.fetch_heads.borrow(),
            _ => self.local_heads.borrow(),
        };
        heads
            .get(repo)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown revision {} in {}", rev, repo.display()))
    }

    fn fetch(&self, repo: &Path, remote_uri: &str, git_ref: &str) -> Result<()> {
        self.record("fetch", format!("{} {}", remote_uri, git_ref))?;
        let sha = self.remote_ref(remote_uri, git_ref)?;
        self.fetch_heads.borrow_mut().insert(repo.to_path_buf(), sha);
        Ok(())
    }

    fn merge_ff_only(&self, repo: &Path, commit: &str) -> Result<()> {
        self.record("merge", commit.to_string())?;
        self.local_heads
            .borrow_mut()
            .insert(repo.to_path_buf(), commit.to_string());
        Ok(())
    }
}
