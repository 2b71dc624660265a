//! Git command wrappers.
//!
//! A thin layer over the git CLI. Every command runs with an explicit
//! working directory; the process-wide current directory is never touched.
//! [`GitBackend`] is the seam the syncer talks through, so tests can
//! substitute a fake.

use crate::error::Error;
use crate::interrupt;
use anyhow::Context;
use colored::Colorize;
use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

/// Callback invoked before each git command with its working directory
/// and the rendered command line.
pub type GitLogger = fn(&Path, &str);

pub fn verbose_logger(dir: &Path, command: &str) {
    eprintln!(
        "    {} {} {}",
        "$".dimmed(),
        command.dimmed(),
        format!("(in {})", dir.display()).dimmed()
    );
}

pub fn no_op_logger(_dir: &Path, _command: &str) {}

fn render_command<S: AsRef<OsStr>>(args: &[S]) -> String {
    let mut command = String::from("git");
    for arg in args {
        command.push(' ');
        command.push_str(&OsStr::new(arg).to_string_lossy());
    }
    command
}

/// Runs `git <args>` in `dir` and returns trimmed stdout.
///
/// Fails with the command line and git's stderr on a non-zero exit, or with
/// [`Error::Interrupted`] if Ctrl-C arrived while the command was running.
pub fn run_git<S: AsRef<OsStr>>(
    dir: &Path,
    args: &[S],
    logger: GitLogger,
) -> anyhow::Result<String> {
    let command = render_command(args);
    logger(dir, &command);

    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .with_context(|| format!("Failed to spawn git command in {}", dir.display()))?;

    if interrupt::requested() {
        return Err(Error::Interrupted.into());
    }

    if output.status.success() {
        let result = String::from_utf8_lossy(&output.stdout);
        Ok(result.as_ref().trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("{} failed: {}", command, stderr.trim())
    }
}

fn validate_ref_name(git_ref: &str) -> anyhow::Result<()> {
    if git_ref.is_empty()
        || git_ref.starts_with('-')
        || git_ref.contains(|c: char| c == '\0' || c.is_whitespace())
    {
        anyhow::bail!("Invalid ref name: {:?}", git_ref);
    }
    Ok(())
}

/// Clones `remote_uri` at `git_ref` into `dest`, creating parent directories.
pub fn clone_branch(
    remote_uri: &str,
    git_ref: &str,
    dest: &Path,
    logger: GitLogger,
) -> anyhow::Result<()> {
    validate_ref_name(git_ref)?;
    let dest = std::path::absolute(dest)
        .with_context(|| format!("Failed to resolve {}", dest.display()))?;
    let parent = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create {}", parent.display()))?;

    let args: [&OsStr; 6] = [
        "clone".as_ref(),
        "--quiet".as_ref(),
        "--branch".as_ref(),
        git_ref.as_ref(),
        remote_uri.as_ref(),
        dest.as_os_str(),
    ];
    run_git(parent, &args, logger)
        .with_context(|| format!("Failed to clone {} at '{}'", remote_uri, git_ref))?;
    Ok(())
}

/// Resolves `rev` (e.g. `HEAD`, `FETCH_HEAD^{commit}`) to an object id.
pub fn rev_parse(repo: &Path, rev: &str, logger: GitLogger) -> anyhow::Result<String> {
    let sha = run_git(repo, &["rev-parse", "--verify", "--quiet", rev], logger)
        .with_context(|| format!("Failed to resolve {}", rev))?;
    if sha.is_empty() || sha.contains('\n') {
        anyhow::bail!("Unexpected rev-parse output for {}: {:?}", rev, sha);
    }
    Ok(sha)
}

/// Fetches `git_ref` from `remote_uri`; the result lands in `FETCH_HEAD`.
pub fn fetch(repo: &Path, remote_uri: &str, git_ref: &str, logger: GitLogger) -> anyhow::Result<()> {
    validate_ref_name(git_ref)?;
    run_git(repo, &["fetch", "--quiet", remote_uri, git_ref], logger)
        .with_context(|| format!("Failed to fetch '{}' from {}", git_ref, remote_uri))?;
    Ok(())
}

/// Fast-forwards the checked-out branch to `commit`. Refuses anything else.
pub fn merge_ff_only(repo: &Path, commit: &str, logger: GitLogger) -> anyhow::Result<()> {
    run_git(repo, &["merge", "--ff-only", "--quiet", commit], logger)
        .with_context(|| format!("Failed to fast-forward to {}", commit))?;
    Ok(())
}

/// The version-control operations the syncer depends on.
pub trait GitBackend {
    fn clone_branch(&self, remote_uri: &str, git_ref: &str, dest: &Path) -> anyhow::Result<()>;

    fn rev_parse(&self, repo: &Path, rev: &str) -> anyhow::Result<String>;

    fn fetch(&self, repo: &Path, remote_uri: &str, git_ref: &str) -> anyhow::Result<()>;

    fn merge_ff_only(&self, repo: &Path, commit: &str) -> anyhow::Result<()>;
}

/// [`GitBackend`] backed by the `git` executable.
#[derive(Debug, Clone, Copy)]
pub struct GitCli {
    logger: GitLogger,
}

impl GitCli {
    #[must_use]
    pub fn new(logger: GitLogger) -> Self {
        Self { logger }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new(no_op_logger)
    }
}

impl GitBackend for GitCli {
    fn clone_branch(&self, remote_uri: &str, git_ref: &str, dest: &Path) -> anyhow::Result<()> {
        clone_branch(remote_uri, git_ref, dest, self.logger)
    }

    fn rev_parse(&self, repo: &Path, rev: &str) -> anyhow::Result<String> {
        rev_parse(repo, rev, self.logger)
    }

    fn fetch(&self, repo: &Path, remote_uri: &str, git_ref: &str) -> anyhow::Result<()> {
        fetch(repo, remote_uri, git_ref, self.logger)
    }

    fn merge_ff_only(&self, repo: &Path, commit: &str) -> anyhow::Result<()> {
        merge_ff_only(repo, commit, self.logger)
    }
}
