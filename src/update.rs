//! Drives a full run: the playbook repository first, then every role its
//! manifest lists, strictly in manifest order.

use crate::config::{Config, Conventions};
use crate::error::Result;
use crate::git::GitBackend;
use crate::interrupt;
use crate::locator::ProjectLocation;
use crate::output::{self, Action, StepProgress};
use crate::repo::{RepositoryState, RepositorySyncer, SyncOutcome};
use crate::requirements;
use crate::roles::{self, ResolvedRole};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct RoleRecord {
    pub role: ResolvedRole,
    pub outcome: SyncOutcome,
}

#[derive(Debug)]
pub struct UpdateReport {
    pub install_path: PathBuf,
    pub playbooks: SyncOutcome,
    pub roles: Vec<RoleRecord>,
    pub duration: Duration,
}

impl UpdateReport {
    /// All outcomes, playbooks first.
    pub fn outcomes(&self) -> impl Iterator<Item = &SyncOutcome> {
        std::iter::once(&self.playbooks).chain(self.roles.iter().map(|r| &r.outcome))
    }
}

pub struct Updater<'a, G> {
    conventions: &'a Conventions,
    syncer: RepositorySyncer<G>,
    config: Config,
}

impl<'a, G: GitBackend> Updater<'a, G> {
    pub fn new(conventions: &'a Conventions, git: G, config: Config) -> Self {
        Self {
            conventions,
            syncer: RepositorySyncer::new(git),
            config,
        }
    }

    pub fn syncer(&self) -> &RepositorySyncer<G> {
        &self.syncer
    }

    /// Syncs the playbooks at `location`, then every role. Stops at the
    /// first failure.
    pub fn run(&self, location: &ProjectLocation) -> Result<UpdateReport> {
        let started = Instant::now();
        let install_path = &location.install_path;

        interrupt::check()?;
        let playbooks = self.sync_one(
            &self.conventions.playbooks_repo,
            None,
            &self.conventions.playbooks_remote_uri(),
            &self.conventions.default_branch,
            install_path,
        )?;

        let roles = self.sync_roles(install_path)?;

        Ok(UpdateReport {
            install_path: install_path.clone(),
            playbooks,
            roles,
            duration: started.elapsed(),
        })
    }

    /// Reads the manifest from an already synced tree and syncs each role.
    pub fn sync_roles(&self, install_path: &Path) -> Result<Vec<RoleRecord>> {
        let manifest = self.conventions.requirements_path(install_path);
        let entries = requirements::load(&manifest, &self.conventions.default_branch)?;
        let roles_path = self.conventions.roles_path(install_path);
        let total = entries.len();

        let mut records = Vec::with_capacity(total);
        for (index, entry) in entries.iter().enumerate() {
            interrupt::check()?;
            let role = roles::resolve(entry, self.conventions, &roles_path);
            let outcome = self.sync_one(
                &role.role_name,
                Some((index + 1, total)),
                &role.remote_uri,
                &role.version,
                &role.local_dir,
            )?;
            records.push(RoleRecord { role, outcome });
        }
        Ok(records)
    }

    fn sync_one(
        &self,
        name: &str,
        position: Option<(usize, usize)>,
        remote_uri: &str,
        git_ref: &str,
        local_path: &Path,
    ) -> Result<SyncOutcome> {
        let action = match RepositoryState::of(local_path) {
            RepositoryState::Absent => Action::Installing,
            RepositoryState::Present | RepositoryState::Unmanaged => Action::Updating,
        };
        output::print_action(&self.config, action, name, position);

        let progress = StepProgress::start(&self.config);
        let result = self
            .syncer
            .sync(remote_uri, git_ref, local_path, |step| progress.update(step));
        progress.finish(&result);
        result
    }
}
