//! Application-wide constants.
//!
//! Default naming conventions and marker paths. The naming and location
//! values only seed [`Conventions::default`](crate::config::Conventions).

/// Base URI under which all DebOps repositories are published.
pub const GIT_URI: &str = "https://github.com/debops";

/// Name of the playbook repository, also used as the install directory name.
pub const PLAYBOOKS_REPO: &str = "debops-playbooks";

/// Prefix of role repository names on the git host.
pub const ROLE_PREFIX: &str = "ansible-";

/// Account namespace prepended to role names for local directories.
pub const GALAXY_ACCOUNT: &str = "debops";

/// Branch used when a requirement or the playbooks repository names no version.
pub const MASTER_BRANCH: &str = "master";

/// Role manifest location, relative to the install path.
pub const REQUIREMENTS_FILE: &str = "galaxy/requirements.txt";

/// Role checkout directory, relative to the install path.
pub const ROLES_DIR: &str = "roles";

/// Installation marker, relative to the install path.
pub const PLAYBOOKS_ENTRY: &str = "playbooks/site.yml";

/// Directory (or gitdir file) that marks a git working copy.
pub const GIT_DIR: &str = ".git";

/// File marking the root of a DebOps project.
pub const PROJECT_MARKER: &str = ".debops.cfg";

/// Directory name below each data directory.
pub const DATA_DIR_NAME: &str = "debops";

/// System-wide data directories searched after the user's own.
pub const SYSTEM_DATA_DIRS: &[&str] = &["/usr/local/share", "/usr/share"];

/// Fallback when the platform has no user data directory.
pub const FALLBACK_DATA_DIR: &str = ".local/share";

/// Progress spinner tick interval in milliseconds.
pub const PROGRESS_TICK_MS: u64 = 80;

/// Exit code used when the user interrupts the run.
pub const INTERRUPT_EXIT_CODE: i32 = 130;
