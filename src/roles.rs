//! Maps manifest entries to role repositories and checkout directories.
//!
//! Role names may be given bare (`apt`) or namespaced (`debops.apt`).
//! Either way the repository is `<git_uri>/<role_prefix>apt` and the
//! checkout lives in `<roles_path>/debops.apt`.

use crate::config::Conventions;
use crate::requirements::RequirementEntry;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRole {
    pub role_name: String,
    pub namespaced_name: String,
    pub remote_uri: String,
    pub local_dir: PathBuf,
    pub version: String,
}

/// Resolves one entry. Pure: touches neither network nor filesystem.
#[must_use]
pub fn resolve(
    entry: &RequirementEntry,
    conventions: &Conventions,
    roles_path: &Path,
) -> ResolvedRole {
    let prefix = conventions.namespace_prefix();
    let (role_name, namespaced_name) = match entry.name.strip_prefix(&prefix) {
        Some(bare) => (bare.to_string(), entry.name.clone()),
        None => (entry.name.clone(), format!("{}{}", prefix, entry.name)),
    };

    ResolvedRole {
        remote_uri: conventions.role_remote_uri(&role_name),
        local_dir: roles_path.join(&namespaced_name),
        version: entry.version.clone(),
        role_name,
        namespaced_name,
    }
}
