//! Role manifest parsing.
//!
//! The manifest is line oriented: `<name> [<version>]`, whitespace
//! delimited, no comments or quoting. A missing version falls back to the
//! default branch. A line without a name is an error; this includes blank
//! lines.

use crate::error::{Error, Result};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementEntry {
    pub name: String,
    pub version: String,
    /// Zero-based line number in the manifest.
    pub line_index: usize,
}

/// Reads and parses the manifest at `path`.
pub fn load(path: &Path, default_version: &str) -> Result<Vec<RequirementEntry>> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content, default_version).map_err(|(line, message)| Error::ManifestParse {
        path: path.to_path_buf(),
        line,
        message,
    })
}

/// Parses manifest text. On failure returns the 1-based line and a message.
pub fn parse(
    content: &str,
    default_version: &str,
) -> std::result::Result<Vec<RequirementEntry>, (usize, String)> {
    content
        .lines()
        .enumerate()
        .map(|(line_index, line)| {
            let mut tokens = line.split_whitespace();
            let Some(name) = tokens.next() else {
                return Err((
                    line_index + 1,
                    "missing role name (blank lines are not allowed)".to_string(),
                ));
            };
            let version = tokens.next().unwrap_or(default_version);
            Ok(RequirementEntry {
                name: name.to_string(),
                version: version.to_string(),
                line_index,
            })
        })
        .collect()
}
