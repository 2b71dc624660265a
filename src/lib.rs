//! Bootstraps and updates a local DebOps checkout.
//!
//! This crate keeps a playbook repository and the role repositories its
//! manifest lists in sync with their remotes:
//! - Locating (or creating) the install directory
//! - Cloning repositories that are missing
//! - Fetching and fast-forwarding repositories that exist
//! - Mapping manifest role names to repositories and checkout directories

pub mod config;
pub mod constants;
pub mod error;
pub mod git;
pub mod interrupt;
pub mod locator;
pub mod output;
pub mod repo;
pub mod requirements;
pub mod roles;
pub mod update;
