//! Version control orchestration for specification workspaces.
//!
//! Drives a remote git-control service on behalf of a UI: polls repository
//! status, saves versions (commit + best-effort push), browses history,
//! manages branches and review requests, and keeps one consistent
//! `VersionControlState` per bound workspace.

pub mod config;
pub mod credentials;
pub mod error;
pub mod git;
pub mod models;
pub mod orchestrator;
pub mod store;
pub mod view;

pub use config::{Config, HistoryFallback};
pub use error::{Result, VcsError};
pub use git::{GitControl, GitControlClient};
pub use orchestrator::{BranchRef, Orchestrator, Poller, VersionControlState};
