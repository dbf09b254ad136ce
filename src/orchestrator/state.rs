//! Orchestrator-owned repository state.
//!
//! `VersionControlState` is the single source of truth for one workspace
//! binding. Readers get cloned snapshots; only the orchestrator writes it.

use serde::Serialize;

use crate::models::{GitCommit, GitDiff, GitStatus};

/// Branch identity, distinguishing optimistic writes from values a status
/// fetch has confirmed. A refresh always replaces a tentative value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "name", rename_all = "camelCase")]
pub enum BranchRef {
    Tentative(String),
    Confirmed(String),
}

impl BranchRef {
    pub fn name(&self) -> &str {
        match self {
            BranchRef::Tentative(name) | BranchRef::Confirmed(name) => name,
        }
    }

    pub fn is_tentative(&self) -> bool {
        matches!(self, BranchRef::Tentative(_))
    }
}

impl PartialEq<str> for BranchRef {
    fn eq(&self, other: &str) -> bool {
        self.name() == other
    }
}

impl PartialEq<&str> for BranchRef {
    fn eq(&self, other: &&str) -> bool {
        self.name() == *other
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionControlState {
    pub is_loading: bool,
    pub error: Option<String>,
    pub status: Option<GitStatus>,
    pub is_git_initialized: bool,

    pub team_mode_enabled: bool,
    pub current_branch: BranchRef,
    pub main_branch: String,

    /// Most recent first.
    pub commits: Vec<GitCommit>,
    pub selected_commit: Option<GitCommit>,

    pub pending_changes: Vec<GitDiff>,

    pub is_history_open: bool,
    pub is_panel_open: bool,
}

impl VersionControlState {
    pub fn new(team_mode_enabled: bool, main_branch: &str) -> Self {
        Self {
            is_loading: false,
            error: None,
            status: None,
            is_git_initialized: false,
            team_mode_enabled,
            current_branch: BranchRef::Confirmed(main_branch.to_string()),
            main_branch: main_branch.to_string(),
            commits: Vec::new(),
            selected_commit: None,
            pending_changes: Vec::new(),
            is_history_open: false,
            is_panel_open: false,
        }
    }

    pub fn has_changes(&self) -> bool {
        self.status.as_ref().is_some_and(GitStatus::has_changes)
    }

    pub fn total_changes(&self) -> usize {
        self.status.as_ref().map_or(0, GitStatus::total_changes)
    }

    pub fn is_on_main_branch(&self) -> bool {
        self.current_branch.name() == self.main_branch
    }

    /// A review needs a feature branch to merge from.
    pub fn can_submit_for_review(&self) -> bool {
        self.team_mode_enabled && !self.is_on_main_branch()
    }
}
