//! Status panel view model.
//!
//! Groups the working-tree partition by change type, caps each group, and
//! reports how many paths were left out.

use serde::Serialize;

use crate::models::GitDiff;
use crate::orchestrator::VersionControlState;

pub const MAX_STAGED_SHOWN: usize = 3;
pub const MAX_MODIFIED_SHOWN: usize = 5;
pub const MAX_ADDED_SHOWN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Staged,
    Modified,
    Added,
}

impl ChangeKind {
    pub fn marker(self) -> char {
        match self {
            ChangeKind::Staged => 'S',
            ChangeKind::Modified => 'M',
            ChangeKind::Added => 'A',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEntry {
    pub kind: ChangeKind,
    pub path: String,
    /// Last path component, what the panel shows.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelView {
    /// Hidden entirely when the workspace has no repository.
    pub visible: bool,
    pub expanded: bool,
    pub is_loading: bool,
    pub error: Option<String>,
    pub branch: String,
    pub branch_unconfirmed: bool,
    pub team_mode: bool,
    pub ahead: u32,
    pub behind: u32,
    pub total_changes: usize,
    pub summary: String,
    pub changes: Vec<ChangeEntry>,
    /// `+N more files` when some paths were not listed.
    pub more: Option<String>,
    pub can_save: bool,
    pub can_sync: bool,
    pub can_submit_for_review: bool,
}

pub fn panel(state: &VersionControlState) -> PanelView {
    let mut changes = Vec::new();
    if let Some(status) = &state.status {
        push_group(&mut changes, ChangeKind::Staged, &status.staged, MAX_STAGED_SHOWN);
        push_group(&mut changes, ChangeKind::Modified, &status.unstaged, MAX_MODIFIED_SHOWN);
        push_group(&mut changes, ChangeKind::Added, &status.untracked, MAX_ADDED_SHOWN);
    }

    let total = state.total_changes();
    let hidden = total.saturating_sub(changes.len());

    PanelView {
        visible: state.is_git_initialized,
        expanded: state.is_panel_open,
        is_loading: state.is_loading,
        error: state.error.clone(),
        branch: state.current_branch.name().to_string(),
        branch_unconfirmed: state.current_branch.is_tentative(),
        team_mode: state.team_mode_enabled,
        ahead: state.status.as_ref().map_or(0, |s| s.ahead),
        behind: state.status.as_ref().map_or(0, |s| s.behind),
        total_changes: total,
        summary: change_summary(total),
        changes,
        more: (hidden > 0).then(|| format!("+{hidden} more files")),
        can_save: state.has_changes(),
        can_sync: state.team_mode_enabled && state.is_git_initialized,
        can_submit_for_review: state.can_submit_for_review(),
    }
}

fn push_group(out: &mut Vec<ChangeEntry>, kind: ChangeKind, paths: &[String], limit: usize) {
    out.extend(paths.iter().take(limit).map(|path| ChangeEntry {
        kind,
        path: path.clone(),
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
    }));
}

pub fn change_summary(total: usize) -> String {
    match total {
        0 => "All changes saved".to_string(),
        1 => "1 unsaved change".to_string(),
        n => format!("{n} unsaved changes"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChangeView {
    pub file: String,
    pub additions: u32,
    pub deletions: u32,
    pub hunk_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingChangesView {
    pub files: Vec<FileChangeView>,
    pub total_additions: u32,
    pub total_deletions: u32,
}

pub fn pending_changes(changes: &[GitDiff]) -> PendingChangesView {
    let files: Vec<FileChangeView> = changes
        .iter()
        .map(|d| FileChangeView {
            file: d.file.clone(),
            additions: d.additions,
            deletions: d.deletions,
            hunk_count: d.hunks.len(),
        })
        .collect();

    PendingChangesView {
        total_additions: files.iter().map(|f| f.additions).sum(),
        total_deletions: files.iter().map(|f| f.deletions).sum(),
        files,
    }
}
