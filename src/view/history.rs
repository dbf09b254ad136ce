//! History drawer view model.

use serde::Serialize;

use crate::models::{ChangedFile, GitCommit};
use crate::orchestrator::VersionControlState;
use crate::view::time::relative_from_iso;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub hash: String,
    pub short_hash: String,
    pub message: String,
    pub author: String,
    pub when: String,
    pub is_latest: bool,
    pub is_selected: bool,
    pub placeholder: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitDetailView {
    pub hash: String,
    pub short_hash: String,
    pub message: String,
    pub body: String,
    pub author: String,
    pub date: String,
    pub when: String,
    pub changed_files: Vec<ChangedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    pub open: bool,
    pub is_loading: bool,
    pub entries: Vec<HistoryEntry>,
    pub selected: Option<CommitDetailView>,
    /// True when any entry is synthetic; the drawer must say so.
    pub showing_placeholder: bool,
    pub empty_message: Option<String>,
}

pub fn history(state: &VersionControlState) -> HistoryView {
    let selected_hash = state.selected_commit.as_ref().map(|c| c.hash.as_str());

    let entries: Vec<HistoryEntry> = state
        .commits
        .iter()
        .enumerate()
        .map(|(idx, commit)| HistoryEntry {
            hash: commit.hash.clone(),
            short_hash: short_hash(commit),
            message: commit.message.clone(),
            author: commit.author.clone(),
            when: when(commit),
            is_latest: idx == 0,
            is_selected: selected_hash == Some(commit.hash.as_str()),
            placeholder: commit.placeholder,
        })
        .collect();

    let empty_message = (entries.is_empty() && !state.is_loading)
        .then(|| "No saved versions yet".to_string());

    HistoryView {
        open: state.is_history_open,
        is_loading: state.is_loading,
        showing_placeholder: entries.iter().any(|e| e.placeholder),
        selected: state.selected_commit.as_ref().map(commit_detail),
        entries,
        empty_message,
    }
}

pub fn commit_detail(commit: &GitCommit) -> CommitDetailView {
    CommitDetailView {
        hash: commit.hash.clone(),
        short_hash: short_hash(commit),
        message: commit.message.clone(),
        body: commit.body.clone(),
        author: commit.author.clone(),
        date: commit.date.clone(),
        when: when(commit),
        changed_files: commit.changed_files.clone(),
    }
}

fn short_hash(commit: &GitCommit) -> String {
    if commit.short_hash.is_empty() {
        commit.hash.chars().take(7).collect()
    } else {
        commit.short_hash.clone()
    }
}

/// The service's relative date, or one computed from the ISO date.
fn when(commit: &GitCommit) -> String {
    if !commit.relative_date.is_empty() {
        return commit.relative_date.clone();
    }
    relative_from_iso(&commit.date).unwrap_or_else(|| commit.date.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(hash: &str, short: &str, relative: &str) -> GitCommit {
        GitCommit {
            hash: hash.into(),
            short_hash: short.into(),
            message: format!("commit {hash}"),
            author: "Ada".into(),
            date: "2020-01-01T00:00:00+00:00".into(),
            relative_date: relative.into(),
            body: String::new(),
            changed_files: vec![],
            placeholder: false,
        }
    }

    #[test]
    fn entries_keep_order_and_mark_selection() {
        let mut state = VersionControlState::new(false, "main");
        state.is_history_open = true;
        state.commits = vec![
            commit("bbbbbbbbbb", "bbbbbbb", "1 hour ago"),
            commit("aaaaaaaaaa", "", ""),
        ];
        state.selected_commit = Some(state.commits[1].clone());

        let view = history(&state);
        assert!(view.open);
        assert_eq!(view.entries.len(), 2);
        assert!(view.entries[0].is_latest);
        assert_eq!(view.entries[0].when, "1 hour ago");
        assert_eq!(view.entries[1].short_hash, "aaaaaaa");
        assert!(view.entries[1].when.ends_with("ago"));
        assert!(view.entries[1].is_selected);
        assert_eq!(view.selected.unwrap().hash, "aaaaaaaaaa");
        assert!(!view.showing_placeholder);
        assert_eq!(view.empty_message, None);
    }

    #[test]
    fn empty_history_has_message() {
        let view = history(&VersionControlState::new(false, "main"));
        assert_eq!(view.empty_message.as_deref(), Some("No saved versions yet"));
    }

    #[test]
    fn placeholder_entries_are_flagged() {
        let mut state = VersionControlState::new(false, "main");
        let mut fake = commit("placeholder-0", "placeholder-0", "2 hours ago");
        fake.placeholder = true;
        state.commits = vec![fake];
        assert!(history(&state).showing_placeholder);
    }
}
