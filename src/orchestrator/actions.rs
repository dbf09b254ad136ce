//! Remote-backed actions.
//!
//! Failure policy per step:
//! - repository absent: `is_git_initialized = false`, never an error
//! - status fetch failure: logged, previous snapshot kept
//! - required step (commit, revert, branch, checkout, pull, review, setup):
//!   sets `error`, action reports failure
//! - optional step (documentation refresh, push after commit): logged only

use chrono::{Duration, Utc};

use crate::config::HistoryFallback;
use crate::credentials;
use crate::error::VcsError;
use crate::models::{
    BranchInfo, BranchRequest, CheckoutRequest, CommitRequest, CreateRepositoryRequest, GitCommit,
    GitConfig, IdentityRequest, InitRequest, PullRequest, PushRequest, ReadmeRequest,
    RemoteRequest, RevertRequest, ReviewRequest,
};
use crate::orchestrator::{BranchRef, Operation, Orchestrator};
use crate::view::format_relative_time;

const DEFAULT_REMOTE: &str = "origin";

impl Orchestrator {
    /// Fetch the status snapshot. Overlapping calls are last-write-wins.
    pub async fn refresh_status(&self) {
        self.fetch_status(true).await;
    }

    /// Status refresh used by the poller; leaves a surfaced error in place.
    pub async fn poll_status(&self) {
        self.fetch_status(false).await;
    }

    async fn fetch_status(&self, clear_error: bool) {
        let Some(op) = self.begin_read() else {
            return;
        };

        match self.inner.git.status(&op.workspace).await {
            Ok(response) => {
                let fallback_branch = self.inner.config.main_branch.clone();
                self.apply(&op, |state| {
                    let branch = response
                        .status
                        .as_ref()
                        .map(|s| s.branch.clone())
                        .filter(|b| !b.is_empty())
                        .unwrap_or(fallback_branch);
                    state.is_git_initialized = true;
                    state.current_branch = BranchRef::Confirmed(branch);
                    state.status = response.status;
                    state.pending_changes = response.changes;
                    if clear_error {
                        state.error = None;
                    }
                });
            }
            Err(e) if e.is_not_a_repository() => {
                tracing::info!("{} is not a git repository", op.workspace);
                self.apply(&op, |state| {
                    state.is_git_initialized = false;
                    state.status = None;
                    state.pending_changes.clear();
                });
            }
            Err(e) => {
                tracing::warn!("Git status check failed for {}: {}", op.workspace, e);
            }
        }
    }

    /// Commit the unstaged files, then try to push. Returns true iff the
    /// commit succeeded, whatever happened to the push.
    pub async fn save_version(&self, message: &str) -> bool {
        let Ok(op) = self.begin_mutation() else {
            return false;
        };

        if message.trim().is_empty() {
            self.fail(&op, VcsError::InvalidRequest("Commit message is required".into()));
            return false;
        }

        self.refresh_documentation(&op).await;

        let files = self
            .state()
            .status
            .map(|s| s.unstaged)
            .unwrap_or_default();
        let request = CommitRequest {
            workspace: op.workspace.clone(),
            message: message.to_string(),
            files,
        };
        if let Err(e) = self.inner.git.commit(request).await {
            self.fail(&op, e);
            return false;
        }
        tracing::info!("Saved version in {}: {}", op.workspace, message);

        let push = PushRequest {
            workspace: op.workspace.clone(),
            set_upstream: true,
            token: credentials::git_token(&*self.inner.store),
        };
        match self.inner.git.push(push).await {
            Ok(_) => tracing::info!("Pushed {} to remote", op.workspace),
            Err(e) => tracing::warn!("Push failed (commit succeeded): {}", e),
        }

        if self.is_current(&op) {
            self.refresh_status().await;
        }
        true
    }

    async fn refresh_documentation(&self, op: &Operation<'_>) {
        let request = ReadmeRequest {
            workspace: op.workspace.clone(),
            api_key: credentials::assistant_api_key(&*self.inner.store),
        };
        match self.inner.git.generate_readme(request).await {
            Ok(ack) => tracing::info!(
                "README.md regenerated: {}",
                ack.message.as_deref().unwrap_or("ok")
            ),
            Err(e) => tracing::warn!("README generation skipped: {}", e),
        }
    }

    /// Load the commit log, optionally for a single file, and open history.
    pub async fn view_history(&self, file_path: Option<&str>) {
        let Some(op) = self.begin_read() else {
            return;
        };

        match self.inner.git.log(&op.workspace, file_path).await {
            Ok(commits) => {
                self.apply(&op, |state| {
                    state.commits = commits;
                    state.is_history_open = true;
                });
            }
            Err(e) => {
                tracing::warn!("Git log unavailable for {}: {}", op.workspace, e);
                let fallback = self.inner.config.history_fallback;
                self.apply(&op, |state| {
                    match fallback {
                        HistoryFallback::Placeholder => state.commits = placeholder_history(),
                        HistoryFallback::Disabled => state.error = Some(e.to_string()),
                    }
                    state.is_history_open = true;
                });
            }
        }
    }

    pub async fn open_history(&self) {
        self.update(|state| state.is_history_open = true);
        self.view_history(None).await;
    }

    /// Select a commit, preferring full detail from the service and falling
    /// back to the already loaded summary.
    pub async fn view_commit(&self, hash: &str) -> Option<GitCommit> {
        let Some(op) = self.begin_read() else {
            return self.state().commits.into_iter().find(|c| c.matches(hash));
        };

        let selected = match self.inner.git.show(&op.workspace, hash).await {
            Ok(commit) => Some(commit),
            Err(e) => {
                tracing::warn!("Could not load commit {}: {}", hash, e);
                self.state().commits.into_iter().find(|c| c.matches(hash))
            }
        };

        let applied = self.apply(&op, |state| state.selected_commit = selected.clone());
        if applied { selected } else { None }
    }

    /// Restore the workspace to `hash`. The caller has already confirmed.
    pub async fn revert_to_commit(&self, hash: &str) -> bool {
        let Ok(op) = self.begin_mutation() else {
            return false;
        };

        let request = RevertRequest {
            workspace: op.workspace.clone(),
            hash: hash.to_string(),
        };
        if let Err(e) = self.inner.git.revert(request).await {
            self.fail(&op, e);
            return false;
        }
        tracing::info!("Reverted {} to {}", op.workspace, hash);

        if self.is_current(&op) {
            self.refresh_status().await;
        }
        true
    }

    /// Create and check out `name`. The branch is shown as current right
    /// away; the follow-up refresh confirms or corrects it.
    pub async fn create_branch(&self, name: &str) -> bool {
        let Ok(op) = self.begin_mutation() else {
            return false;
        };

        let name = name.trim();
        if name.is_empty() {
            self.fail(&op, VcsError::InvalidRequest("Branch name is required".into()));
            return false;
        }

        let request = BranchRequest {
            workspace: op.workspace.clone(),
            name: name.to_string(),
            checkout: true,
        };
        if let Err(e) = self.inner.git.create_branch(request).await {
            self.fail(&op, e);
            return false;
        }

        self.finish_branch_change(&op, name).await
    }

    pub async fn switch_branch(&self, name: &str) -> bool {
        let Ok(op) = self.begin_mutation() else {
            return false;
        };

        let name = name.trim();
        if name.is_empty() {
            self.fail(&op, VcsError::InvalidRequest("Branch name is required".into()));
            return false;
        }

        let request = CheckoutRequest {
            workspace: op.workspace.clone(),
            branch: name.to_string(),
        };
        if let Err(e) = self.inner.git.checkout(request).await {
            self.fail(&op, e);
            return false;
        }

        self.finish_branch_change(&op, name).await
    }

    async fn finish_branch_change(&self, op: &Operation<'_>, name: &str) -> bool {
        tracing::info!("Now on branch {} in {}", name, op.workspace);
        if self.apply(op, |state| state.current_branch = BranchRef::Tentative(name.to_string())) {
            self.refresh_status().await;
        }
        true
    }

    /// Pull, then push. A failed pull skips the push.
    pub async fn sync_changes(&self) -> bool {
        let Ok(op) = self.begin_mutation() else {
            return false;
        };

        let pull = PullRequest {
            workspace: op.workspace.clone(),
        };
        if let Err(e) = self.inner.git.pull(pull).await {
            self.fail(&op, e);
            return false;
        }

        let push = PushRequest {
            workspace: op.workspace.clone(),
            set_upstream: false,
            token: credentials::git_token(&*self.inner.store),
        };
        if let Err(e) = self.inner.git.push(push).await {
            self.fail(&op, e);
            return false;
        }
        tracing::info!("Synced {} with remote", op.workspace);

        if self.is_current(&op) {
            self.refresh_status().await;
        }
        true
    }

    /// Open a review request from the current branch into the main branch.
    pub async fn submit_for_review(&self, title: &str, description: &str) -> Option<String> {
        let op = self.begin_mutation().ok()?;

        let snapshot = self.state();
        let head = snapshot.current_branch.name().to_string();
        let base = snapshot.main_branch;

        if title.trim().is_empty() {
            self.fail(&op, VcsError::InvalidRequest("Review title is required".into()));
            return None;
        }
        if head == base {
            self.fail(
                &op,
                VcsError::InvalidRequest(format!("Cannot open a review from {head} into itself")),
            );
            return None;
        }

        let request = ReviewRequest {
            workspace: op.workspace.clone(),
            title: title.to_string(),
            description: description.to_string(),
            base,
            head,
        };
        match self.inner.git.open_review(request).await {
            Ok(Some(url)) => {
                tracing::info!("Opened review request {}", url);
                Some(url)
            }
            Ok(None) => {
                tracing::warn!("Review request created but the service returned no URL");
                None
            }
            Err(e) => {
                self.fail(&op, e);
                None
            }
        }
    }

    // Repository setup

    pub async fn initialize_repository(
        &self,
        user_name: Option<&str>,
        user_email: Option<&str>,
    ) -> bool {
        let Ok(op) = self.begin_mutation() else {
            return false;
        };

        let request = InitRequest {
            workspace: op.workspace.clone(),
            user_name: user_name.filter(|s| !s.is_empty()).map(str::to_string),
            user_email: user_email.filter(|s| !s.is_empty()).map(str::to_string),
        };
        if let Err(e) = self.inner.git.init(request).await {
            self.fail(&op, e);
            return false;
        }
        tracing::info!("Initialized repository in {}", op.workspace);

        if self.is_current(&op) {
            self.refresh_status().await;
        }
        true
    }

    pub async fn configure_identity(&self, user_name: &str, user_email: &str) -> bool {
        let Ok(op) = self.begin_mutation() else {
            return false;
        };

        let request = IdentityRequest {
            workspace: op.workspace.clone(),
            user_name: user_name.to_string(),
            user_email: user_email.to_string(),
        };
        match self.inner.git.configure(request).await {
            Ok(_) => true,
            Err(e) => {
                self.fail(&op, e);
                false
            }
        }
    }

    pub async fn connect_remote(&self, url: &str) -> bool {
        let Ok(op) = self.begin_mutation() else {
            return false;
        };

        if url.trim().is_empty() {
            self.fail(&op, VcsError::InvalidRequest("Remote URL is required".into()));
            return false;
        }

        let request = RemoteRequest {
            workspace: op.workspace.clone(),
            url: url.trim().to_string(),
            name: DEFAULT_REMOTE.to_string(),
        };
        match self.inner.git.add_remote(request).await {
            Ok(_) => {
                tracing::info!("Connected {} to {}", op.workspace, url);
                true
            }
            Err(e) => {
                self.fail(&op, e);
                false
            }
        }
    }

    /// Create a hosted repository for the workspace. Needs a hosting token.
    pub async fn create_remote_repository(&self, name: &str, private: bool) -> Option<String> {
        let op = self.begin_mutation().ok()?;

        if name.trim().is_empty() {
            self.fail(&op, VcsError::InvalidRequest("Repository name is required".into()));
            return None;
        }
        let Some(token) = credentials::git_token(&*self.inner.store) else {
            self.fail(
                &op,
                VcsError::InvalidRequest(format!(
                    "No {} token found; configure the {} integration first",
                    credentials::GIT_INTEGRATION,
                    credentials::GIT_INTEGRATION
                )),
            );
            return None;
        };

        let request = CreateRepositoryRequest {
            workspace: op.workspace.clone(),
            name: name.trim().to_string(),
            private,
            token,
        };
        match self.inner.git.create_repository(request).await {
            Ok(url) => {
                tracing::info!("Created remote repository {:?}", url);
                url
            }
            Err(e) => {
                self.fail(&op, e);
                None
            }
        }
    }

    pub async fn repository_config(&self) -> Option<GitConfig> {
        let op = self.begin_read()?;
        match self.inner.git.read_config(&op.workspace).await {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!("Could not read git config for {}: {}", op.workspace, e);
                None
            }
        }
    }

    pub async fn list_branches(&self) -> Vec<BranchInfo> {
        let Some(op) = self.begin_read() else {
            return Vec::new();
        };
        match self.inner.git.branches(&op.workspace).await {
            Ok(response) => response.branches,
            Err(e) => {
                tracing::warn!("Could not list branches for {}: {}", op.workspace, e);
                Vec::new()
            }
        }
    }

    /// Raw patch text of the pending changes.
    pub async fn pending_diff(&self, file: Option<&str>) -> Option<String> {
        let op = self.begin_read()?;
        match self.inner.git.diff(&op.workspace, file).await {
            Ok(response) => Some(response.diff),
            Err(e) => {
                tracing::warn!("Could not load diff for {}: {}", op.workspace, e);
                None
            }
        }
    }
}

/// Synthetic history shown when the log is unavailable and placeholders are
/// enabled. Every entry is flagged `placeholder`.
fn placeholder_history() -> Vec<GitCommit> {
    let now = Utc::now();
    [
        ("placeholder-0", "Initial capability specifications", now - Duration::hours(2)),
        ("placeholder-1", "Added enabler documentation", now - Duration::days(1)),
    ]
    .into_iter()
    .map(|(hash, message, at)| GitCommit {
        hash: hash.to_string(),
        short_hash: hash.to_string(),
        message: message.to_string(),
        author: "Placeholder".to_string(),
        date: at.to_rfc3339(),
        relative_date: format_relative_time(at.timestamp()),
        body: String::new(),
        changed_files: Vec::new(),
        placeholder: true,
    })
    .collect()
}
