//! Version control orchestrator.
//!
//! Owns `VersionControlState` for the bound workspace, sequences the remote
//! calls behind every action, and decides which failures are surfaced and
//! which are only logged.
//!
//! - `actions`: remote-backed actions (status, save, history, branches, ...)
//! - `workspace`: binding to the externally selected workspace path
//! - `poller`: periodic status refresh
//!
//! Every operation captures the binding epoch when it starts. Results that
//! land after the binding changed are dropped instead of being applied to the
//! new workspace's state.

mod actions;
pub mod poller;
pub mod state;
pub mod workspace;


use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::Config;
use crate::error::VcsError;
use crate::git::GitControl;
use crate::store::{self, KeyValueStore};

pub use poller::Poller;
pub use state::{BranchRef, VersionControlState};

/// Cheap to clone; all clones drive the same state.
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    git: Arc<dyn GitControl>,
    store: Arc<dyn KeyValueStore>,
    config: Config,
    shared: Mutex<Shared>,
}

struct Shared {
    state: VersionControlState,
    workspace: Option<String>,
    epoch: u64,
    in_flight: usize,
    mutating: bool,
}

/// An operation in flight against one binding. Dropping it clears the
/// loading flag (and the mutation lock) for that binding.
struct Operation<'a> {
    inner: &'a Inner,
    workspace: String,
    epoch: u64,
    mutating: bool,
}

impl Drop for Operation<'_> {
    fn drop(&mut self) {
        let mut shared = self.inner.lock();
        if shared.epoch != self.epoch {
            return;
        }
        shared.in_flight = shared.in_flight.saturating_sub(1);
        shared.state.is_loading = shared.in_flight > 0;
        if self.mutating {
            shared.mutating = false;
        }
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Orchestrator {
    pub fn new(git: Arc<dyn GitControl>, store: Arc<dyn KeyValueStore>, config: Config) -> Self {
        let team_mode = store::load_team_mode(&*store);
        let state = VersionControlState::new(team_mode, &config.main_branch);

        Self {
            inner: Arc::new(Inner {
                git,
                store,
                config,
                shared: Mutex::new(Shared {
                    state,
                    workspace: None,
                    epoch: 0,
                    in_flight: 0,
                    mutating: false,
                }),
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> VersionControlState {
        self.inner.lock().state.clone()
    }

    /// Start a read-only operation. `None` when no workspace is bound.
    fn begin_read(&self) -> Option<Operation<'_>> {
        let mut shared = self.inner.lock();
        let workspace = shared.workspace.clone()?;
        shared.in_flight += 1;
        shared.state.is_loading = true;
        Some(Operation {
            inner: &self.inner,
            workspace,
            epoch: shared.epoch,
            mutating: false,
        })
    }

    /// Start a mutating operation. Fails with `Busy` while another mutation
    /// is running against the same binding; a successful start clears the
    /// surfaced error.
    fn begin_mutation(&self) -> Result<Operation<'_>, VcsError> {
        let mut shared = self.inner.lock();
        let Some(workspace) = shared.workspace.clone() else {
            tracing::debug!("Ignoring version control action: no workspace bound");
            return Err(VcsError::NoWorkspace);
        };
        if shared.mutating {
            tracing::warn!("Rejecting version control action for {}: busy", workspace);
            shared.state.error = Some(VcsError::Busy.to_string());
            return Err(VcsError::Busy);
        }

        shared.mutating = true;
        shared.in_flight += 1;
        shared.state.is_loading = true;
        shared.state.error = None;
        Ok(Operation {
            inner: &self.inner,
            workspace,
            epoch: shared.epoch,
            mutating: true,
        })
    }

    /// Apply `f` if the binding is still the one `op` started against.
    fn apply<F>(&self, op: &Operation<'_>, f: F) -> bool
    where
        F: FnOnce(&mut VersionControlState),
    {
        let mut shared = self.inner.lock();
        if shared.epoch != op.epoch {
            tracing::debug!("Discarding result for stale workspace {}", op.workspace);
            return false;
        }
        f(&mut shared.state);
        true
    }

    fn is_current(&self, op: &Operation<'_>) -> bool {
        self.inner.lock().epoch == op.epoch
    }

    /// Record a required-step failure.
    fn fail(&self, op: &Operation<'_>, error: VcsError) {
        tracing::warn!("Version control action failed for {}: {}", op.workspace, error);
        let message = error.to_string();
        self.apply(op, |state| state.error = Some(message));
    }

    fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut VersionControlState),
    {
        f(&mut self.inner.lock().state);
    }

    // UI actions

    pub fn close_history(&self) {
        self.update(|state| {
            state.is_history_open = false;
            state.selected_commit = None;
        });
    }

    pub fn open_panel(&self) {
        self.update(|state| state.is_panel_open = true);
    }

    pub fn close_panel(&self) {
        self.update(|state| state.is_panel_open = false);
    }

    pub fn toggle_panel(&self) {
        self.update(|state| state.is_panel_open = !state.is_panel_open);
    }

    pub fn clear_error(&self) {
        self.update(|state| state.error = None);
    }

    pub async fn enable_team_mode(&self) {
        self.set_team_mode(true);
        self.refresh_status().await;
    }

    pub async fn disable_team_mode(&self) {
        self.set_team_mode(false);
    }

    fn set_team_mode(&self, enabled: bool) {
        self.update(|state| state.team_mode_enabled = enabled);
        if let Err(e) = store::save_team_mode(&*self.inner.store, enabled) {
            tracing::warn!("Could not persist team mode preference: {}", e);
        }
        tracing::info!("Team mode {}", if enabled { "enabled" } else { "disabled" });
    }
}
