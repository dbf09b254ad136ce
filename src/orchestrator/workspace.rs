//! Binding between the orchestrator and the selected workspace path.
//!
//! The selection is owned elsewhere (a UI, the CLI). Whenever it changes the
//! orchestrator drops everything it knew about the previous workspace and
//! polls the new one.

use std::path::{Path, PathBuf};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::orchestrator::{Orchestrator, VersionControlState};

impl Orchestrator {
    pub fn workspace(&self) -> Option<String> {
        self.inner.lock().workspace.clone()
    }

    /// Rebind to `path`. A changed path resets state (team mode is kept),
    /// invalidates in-flight results, and triggers a status refresh.
    pub async fn set_workspace<P: AsRef<Path>>(&self, path: Option<P>) {
        let path = path.map(|p| p.as_ref().to_string_lossy().into_owned());

        let rebound = {
            let mut shared = self.inner.lock();
            if shared.workspace == path {
                false
            } else {
                let team_mode = shared.state.team_mode_enabled;
                shared.state = VersionControlState::new(team_mode, &self.inner.config.main_branch);
                shared.workspace = path.clone();
                shared.epoch += 1;
                shared.in_flight = 0;
                shared.mutating = false;
                true
            }
        };

        if !rebound {
            return;
        }

        match path {
            Some(path) => {
                tracing::info!("Bound workspace {}", path);
                self.refresh_status().await;
            }
            None => tracing::info!("Workspace unbound"),
        }
    }

    /// Follow an externally owned workspace selection until its sender is
    /// dropped.
    pub fn bind(&self, mut selection: watch::Receiver<Option<PathBuf>>) -> JoinHandle<()> {
        let orchestrator = self.clone();
        tokio::spawn(async move {
            loop {
                let path = selection.borrow_and_update().clone();
                orchestrator.set_workspace(path).await;
                if selection.changed().await.is_err() {
                    break;
                }
            }
        })
    }
}
