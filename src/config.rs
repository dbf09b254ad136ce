//! Runtime configuration for the orchestrator and its HTTP client.

use std::path::PathBuf;
use std::time::Duration;

use crate::git::DEFAULT_TIMEOUT;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:4001";
pub const DEFAULT_MAIN_BRANCH: &str = "main";

/// What `view_history` shows when the log cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryFallback {
    /// Keep the previous list and surface the failure.
    #[default]
    Disabled,
    /// Substitute clearly marked placeholder commits (demo deployments).
    Placeholder,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub service_url: String,
    /// Per-request timeout applied by the HTTP client.
    pub request_timeout: Duration,
    /// Trunk used as the base for review requests.
    pub main_branch: String,
    pub history_fallback: HistoryFallback,
    pub store_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            main_branch: DEFAULT_MAIN_BRANCH.to_string(),
            history_fallback: HistoryFallback::default(),
            store_path: default_store_path(),
        }
    }
}

/// `<config dir>/workspace-vcs/store.json`, or the temp dir when the platform
/// has no config dir.
pub fn default_store_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(std::env::temp_dir);
    path.push("workspace-vcs");
    path.push("store.json");
    path
}
