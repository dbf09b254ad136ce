//! Working-tree status DTOs.
//!
//! - `GitStatus`: staged/unstaged/untracked partition plus ahead/behind
//! - `StatusResponse`: body of `GET /git/status`
//! - `GitConfig`: body of `GET /git/config` (identity and remote)
//! - `BranchInfo`, `BranchListResponse`: body of `GET /git/branches`

use serde::{Deserialize, Serialize};

use super::GitDiff;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitStatus {
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub is_clean: bool,
    #[serde(default)]
    pub staged: Vec<String>,
    #[serde(default)]
    pub unstaged: Vec<String>,
    #[serde(default)]
    pub untracked: Vec<String>,
    #[serde(default)]
    pub ahead: u32,
    #[serde(default)]
    pub behind: u32,
}

impl GitStatus {
    pub fn total_changes(&self) -> usize {
        self.staged.len() + self.unstaged.len() + self.untracked.len()
    }

    pub fn has_changes(&self) -> bool {
        self.total_changes() > 0
    }

    /// Recompute `is_clean` from the file sets if the service got it wrong.
    pub fn normalized(mut self) -> Self {
        let clean = !self.has_changes();
        if self.is_clean != clean {
            tracing::warn!(
                "Status for branch {} reported is_clean={} with {} changed paths",
                self.branch,
                self.is_clean,
                self.total_changes()
            );
            self.is_clean = clean;
        }
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: Option<GitStatus>,
    #[serde(default)]
    pub changes: Vec<GitDiff>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitConfig {
    #[serde(default)]
    pub initialized: bool,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub remote_url: String,
    #[serde(default)]
    pub remote_name: String,
    #[serde(default)]
    pub current_branch: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchInfo {
    pub name: String,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub last_commit: String,
    #[serde(default)]
    pub is_remote: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchListResponse {
    #[serde(default)]
    pub branches: Vec<BranchInfo>,
    #[serde(default)]
    pub current: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_service_status_shape() {
        let body = r#"{
            "status": {
                "branch": "main",
                "isClean": false,
                "staged": [],
                "unstaged": ["specs/a.md", "specs/b.md"],
                "untracked": ["specs/c.md"],
                "ahead": 1,
                "behind": 0
            }
        }"#;
        let response: StatusResponse = serde_json::from_str(body).unwrap();
        let status = response.status.unwrap();
        assert!(status.has_changes());
        assert_eq!(status.total_changes(), 3);
        assert_eq!(status.ahead, 1);
        assert!(response.changes.is_empty());
    }

    #[test]
    fn normalized_fixes_inconsistent_clean_flag() {
        let status = GitStatus {
            branch: "main".into(),
            is_clean: true,
            staged: vec![],
            unstaged: vec!["a.md".into()],
            untracked: vec![],
            ahead: 0,
            behind: 0,
        };
        assert!(!status.normalized().is_clean);
    }
}
