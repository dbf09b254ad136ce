//! Request bodies for the mutating git-control endpoints.
//!
//! Every body carries the `workspace` path. Optional fields are omitted from
//! the JSON when unset so the service applies its own defaults.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct CommitRequest {
    pub workspace: String,
    pub message: String,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushRequest {
    pub workspace: String,
    pub set_upstream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PullRequest {
    pub workspace: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BranchRequest {
    pub workspace: String,
    pub name: String,
    pub checkout: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    pub workspace: String,
    pub branch: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevertRequest {
    pub workspace: String,
    pub hash: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewRequest {
    pub workspace: String,
    pub title: String,
    pub description: String,
    pub base: String,
    pub head: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitRequest {
    pub workspace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRequest {
    pub workspace: String,
    pub user_name: String,
    pub user_email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoteRequest {
    pub workspace: String,
    pub url: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateRepositoryRequest {
    pub workspace: String,
    pub name: String,
    pub private: bool,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadmeRequest {
    pub workspace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Generic `{success, message}` acknowledgement most endpoints return.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body returned by `/git/pr` and `/git/create-repo`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UrlResponse {
    #[serde(default)]
    pub url: Option<String>,
}
