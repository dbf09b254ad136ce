//! HTTP implementation of `GitControl` over `reqwest`.
//!
//! - GET  /git/status, /git/log, /git/show, /git/config, /git/branches, /git/diff
//! - POST /git/commit, /git/push, /git/pull, /git/branch, /git/checkout,
//!   /git/revert, /git/pr, /git/init, /git/config, /git/remote,
//!   /git/create-repo, /generate-readme
//!
//! Every query and body is scoped by the workspace path. Failed responses are
//! turned into `VcsError::Http` carrying the service's `{error, details}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Result, VcsError};
use crate::git::GitControl;
use crate::models::{
    Ack, BranchListResponse, BranchRequest, CheckoutRequest, CommitListResponse, CommitRequest,
    CommitShowResponse, CreateRepositoryRequest, GitCommit, GitConfig, IdentityRequest,
    InitRequest, PullRequest, PushRequest, RawDiffResponse, ReadmeRequest, RemoteRequest,
    RevertRequest, ReviewRequest, StatusResponse, UrlResponse,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct GitControlClient {
    client: reqwest::Client,
    base_url: String,
}

impl GitControlClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VcsError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_reqwest_client(client, base_url))
    }

    pub fn with_reqwest_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        fallback: &str,
    ) -> Result<T> {
        tracing::debug!("GET {} {:?}", path, query);
        let response = self.client.get(self.url(path)).query(query).send().await?;
        decode(response, fallback).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<T> {
        tracing::debug!("POST {}", path);
        let response = self.client.post(self.url(path)).json(body).send().await?;
        decode(response, fallback).await
    }
}

/// Decode a success body, or turn a failure status into `VcsError::Http`.
async fn decode<T: DeserializeOwned>(response: reqwest::Response, fallback: &str) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(VcsError::from_response(status, &body, fallback));
    }

    // Some endpoints answer 200 with an empty body.
    let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
    serde_json::from_str(body)
        .map_err(|e| VcsError::InvalidResponse(format!("{}: {}", fallback, e)))
}

#[async_trait]
impl GitControl for GitControlClient {
    async fn status(&self, workspace: &str) -> Result<StatusResponse> {
        let mut response: StatusResponse = self
            .get_json("/git/status", &[("workspace", workspace)], "Failed to fetch git status")
            .await?;
        response.status = response.status.map(|s| s.normalized());
        Ok(response)
    }

    async fn commit(&self, request: CommitRequest) -> Result<Ack> {
        self.post_json("/git/commit", &request, "Failed to save version").await
    }

    async fn push(&self, request: PushRequest) -> Result<Ack> {
        self.post_json("/git/push", &request, "Failed to push changes").await
    }

    async fn pull(&self, request: PullRequest) -> Result<Ack> {
        self.post_json("/git/pull", &request, "Failed to pull changes").await
    }

    async fn create_branch(&self, request: BranchRequest) -> Result<Ack> {
        self.post_json("/git/branch", &request, "Failed to create branch").await
    }

    async fn checkout(&self, request: CheckoutRequest) -> Result<Ack> {
        self.post_json("/git/checkout", &request, "Failed to switch branch").await
    }

    async fn log(&self, workspace: &str, file: Option<&str>) -> Result<Vec<GitCommit>> {
        let mut query = vec![("workspace", workspace)];
        if let Some(file) = file {
            query.push(("file", file));
        }
        let response: CommitListResponse = self
            .get_json("/git/log", &query, "Failed to fetch history")
            .await?;
        Ok(response.commits)
    }

    async fn show(&self, workspace: &str, hash: &str) -> Result<GitCommit> {
        let response: CommitShowResponse = self
            .get_json(
                "/git/show",
                &[("workspace", workspace), ("hash", hash)],
                "Failed to fetch commit details",
            )
            .await?;
        Ok(response.commit)
    }

    async fn revert(&self, request: RevertRequest) -> Result<Ack> {
        self.post_json("/git/revert", &request, "Failed to revert to commit").await
    }

    async fn open_review(&self, request: ReviewRequest) -> Result<Option<String>> {
        let response: UrlResponse = self
            .post_json("/git/pr", &request, "Failed to create pull request")
            .await?;
        Ok(response.url)
    }

    async fn init(&self, request: InitRequest) -> Result<Ack> {
        self.post_json("/git/init", &request, "Failed to initialize repository").await
    }

    async fn configure(&self, request: IdentityRequest) -> Result<Ack> {
        self.post_json("/git/config", &request, "Failed to save configuration").await
    }

    async fn add_remote(&self, request: RemoteRequest) -> Result<Ack> {
        self.post_json("/git/remote", &request, "Failed to connect remote").await
    }

    async fn create_repository(&self, request: CreateRepositoryRequest) -> Result<Option<String>> {
        let response: UrlResponse = self
            .post_json("/git/create-repo", &request, "Failed to create repository")
            .await?;
        Ok(response.url)
    }

    async fn read_config(&self, workspace: &str) -> Result<GitConfig> {
        self.get_json("/git/config", &[("workspace", workspace)], "Failed to read git config")
            .await
    }

    async fn branches(&self, workspace: &str) -> Result<BranchListResponse> {
        self.get_json("/git/branches", &[("workspace", workspace)], "Failed to list branches")
            .await
    }

    async fn diff(&self, workspace: &str, file: Option<&str>) -> Result<RawDiffResponse> {
        let mut query = vec![("workspace", workspace)];
        if let Some(file) = file {
            query.push(("file", file));
        }
        self.get_json("/git/diff", &query, "Failed to fetch diff").await
    }

    async fn generate_readme(&self, request: ReadmeRequest) -> Result<Ack> {
        self.post_json("/generate-readme", &request, "README generation failed")
            .await
    }
}
