use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Ack, BranchListResponse, BranchRequest, CheckoutRequest, CommitRequest,
    CreateRepositoryRequest, GitCommit, GitConfig, IdentityRequest, InitRequest, PullRequest,
    PushRequest, RawDiffResponse, ReadmeRequest, RemoteRequest, RevertRequest, ReviewRequest,
    StatusResponse,
};

/// The remote git-control service, one method per verb.
///
/// Implementations hold no state and never retry; every call is
/// independently retryable by the caller.
#[async_trait]
pub trait GitControl: Send + Sync {
    /// `GET /git/status`. A workspace without a repository fails with an
    /// error for which `is_not_a_repository()` is true.
    async fn status(&self, workspace: &str) -> Result<StatusResponse>;

    async fn commit(&self, request: CommitRequest) -> Result<Ack>;

    async fn push(&self, request: PushRequest) -> Result<Ack>;

    async fn pull(&self, request: PullRequest) -> Result<Ack>;

    /// Create a branch, checking it out when `request.checkout` is set.
    async fn create_branch(&self, request: BranchRequest) -> Result<Ack>;

    async fn checkout(&self, request: CheckoutRequest) -> Result<Ack>;

    /// Most-recent-first commit log, optionally limited to one file.
    async fn log(&self, workspace: &str, file: Option<&str>) -> Result<Vec<GitCommit>>;

    async fn show(&self, workspace: &str, hash: &str) -> Result<GitCommit>;

    async fn revert(&self, request: RevertRequest) -> Result<Ack>;

    /// Open a review request; returns its URL when the service reports one.
    async fn open_review(&self, request: ReviewRequest) -> Result<Option<String>>;

    async fn init(&self, request: InitRequest) -> Result<Ack>;

    async fn configure(&self, request: IdentityRequest) -> Result<Ack>;

    async fn add_remote(&self, request: RemoteRequest) -> Result<Ack>;

    /// Create a hosted repository and wire it up as the workspace remote.
    async fn create_repository(&self, request: CreateRepositoryRequest) -> Result<Option<String>>;

    async fn read_config(&self, workspace: &str) -> Result<GitConfig>;

    async fn branches(&self, workspace: &str) -> Result<BranchListResponse>;

    async fn diff(&self, workspace: &str, file: Option<&str>) -> Result<RawDiffResponse>;

    /// Regenerate the workspace summary document.
    async fn generate_readme(&self, request: ReadmeRequest) -> Result<Ack>;
}
