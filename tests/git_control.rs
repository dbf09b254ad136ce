//! End-to-end tests against an in-process fake git-control service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use workspace_vcs::models::{CommitRequest, PushRequest};
use workspace_vcs::store::MemoryStore;
use workspace_vcs::{BranchRef, Config, GitControl, GitControlClient, Orchestrator, VcsError};

const REPO: &str = "/work/spec";

type Params = Query<HashMap<String, String>>;

#[derive(Default)]
struct Service {
    requests: Mutex<Vec<(&'static str, Value)>>,
}

impl Service {
    fn record(&self, path: &'static str, body: Value) {
        self.requests.lock().unwrap().push((path, body));
    }

    fn bodies(&self, path: &str) -> Vec<Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| *p == path)
            .map(|(_, b)| b.clone())
            .collect()
    }
}

fn not_a_repository() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "Failed to get git status",
            "details": "fatal: not a git repository (or any of the parent directories): .git"
        })),
    )
        .into_response()
}

async fn status(State(svc): State<Arc<Service>>, Query(q): Params) -> Response {
    svc.record("/git/status", json!(q));
    if q.get("workspace").map(String::as_str) != Some(REPO) {
        return not_a_repository();
    }
    Json(json!({
        "status": {
            "branch": "feature-x",
            "isClean": true,
            "staged": [],
            "unstaged": ["specs/a.md"],
            "untracked": ["specs/new.md"],
            "ahead": 1,
            "behind": 0
        },
        "changes": [
            { "file": "specs/a.md", "additions": 3, "deletions": 1, "hunks": [] }
        ]
    }))
    .into_response()
}

async fn commit(State(svc): State<Arc<Service>>, Json(body): Json<Value>) -> Json<Value> {
    svc.record("/git/commit", body);
    Json(json!({ "success": true, "message": "Committed" }))
}

async fn push(State(svc): State<Arc<Service>>, Json(body): Json<Value>) -> Response {
    svc.record("/git/push", body);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Push rejected", "details": "no upstream configured" })),
    )
        .into_response()
}

async fn readme(State(svc): State<Arc<Service>>, Json(body): Json<Value>) -> StatusCode {
    svc.record("/generate-readme", body);
    StatusCode::OK
}

async fn log(State(svc): State<Arc<Service>>, Query(q): Params) -> Json<Value> {
    svc.record("/git/log", json!(q));
    Json(json!({
        "commits": [
            {
                "hash": "b3f1c2d4e5f60718293a4b5c6d7e8f9012345678",
                "shortHash": "b3f1c2d",
                "message": "Refine enabler ENB-12",
                "author": "Ada",
                "date": "2024-05-01T10:00:00+00:00",
                "relativeDate": "2 days ago"
            },
            {
                "hash": "a1e2d3c4b5a60718293a4b5c6d7e8f9012345678",
                "shortHash": "a1e2d3c",
                "message": "Initial specs",
                "author": "Ada",
                "date": "2024-04-28T09:00:00+00:00",
                "relativeDate": "5 days ago"
            }
        ]
    }))
}

async fn show(State(svc): State<Arc<Service>>, Query(q): Params) -> Json<Value> {
    svc.record("/git/show", json!(q));
    Json(json!({
        "commit": {
            "hash": "a1e2d3c4b5a60718293a4b5c6d7e8f9012345678",
            "shortHash": "a1e2d3c",
            "message": "Initial specs",
            "author": "Ada",
            "date": "2024-04-28T09:00:00+00:00",
            "body": "Adds capability CAP-1.",
            "changedFiles": [{ "status": "A", "file": "specs/cap-1.md" }]
        }
    }))
}

async fn pr(State(svc): State<Arc<Service>>, Json(body): Json<Value>) -> Json<Value> {
    svc.record("/git/pr", body);
    Json(json!({ "success": true, "url": "https://github.com/acme/spec/pull/12" }))
}

async fn slow_branches() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({ "branches": [] }))
}

async fn spawn_service() -> (String, Arc<Service>) {
    let svc = Arc::new(Service::default());
    let app = Router::new()
        .route("/git/status", get(status))
        .route("/git/commit", post(commit))
        .route("/git/push", post(push))
        .route("/generate-readme", post(readme))
        .route("/git/log", get(log))
        .route("/git/show", get(show))
        .route("/git/pr", post(pr))
        .route("/git/branches", get(slow_branches))
        .with_state(svc.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), svc)
}

fn orchestrator(base_url: &str, store: MemoryStore) -> Orchestrator {
    let client = GitControlClient::new(base_url, Duration::from_secs(5)).unwrap();
    let config = Config {
        service_url: base_url.to_string(),
        ..Config::default()
    };
    Orchestrator::new(Arc::new(client), Arc::new(store), config)
}

#[tokio::test]
async fn status_without_repository_is_recognised() {
    let (url, _svc) = spawn_service().await;
    let client = GitControlClient::new(&url, Duration::from_secs(5)).unwrap();

    let err = client.status("/tmp/empty").await.unwrap_err();
    assert!(err.is_not_a_repository());
    assert!(matches!(err, VcsError::Http { status: 400, .. }));
}

#[tokio::test]
async fn status_flag_is_normalized_against_file_sets() {
    let (url, svc) = spawn_service().await;
    let client = GitControlClient::new(&url, Duration::from_secs(5)).unwrap();

    let response = client.status(REPO).await.unwrap();
    let status = response.status.unwrap();
    assert!(!status.is_clean);
    assert_eq!(status.total_changes(), 2);
    assert_eq!(response.changes[0].additions, 3);
    assert_eq!(svc.bodies("/git/status")[0]["workspace"], REPO);
}

#[tokio::test]
async fn failed_push_surfaces_service_message() {
    let (url, _svc) = spawn_service().await;
    let client = GitControlClient::new(&url, Duration::from_secs(5)).unwrap();

    let err = client
        .push(PushRequest {
            workspace: REPO.into(),
            set_upstream: false,
            token: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Push rejected");
    assert!(!err.is_not_a_repository());
}

#[tokio::test]
async fn commit_body_uses_service_field_names() {
    let (url, svc) = spawn_service().await;
    let client = GitControlClient::new(&url, Duration::from_secs(5)).unwrap();

    let ack = client
        .commit(CommitRequest {
            workspace: REPO.into(),
            message: "Draft".into(),
            files: vec!["specs/a.md".into()],
        })
        .await
        .unwrap();
    assert!(ack.success);

    let body = &svc.bodies("/git/commit")[0];
    assert_eq!(body["workspace"], REPO);
    assert_eq!(body["message"], "Draft");
    assert_eq!(body["files"], json!(["specs/a.md"]));
}

#[tokio::test]
async fn slow_service_times_out() {
    let (url, _svc) = spawn_service().await;
    let client = GitControlClient::new(&url, Duration::from_millis(200)).unwrap();

    let err = client.branches(REPO).await.unwrap_err();
    assert!(matches!(err, VcsError::Timeout(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_service_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = GitControlClient::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap();
    let err = client.status(REPO).await.unwrap_err();
    assert!(matches!(err, VcsError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn save_version_commits_even_when_push_is_rejected() {
    let (url, svc) = spawn_service().await;
    let store = MemoryStore::with_entries([
        ("integration_config_github", r#"{"fields":{"token":"ghp_e2e"}}"#),
        ("anthropic_api_key", "sk-e2e"),
    ]);
    let orch = orchestrator(&url, store);
    orch.set_workspace(Some(REPO)).await;

    let state = orch.state();
    assert!(state.is_git_initialized);
    assert_eq!(state.current_branch, BranchRef::Confirmed("feature-x".into()));

    assert!(orch.save_version("Refine enablers").await);
    assert_eq!(orch.state().error, None);

    let readme = &svc.bodies("/generate-readme")[0];
    assert_eq!(readme["apiKey"], "sk-e2e");

    let commit = &svc.bodies("/git/commit")[0];
    assert_eq!(commit["files"], json!(["specs/a.md"]));

    let push = &svc.bodies("/git/push")[0];
    assert_eq!(push["setUpstream"], true);
    assert_eq!(push["token"], "ghp_e2e");
}

#[tokio::test]
async fn unbound_repository_hides_panel() {
    let (url, _svc) = spawn_service().await;
    let orch = orchestrator(&url, MemoryStore::new());
    orch.set_workspace(Some("/work/plain-folder")).await;

    let state = orch.state();
    assert!(!state.is_git_initialized);
    assert_eq!(state.error, None);
    assert!(!workspace_vcs::view::panel(&state).visible);
}

#[tokio::test]
async fn history_browsing_round_trip() {
    let (url, svc) = spawn_service().await;
    let orch = orchestrator(&url, MemoryStore::new());
    orch.set_workspace(Some(REPO)).await;

    orch.view_history(Some("specs/cap-1.md")).await;
    assert_eq!(svc.bodies("/git/log")[0]["file"], "specs/cap-1.md");

    let history = workspace_vcs::view::history(&orch.state());
    assert!(history.open);
    assert_eq!(history.entries.len(), 2);
    assert_eq!(history.entries[0].when, "2 days ago");

    let commit = orch.view_commit("a1e2d3c").await.unwrap();
    assert_eq!(commit.changed_files[0].file, "specs/cap-1.md");
    assert_eq!(svc.bodies("/git/show")[0]["hash"], "a1e2d3c");
}

#[tokio::test]
async fn review_request_returns_url() {
    let (url, svc) = spawn_service().await;
    let orch = orchestrator(&url, MemoryStore::new());
    orch.set_workspace(Some(REPO)).await;
    orch.enable_team_mode().await;
    assert!(orch.state().can_submit_for_review());

    let link = orch.submit_for_review("Add ENB-12", "Ready for review").await;
    assert_eq!(link.as_deref(), Some("https://github.com/acme/spec/pull/12"));

    let body = &svc.bodies("/git/pr")[0];
    assert_eq!(body["head"], "feature-x");
    assert_eq!(body["base"], "main");
}
