//! Error types for the git-control client and the orchestrator.
//!
//! Defines `VcsError` for every failure a version-control action can hit and
//! maps failed HTTP responses from the git-control service into it.
//!
//! Response mappings:
//! - non-2xx with `{error, details}` body → `Http`
//! - request timed out → `Timeout`
//! - connection refused / DNS / TLS → `Network`
//! - undecodable success body → `InvalidResponse`

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Marker the git-control service puts in its 400 body when the workspace
/// has no repository.
const NOT_A_REPOSITORY: &str = "not a git repository";

#[derive(Error, Debug)]
pub enum VcsError {
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        details: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No workspace selected")]
    NoWorkspace,

    #[error("Another version control operation is already in progress")]
    Busy,

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl VcsError {
    /// True for the service's "target path is not a repository" answer.
    pub fn is_not_a_repository(&self) -> bool {
        match self {
            VcsError::Http {
                status,
                message,
                details,
            } => {
                *status == StatusCode::BAD_REQUEST.as_u16()
                    && (contains_marker(message)
                        || details.as_deref().is_some_and(contains_marker))
            }
            _ => false,
        }
    }

    /// Build an `Http` error from a failed response's status and raw body.
    ///
    /// Bodies that are not the service's JSON error shape fall back to the
    /// given default message.
    pub fn from_response(status: StatusCode, body: &str, fallback: &str) -> Self {
        let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
        let (message, details) = match parsed {
            Some(ErrorBody {
                error,
                message,
                details,
            }) => (
                error
                    .or(message)
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| fallback.to_string()),
                details,
            ),
            None => (fallback.to_string(), None),
        };

        VcsError::Http {
            status: status.as_u16(),
            message,
            details,
        }
    }
}

fn contains_marker(text: &str) -> bool {
    text.to_lowercase().contains(NOT_A_REPOSITORY)
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
    details: Option<String>,
}

impl From<reqwest::Error> for VcsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            VcsError::Timeout(e.to_string())
        } else if e.is_decode() {
            VcsError::InvalidResponse(e.to_string())
        } else {
            VcsError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for VcsError {
    fn from(e: serde_json::Error) -> Self {
        VcsError::InvalidResponse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VcsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_not_a_repository() {
        let err = VcsError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"error":"fatal: not a git repository (or any of the parent directories): .git"}"#,
            "Failed to fetch git status",
        );
        assert!(err.is_not_a_repository());
    }

    #[test]
    fn marker_in_details_counts() {
        let err = VcsError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"error":"Failed to get git status","details":"Not a git repository"}"#,
            "x",
        );
        assert!(err.is_not_a_repository());
    }

    #[test]
    fn other_statuses_are_not_repository_absence() {
        let err = VcsError::from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":"not a git repository"}"#,
            "x",
        );
        assert!(!err.is_not_a_repository());
        assert!(!VcsError::Network("refused".into()).is_not_a_repository());
    }

    #[test]
    fn non_json_body_uses_fallback_message() {
        let err = VcsError::from_response(StatusCode::BAD_GATEWAY, "<html>", "Failed to push");
        assert_eq!(err.to_string(), "Failed to push");
        match err {
            VcsError::Http { status, .. } => assert_eq!(status, 502),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn message_field_is_accepted() {
        let err = VcsError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"message":"Nothing to commit"}"#,
            "Failed to save version",
        );
        assert_eq!(err.to_string(), "Nothing to commit");
    }
}
