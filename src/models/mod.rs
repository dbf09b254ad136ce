//! Data transfer objects exchanged with the git-control service.
//!
//! These structs mirror the service's camelCase JSON.
//! - `status`: GitStatus, StatusResponse, GitConfig, BranchInfo
//! - `commit`: GitCommit, ChangedFile, CommitListResponse, CommitShowResponse
//! - `diff`: GitDiff, DiffHunk, RawDiffResponse
//! - `requests`: request bodies for the mutating endpoints

pub mod commit;
pub mod diff;
pub mod requests;
pub mod status;

pub use commit::*;
pub use diff::*;
pub use requests::*;
pub use status::*;
