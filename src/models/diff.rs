//! Diff-related DTOs.
//!
//! - `GitDiff`: per-file summary attached to a status fetch
//! - `DiffHunk`: contiguous block of changes, header plus raw lines
//! - `RawDiffResponse`: body of `GET /git/diff` (unparsed patch text)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitDiff {
    pub file: String,
    #[serde(default)]
    pub additions: u32,
    #[serde(default)]
    pub deletions: u32,
    #[serde(default)]
    pub hunks: Vec<DiffHunk>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffHunk {
    pub header: String,
    #[serde(default)]
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDiffResponse {
    #[serde(default)]
    pub diff: String,
    #[serde(default)]
    pub has_diff: bool,
}
