use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitCommit {
    pub hash: String,
    #[serde(default)]
    pub short_hash: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub author: String,
    /// ISO-8601 author date
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub relative_date: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changed_files: Vec<ChangedFile>,
    /// Set only on synthetic entries substituted when the log is unavailable.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub placeholder: bool,
}

impl GitCommit {
    pub fn matches(&self, hash: &str) -> bool {
        !hash.is_empty() && (self.hash == hash || self.short_hash == hash)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    pub status: String,
    pub file: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitListResponse {
    #[serde(default)]
    pub commits: Vec<GitCommit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitShowResponse {
    pub commit: GitCommit,
}
