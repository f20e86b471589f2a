//! GitHub REST types

use serde::{Deserialize, Serialize};

use crate::types::Repository;

#[derive(Debug, Deserialize)]
pub struct GithubRepo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    pub html_url: String,
    #[serde(default)]
    pub default_branch: Option<String>,
}

impl From<GithubRepo> for Repository {
    fn from(repo: GithubRepo) -> Self {
        Self {
            id: repo.id,
            name: repo.name,
            full_name: repo.full_name,
            private: repo.private,
            html_url: repo.html_url,
            default_branch: repo.default_branch,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GithubCreateRepo<'a> {
    pub name: &'a str,
    pub private: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub auto_init: bool,
}

/// `GET /repos/{owner}/{repo}/contents/{path}` for a file
#[derive(Debug, Deserialize)]
pub struct GithubContent {
    pub path: String,
    pub sha: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GithubPutContent<'a> {
    pub message: &'a str,
    /// Base64 of the raw file bytes
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct GithubPutContentResponse {
    pub content: GithubContentRef,
}

#[derive(Debug, Deserialize)]
pub struct GithubContentRef {
    pub sha: String,
}

/// Error body: `{"message": "...", "errors": [...]}`
#[derive(Debug, Deserialize)]
pub struct GithubErrorBody {
    pub message: String,
    #[serde(default)]
    pub errors: Vec<GithubErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct GithubErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl GithubErrorBody {
    /// Top-level message followed by the detail messages.
    pub fn full_message(&self) -> String {
        let details: Vec<&str> = self
            .errors
            .iter()
            .filter_map(|e| e.message.as_deref().or(e.code.as_deref()))
            .collect();
        if details.is_empty() {
            self.message.clone()
        } else {
            format!("{} ({})", self.message, details.join("; "))
        }
    }
}
