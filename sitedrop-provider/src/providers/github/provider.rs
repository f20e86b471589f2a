//! GitHub `SourceControlHost` implementation

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Method;

use crate::error::{ProviderError, Result};
use crate::traits::{ErrorContext, ProviderErrorMapper, SourceControlHost};
use crate::types::{CreateRepositoryRequest, PutFileRequest, Repository, RepositoryFile};

use super::http::{NO_BODY, encode_content_path};
use super::types::{
    GithubContent, GithubCreateRepo, GithubPutContent, GithubPutContentResponse, GithubRepo,
};
use super::{GithubProvider, MAX_PAGE_SIZE_REPOS};

impl GithubProvider {
    fn contents_path(&self, repo: &str, path: &str) -> String {
        format!(
            "/repos/{}/{}/contents/{}",
            self.owner,
            repo,
            encode_content_path(path)
        )
    }

    /// Decodes the base64 payload of the contents API (wrapped at 60 columns).
    pub(crate) fn decode_content(&self, content: &GithubContent) -> Result<Vec<u8>> {
        match content.encoding.as_deref() {
            Some("base64") | None => {
                let compact: String = content
                    .content
                    .as_deref()
                    .unwrap_or_default()
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                STANDARD
                    .decode(compact)
                    .map_err(|e| self.parse_error(format!("{}: {e}", content.path)))
            }
            Some(other) => Err(self.parse_error(format!(
                "{}: unsupported content encoding '{other}'",
                content.path
            ))),
        }
    }
}

#[async_trait]
impl SourceControlHost for GithubProvider {
    fn id(&self) -> &'static str {
        "github"
    }

    fn owner(&self) -> &str {
        &self.owner
    }

    async fn create_repository(&self, req: &CreateRepositoryRequest) -> Result<Repository> {
        let body = GithubCreateRepo {
            name: &req.name,
            private: req.private,
            description: req.description.as_deref(),
            auto_init: false,
        };
        let repo: GithubRepo = self
            .execute_json(
                Method::POST,
                "/user/repos",
                &[],
                Some(&body),
                ErrorContext::resource(&req.name),
            )
            .await?;
        log::info!("[github] Created repository {}", repo.full_name);
        Ok(repo.into())
    }

    async fn list_repositories(&self) -> Result<Vec<Repository>> {
        let mut repos = Vec::new();
        let mut page = 1_u32;

        loop {
            let query = [
                ("affiliation", "owner".to_string()),
                ("per_page", MAX_PAGE_SIZE_REPOS.to_string()),
                ("page", page.to_string()),
            ];
            let batch: Vec<GithubRepo> = self
                .execute_json(
                    Method::GET,
                    "/user/repos",
                    &query,
                    NO_BODY,
                    ErrorContext::default(),
                )
                .await?;

            let len = batch.len();
            repos.extend(batch.into_iter().map(Repository::from));
            if len < MAX_PAGE_SIZE_REPOS {
                break;
            }
            page += 1;
        }

        Ok(repos)
    }

    async fn delete_repository(&self, name: &str) -> Result<()> {
        let full_name = format!("{}/{name}", self.owner);
        self.execute(
            Method::DELETE,
            &format!("/repos/{full_name}"),
            &[],
            NO_BODY,
            ErrorContext::resource(&full_name),
        )
        .await?;
        log::info!("[github] Deleted repository {full_name}");
        Ok(())
    }

    async fn get_file(&self, repo: &str, path: &str) -> Result<Option<RepositoryFile>> {
        let result: Result<GithubContent> = self
            .execute_json(
                Method::GET,
                &self.contents_path(repo, path),
                &[],
                NO_BODY,
                ErrorContext::resource(path),
            )
            .await;

        match result {
            Ok(content) => {
                let bytes = self.decode_content(&content)?;
                Ok(Some(RepositoryFile {
                    path: content.path,
                    sha: content.sha,
                    content: bytes,
                }))
            }
            Err(ProviderError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn put_file(&self, repo: &str, req: &PutFileRequest) -> Result<String> {
        let body = GithubPutContent {
            message: &req.message,
            content: STANDARD.encode(&req.content),
            sha: req.sha.as_deref(),
        };
        let response: GithubPutContentResponse = self
            .execute_json(
                Method::PUT,
                &self.contents_path(repo, &req.path),
                &[],
                Some(&body),
                ErrorContext::resource(&req.path),
            )
            .await?;
        log::debug!("[github] Wrote {repo}/{} ({} bytes)", req.path, req.content.len());
        Ok(response.content.sha)
    }
}
