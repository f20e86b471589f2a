//! GitHub HTTP request methods

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::{HttpResponse, HttpUtils};
use crate::providers::common::DEFAULT_MAX_RETRIES;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::GithubProvider;
use super::types::GithubErrorBody;

/// Body placeholder for requests without a payload.
pub(crate) const NO_BODY: Option<&()> = None;

impl GithubProvider {
    fn build(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", super::GITHUB_API_VERSION)
    }

    /// Sends a request and maps non-2xx statuses. GET and DELETE are retried.
    pub(crate) async fn execute<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
        ctx: ErrorContext,
    ) -> Result<HttpResponse> {
        let url = format!("{}{path}", self.api_base);
        let mut builder = self.build(method.clone(), &url).query(query);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = if method == Method::GET || method == Method::DELETE {
            HttpUtils::execute_request_with_retry(
                builder,
                self.provider_name(),
                method.as_str(),
                &url,
                DEFAULT_MAX_RETRIES,
            )
            .await?
        } else {
            HttpUtils::execute_request(builder, self.provider_name(), method.as_str(), &url)
                .await?
        };

        if response.is_success() {
            return Ok(response);
        }

        let message = serde_json::from_str::<GithubErrorBody>(&response.body)
            .map_or_else(|_| response.body.clone(), |b| b.full_message());
        log::warn!(
            "[github] {} {url} failed with HTTP {}: {message}",
            method.as_str(),
            response.status
        );
        Err(self.map_error(
            RawApiError::with_code(response.status.to_string(), message),
            ctx,
        ))
    }

    /// [`execute`](Self::execute) and parse the JSON body.
    pub(crate) async fn execute_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
        ctx: ErrorContext,
    ) -> Result<T> {
        let response = self.execute(method, path, query, body, ctx).await?;
        HttpUtils::parse_json(&response.body, self.provider_name())
    }
}

/// Percent-encodes each segment of a repository path, keeping the separators.
pub(crate) fn encode_content_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
