//! Vercel HTTP request methods

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::{HttpResponse, HttpUtils};
use crate::providers::common::DEFAULT_MAX_RETRIES;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::VercelProvider;
use super::types::VercelErrorBody;

/// Body placeholder for requests without a payload.
pub(crate) const NO_BODY: Option<&()> = None;

impl VercelProvider {
    /// Appends `teamId` to the caller's query.
    fn scoped_query(&self, query: &[(&str, String)]) -> Vec<(String, String)> {
        let mut scoped: Vec<(String, String)> = query
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect();
        if let Some(team_id) = &self.team_id {
            scoped.push(("teamId".to_string(), team_id.clone()));
        }
        scoped
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
        let mut builder = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(&self.token)
            .query(&self.scoped_query(query));
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

        let (code, message) = match serde_json::from_str::<VercelErrorBody>(&response.body) {
            Ok(body) => (
                body.error.code.unwrap_or_else(|| response.status.to_string()),
                body.error.message.unwrap_or_default(),
            ),
            Err(_) => (response.status.to_string(), response.body.clone()),
        };
        log::warn!(
            "[vercel] {} {url} failed with HTTP {} ({code}): {message}",
            method.as_str(),
            response.status
        );
        Err(self.map_error(RawApiError::with_code(code, message), ctx))
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
