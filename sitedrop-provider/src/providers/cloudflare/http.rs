//! Cloudflare HTTP request methods

use reqwest::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::{HttpResponse, HttpUtils};
use crate::providers::common::DEFAULT_MAX_RETRIES;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{CloudflareProvider, CloudflareResponse};

impl CloudflareProvider {
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(&self.api_token)
    }

    /// Unwraps the `{success, result, errors}` envelope.
    ///
    /// Cloudflare reports most failures inside the envelope even on 4xx; a body
    /// that is not an envelope falls back to the HTTP status.
    fn unwrap_envelope<T: DeserializeOwned>(
        &self,
        response: &HttpResponse,
        ctx: ErrorContext,
    ) -> Result<CloudflareResponse<T>> {
        let envelope: CloudflareResponse<T> =
            match HttpUtils::parse_json(&response.body, self.provider_name()) {
                Ok(envelope) => envelope,
                Err(e) if response.is_success() => return Err(e),
                Err(_) => {
                    return Err(self.map_error(
                        RawApiError::with_code(response.status.to_string(), response.body.clone()),
                        ctx,
                    ));
                }
            };

        if !envelope.success {
            let (code, message) = envelope.first_error();
            log::error!("[cloudflare] API error {code}: {message}");
            let raw = if code.is_empty() {
                RawApiError::new(message)
            } else {
                RawApiError::with_code(code, message)
            };
            return Err(self.map_error(raw, ctx));
        }

        Ok(envelope)
    }

    /// GET one page of a list endpoint. Returns the items and whether more pages follow.
    pub(crate) async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        ctx: ErrorContext,
    ) -> Result<(Vec<T>, bool)> {
        let url = format!("{}{path}", self.api_base);
        let builder = self.authorized(self.client.get(&url).query(query));
        let response = HttpUtils::execute_request_with_retry(
            builder,
            self.provider_name(),
            "GET",
            &url,
            DEFAULT_MAX_RETRIES,
        )
        .await?;

        let envelope: CloudflareResponse<Vec<T>> = self.unwrap_envelope(&response, ctx)?;
        let has_more = envelope
            .result_info
            .as_ref()
            .and_then(|info| info.total_pages.map(|total| info.page < total))
            .unwrap_or(false);
        Ok((envelope.result.unwrap_or_default(), has_more))
    }

    /// POST a JSON body (not retried)
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<T> {
        let url = format!("{}{path}", self.api_base);
        let builder = self.authorized(self.client.post(&url).json(body));
        let response =
            HttpUtils::execute_request(builder, self.provider_name(), "POST", &url).await?;

        let envelope: CloudflareResponse<T> = self.unwrap_envelope(&response, ctx)?;
        envelope
            .result
            .ok_or_else(|| self.parse_error("missing result field in response"))
    }

    /// DELETE request
    pub(crate) async fn delete(&self, path: &str, ctx: ErrorContext) -> Result<()> {
        let url = format!("{}{path}", self.api_base);
        let builder = self.authorized(self.client.delete(&url));
        let response = HttpUtils::execute_request_with_retry(
            builder,
            self.provider_name(),
            "DELETE",
            &url,
            DEFAULT_MAX_RETRIES,
        )
        .await?;

        self.unwrap_envelope::<serde_json::Value>(&response, ctx)?;
        Ok(())
    }
}
