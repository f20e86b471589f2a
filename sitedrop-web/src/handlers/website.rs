//! Publishing endpoint
//!
//! One path, dispatched by method and content type:
//! - `GET`: configured root domains
//! - `POST multipart/form-data`: publish a site
//! - `POST` anything else: admin JSON action

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use futures::TryStreamExt;
use serde::Serialize;
use sitedrop_core::CoreError;
use sitedrop_core::types::{AdminRequest, PublishRequest, SiteRecord, UploadedBundle};
use tracing_attributes::instrument;

use crate::error::{ApiResult, MessageBody};
use crate::state::AppState;

/// Upper bound for a plain form field.
const MAX_TEXT_FIELD_BYTES: usize = 4 * 1024;

const FILE_FIELD: &str = "websiteFile";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse {
    message: &'static str,
    site_data: SiteRecord,
}

pub async fn list_domains(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let registry = &state.ctx.provider_registry;
    let domains = state
        .ctx
        .probe("domain registry", async { Ok(registry.list_root_domains().await) })
        .await?;
    Ok(HttpResponse::Ok().json(domains))
}

#[instrument(skip_all)]
pub async fn publish(state: web::Data<AppState>, payload: Multipart) -> ApiResult<HttpResponse> {
    let limit = state.ctx.settings.max_upload_bytes;
    let request = read_publish_form(payload, limit).await?;
    tracing::info!(
        subdomain = %request.subdomain,
        root_domain = %request.root_domain,
        "Publish requested"
    );

    let site = state.publish.publish(request).await?;
    tracing::info!(custom_url = %site.custom_url, "Site published");

    Ok(HttpResponse::Ok().json(PublishResponse {
        message: "Website created successfully!",
        site_data: site,
    }))
}

#[instrument(skip_all)]
pub async fn admin(state: web::Data<AppState>, body: web::Bytes) -> ApiResult<HttpResponse> {
    let request: AdminRequest = serde_json::from_slice(&body)
        .map_err(|e| CoreError::ValidationError(format!("Invalid request body: {e}")))?;
    tracing::debug!(action = %request.action, "Admin action");

    let response = state.admin.dispatch(request).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(MessageBody::new("Method not allowed"))
}

/// Collects the publish form, rejecting a file larger than `limit`.
async fn read_publish_form(mut payload: Multipart, limit: u64) -> Result<PublishRequest, CoreError> {
    let mut request = PublishRequest::default();

    while let Some(field) = payload.try_next().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "subdomain" => request.subdomain = read_text(field).await?,
            "rootDomain" => request.root_domain = read_text(field).await?,
            "apiKey" => request.api_key = read_text(field).await?,
            FILE_FIELD => {
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or_default()
                    .to_string();
                let content_type = field.content_type().map(ToString::to_string);
                let data = read_bytes(field, limit).await?;
                request.bundle = Some(UploadedBundle {
                    file_name,
                    content_type,
                    data,
                });
            }
            other => {
                tracing::debug!("Ignoring form field '{other}'");
                drain(field).await?;
            }
        }
    }

    Ok(request)
}

async fn read_bytes(mut field: Field, limit: u64) -> Result<Vec<u8>, CoreError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        if (data.len() + chunk.len()) as u64 > limit {
            return Err(CoreError::PayloadTooLarge { limit });
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

async fn read_text(field: Field) -> Result<String, CoreError> {
    let name = field.name().unwrap_or_default().to_string();
    let bytes = read_bytes(field, MAX_TEXT_FIELD_BYTES as u64)
        .await
        .map_err(|e| match e {
            CoreError::PayloadTooLarge { .. } => {
                CoreError::ValidationError(format!("Field '{name}' is too long"))
            }
            other => other,
        })?;
    String::from_utf8(bytes)
        .map_err(|_| CoreError::ValidationError(format!("Field '{name}' is not valid UTF-8")))
}

async fn drain(mut field: Field) -> Result<(), CoreError> {
    while field.try_next().await.map_err(malformed)?.is_some() {}
    Ok(())
}

fn malformed(e: actix_multipart::MultipartError) -> CoreError {
    CoreError::ValidationError(format!("Malformed upload: {e}"))
}
