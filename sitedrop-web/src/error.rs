//! HTTP mapping of core errors
//!
//! Every failure leaves the server as `{"message": "..."}` with a status
//! code derived from the [`CoreError`] variant.

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use sitedrop_core::CoreError;

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Handler error wrapping [`CoreError`].
#[derive(Debug)]
pub struct ApiError(pub CoreError);

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        Self(e)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            CoreError::ValidationError(_)
            | CoreError::DomainNotConfigured(_)
            | CoreError::BundleError(_) => StatusCode::BAD_REQUEST,
            CoreError::AdminUnauthorized => StatusCode::UNAUTHORIZED,
            CoreError::ApiKeyInvalid | CoreError::ApiKeyExpired => StatusCode::FORBIDDEN,
            CoreError::ApiKeyNotFound(_) | CoreError::ProjectNotFound(_) => StatusCode::NOT_FOUND,
            CoreError::SubdomainTaken(_) | CoreError::ApiKeyExists(_) => StatusCode::CONFLICT,
            CoreError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            CoreError::Provider(_)
            | CoreError::Provisioning { .. }
            | CoreError::PartialFailure { .. } => StatusCode::BAD_GATEWAY,
            CoreError::ProviderUnresponsive { .. } => StatusCode::GATEWAY_TIMEOUT,
            CoreError::StorageError(_)
            | CoreError::SerializationError(_)
            | CoreError::RevisionConflict(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if self.0.is_expected() {
            tracing::warn!(status = status.as_u16(), "{}", self.0);
        } else {
            tracing::error!(status = status.as_u16(), "{}", self.0);
        }
        HttpResponse::build(status).json(MessageBody::new(self.0.to_string()))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
