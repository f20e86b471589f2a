//! Publish request and result types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Deployment status tracked by the client; moves `pending -> success` only
/// through an explicit domain status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    Pending,
    Success,
}

/// Descriptor of a published site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteRecord {
    /// Hosting project name (the normalized subdomain)
    pub project_name: String,
    /// `owner/repo`
    pub github_repo: String,
    /// Platform default URL
    pub vercel_url: String,
    /// `https://{subdomain}.{root}`
    pub custom_url: String,
    pub status: SiteStatus,
}

/// File uploaded with a publish request.
#[derive(Clone)]
pub struct UploadedBundle {
    /// Client-side file name
    pub file_name: String,
    /// Declared MIME type, if any
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl fmt::Debug for UploadedBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedBundle")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Raw publish form, validated by the publish service.
#[derive(Debug, Clone, Default)]
pub struct PublishRequest {
    pub subdomain: String,
    pub root_domain: String,
    pub api_key: String,
    pub bundle: Option<UploadedBundle>,
}
