//! In-process providers for HTTP tests.

use std::io::Write;
use std::sync::{Arc, Mutex};

use actix_web::web;
use async_trait::async_trait;
use sitedrop_core::traits::{InMemoryApiKeyStore, InMemoryProviderRegistry};
use sitedrop_core::types::{ApiKeyMap, DomainConfig, DomainRegistry};
use sitedrop_core::{PublishSettings, ServiceContext};
use sitedrop_provider::{
    CreateDeploymentRequest, CreateDnsRecordRequest, CreateProjectRequest,
    CreateRepositoryRequest, Deployment, DnsProvider, DnsRecord, DomainConfiguration,
    HostingPlatform, HostingProject, ProjectDomain, PutFileRequest, RecordQueryParams, Repository,
    RepositoryFile, Result, SourceControlHost,
};
use sitedrop_web::AppState;
use tempfile::TempDir;

pub const ADMIN_PASSWORD: &str = "s3cret";
pub const API_KEY: &str = "publish-key";
pub const BOUNDARY: &str = "----sitedrop-boundary";

#[derive(Default)]
pub struct Scm {
    pub uploaded: Mutex<Vec<String>>,
}

#[async_trait]
impl SourceControlHost for Scm {
    fn id(&self) -> &'static str {
        "github"
    }

    fn owner(&self) -> &str {
        "acme"
    }

    async fn create_repository(&self, req: &CreateRepositoryRequest) -> Result<Repository> {
        Ok(Repository {
            id: 7,
            name: req.name.clone(),
            full_name: format!("acme/{}", req.name),
            private: req.private,
            html_url: format!("https://github.com/acme/{}", req.name),
            default_branch: Some("main".to_string()),
        })
    }

    async fn list_repositories(&self) -> Result<Vec<Repository>> {
        Ok(vec![])
    }

    async fn delete_repository(&self, _name: &str) -> Result<()> {
        Ok(())
    }

    async fn get_file(&self, _repo: &str, _path: &str) -> Result<Option<RepositoryFile>> {
        Ok(None)
    }

    async fn put_file(&self, _repo: &str, req: &PutFileRequest) -> Result<String> {
        self.uploaded.lock().unwrap().push(req.path.clone());
        Ok(format!("sha-{}", req.path))
    }
}

#[derive(Default)]
pub struct Hosting {
    pub projects: Mutex<Vec<String>>,
}

#[async_trait]
impl HostingPlatform for Hosting {
    fn id(&self) -> &'static str {
        "vercel"
    }

    async fn create_project(&self, req: &CreateProjectRequest) -> Result<HostingProject> {
        self.projects.lock().unwrap().push(req.name.clone());
        Ok(HostingProject {
            id: format!("prj_{}", req.name),
            name: req.name.clone(),
            link: None,
            created_at: None,
        })
    }

    async fn get_project(&self, name: &str) -> Result<Option<HostingProject>> {
        let exists = self.projects.lock().unwrap().iter().any(|p| p == name);
        Ok(exists.then(|| HostingProject {
            id: format!("prj_{name}"),
            name: name.to_string(),
            link: None,
            created_at: None,
        }))
    }

    async fn list_projects(&self) -> Result<Vec<HostingProject>> {
        Ok(vec![])
    }

    async fn delete_project(&self, _name: &str) -> Result<()> {
        Ok(())
    }

    async fn create_deployment(&self, req: &CreateDeploymentRequest) -> Result<Deployment> {
        Ok(Deployment {
            id: format!("dpl_{}", req.project),
            url: None,
            ready_state: None,
        })
    }

    async fn add_domain(&self, _project: &str, domain: &str) -> Result<ProjectDomain> {
        Ok(ProjectDomain {
            name: domain.to_string(),
            verified: true,
        })
    }

    async fn domain_project(&self, _domain: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn domain_config(&self, domain: &str) -> Result<DomainConfiguration> {
        Ok(DomainConfiguration {
            domain: domain.to_string(),
            misconfigured: true,
        })
    }

    fn default_url(&self, project: &str) -> String {
        format!("https://{project}.vercel.app")
    }
}

#[derive(Default)]
pub struct Dns;

#[async_trait]
impl DnsProvider for Dns {
    fn id(&self) -> &'static str {
        "cloudflare"
    }

    async fn list_records(&self, _zone_id: &str, _params: &RecordQueryParams) -> Result<Vec<DnsRecord>> {
        Ok(vec![])
    }

    async fn create_record(&self, req: &CreateDnsRecordRequest) -> Result<DnsRecord> {
        Ok(DnsRecord {
            id: "rec-1".to_string(),
            zone_id: req.zone_id.clone(),
            name: req.name.clone(),
            record_type: req.record_type.as_str().to_string(),
            content: req.content.clone(),
            ttl: req.ttl,
            proxied: req.proxied,
        })
    }

    async fn delete_record(&self, _zone_id: &str, _record_id: &str) -> Result<()> {
        Ok(())
    }
}

/// App state over the in-process providers, with one permanent publish key.
pub struct Harness {
    pub scm: Arc<Scm>,
    pub hosting: Arc<Hosting>,
    pub scratch: TempDir,
    pub state: web::Data<AppState>,
}

impl Harness {
    pub fn new() -> Self {
        let scm = Arc::new(Scm::default());
        let hosting = Arc::new(Hosting::default());
        let scratch = tempfile::tempdir().unwrap();

        let keys: ApiKeyMap = serde_json::from_value(serde_json::json!({
            API_KEY: { "created_at": "2024-05-01T10:00:00.000Z", "expires_at": "permanent" }
        }))
        .unwrap();

        let domains = DomainRegistry::new(
            ["example.com", "demo.dev"].map(|d| {
                (
                    d.to_string(),
                    DomainConfig {
                        zone_id: format!("zone-{d}"),
                        api_token: "cf".to_string(),
                    },
                )
            }),
        );
        let registry = InMemoryProviderRegistry::with_providers(
            domains
                .root_domains()
                .into_iter()
                .map(|d| (d, Arc::new(Dns) as Arc<dyn DnsProvider>)),
        );

        let settings = PublishSettings {
            scratch_dir: scratch.path().to_path_buf(),
            ..PublishSettings::default()
        };
        let ctx = ServiceContext::new(
            scm.clone(),
            hosting.clone(),
            Arc::new(registry),
            Arc::new(domains),
            Arc::new(InMemoryApiKeyStore::with_keys(keys)),
            settings,
        );

        Self {
            scm,
            hosting,
            scratch,
            state: web::Data::new(AppState::new(Arc::new(ctx), ADMIN_PASSWORD)),
        }
    }

    pub fn scratch_entries(&self) -> usize {
        std::fs::read_dir(self.scratch.path()).unwrap().count()
    }
}

pub fn zip_archive(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (path, content) in files {
        writer.start_file(*path, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// `multipart/form-data` body with text `fields` and one `websiteFile`.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        write!(
            body,
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
        .unwrap();
    }
    if let Some((file_name, content_type, data)) = file {
        write!(
            body,
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"websiteFile\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .unwrap();
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    write!(body, "--{BOUNDARY}--\r\n").unwrap();
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}
