//! Test helpers
//!
//! Hand-written provider mocks that record every call, plus a context
//! builder wiring them into a [`ServiceContext`].

use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use sitedrop_provider::{
    CreateDeploymentRequest, CreateDnsRecordRequest, CreateProjectRequest,
    CreateRepositoryRequest, Deployment, DnsProvider, DnsRecord, DomainConfiguration,
    HostingPlatform, HostingProject, ProjectDomain, ProjectLink, ProviderError, PutFileRequest,
    RecordQueryParams, Repository, RepositoryFile, Result as ProviderResult, SourceControlHost,
};
use tempfile::TempDir;

use crate::error::{CoreError, CoreResult};
use crate::services::{PublishSettings, ServiceContext};
use crate::traits::{ApiKeyStore, InMemoryApiKeyStore, InMemoryProviderRegistry};
use crate::types::{
    ApiKey, ApiKeyMap, DomainConfig, DomainRegistry, KeyExpiry, Revision, UploadedBundle,
    VersionedKeys,
};

pub const OWNER: &str = "acme";
pub const ROOT_DOMAIN: &str = "example.com";
pub const ZONE_ID: &str = "zone-1";

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap()
}

/// Call log plus injectable failures, shared by the mocks.
#[derive(Default)]
struct CallRecorder {
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<&'static str, ProviderError>>,
}

impl CallRecorder {
    fn enter(&self, method: &'static str) -> ProviderResult<()> {
        lock(&self.calls).push(method.to_string());
        match lock(&self.failures).get(method) {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn fail_on(&self, method: &'static str, error: ProviderError) {
        lock(&self.failures).insert(method, error);
    }

    fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }
}

// ===== MockSourceControl =====

#[derive(Default)]
pub struct MockSourceControl {
    recorder: CallRecorder,
    repositories: Mutex<Vec<Repository>>,
    created: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
    files: Mutex<HashMap<(String, String), RepositoryFile>>,
    uploaded: Mutex<Vec<String>>,
    next_id: AtomicU32,
}

impl MockSourceControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, method: &'static str, error: ProviderError) {
        self.recorder.fail_on(method, error);
    }

    pub fn add_repository(&self, name: &str) {
        lock(&self.repositories).push(repository(u64::from(self.next_id()), name));
    }

    pub fn calls(&self) -> Vec<String> {
        self.recorder.calls()
    }

    pub fn created_repositories(&self) -> Vec<String> {
        lock(&self.created).clone()
    }

    pub fn deleted_repositories(&self) -> Vec<String> {
        lock(&self.deleted).clone()
    }

    /// Paths written through `put_file`, in call order.
    pub fn uploaded_paths(&self) -> Vec<String> {
        lock(&self.uploaded).clone()
    }

    fn next_id(&self) -> u32 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

fn repository(id: u64, name: &str) -> Repository {
    Repository {
        id,
        name: name.to_string(),
        full_name: format!("{OWNER}/{name}"),
        private: true,
        html_url: format!("https://github.com/{OWNER}/{name}"),
        default_branch: None,
    }
}

#[async_trait]
impl SourceControlHost for MockSourceControl {
    fn id(&self) -> &'static str {
        "mock-scm"
    }

    fn owner(&self) -> &str {
        OWNER
    }

    async fn create_repository(&self, req: &CreateRepositoryRequest) -> ProviderResult<Repository> {
        self.recorder.enter("create_repository")?;
        let repo = repository(u64::from(self.next_id()), &req.name);
        lock(&self.repositories).push(repo.clone());
        lock(&self.created).push(req.name.clone());
        Ok(repo)
    }

    async fn list_repositories(&self) -> ProviderResult<Vec<Repository>> {
        self.recorder.enter("list_repositories")?;
        Ok(lock(&self.repositories).clone())
    }

    async fn delete_repository(&self, name: &str) -> ProviderResult<()> {
        self.recorder.enter("delete_repository")?;
        lock(&self.repositories).retain(|r| r.name != name);
        lock(&self.deleted).push(name.to_string());
        Ok(())
    }

    async fn get_file(&self, repo: &str, path: &str) -> ProviderResult<Option<RepositoryFile>> {
        self.recorder.enter("get_file")?;
        Ok(lock(&self.files)
            .get(&(repo.to_string(), path.to_string()))
            .cloned())
    }

    async fn put_file(&self, repo: &str, req: &PutFileRequest) -> ProviderResult<String> {
        self.recorder.enter("put_file")?;
        let sha = format!("sha-{}", self.next_id());
        lock(&self.files).insert(
            (repo.to_string(), req.path.clone()),
            RepositoryFile {
                path: req.path.clone(),
                sha: sha.clone(),
                content: req.content.clone(),
            },
        );
        lock(&self.uploaded).push(req.path.clone());
        Ok(sha)
    }
}

// ===== MockHosting =====

#[derive(Default)]
pub struct MockHosting {
    recorder: CallRecorder,
    projects: Mutex<HashMap<String, HostingProject>>,
    deleted: Mutex<Vec<String>>,
    deployments: Mutex<Vec<CreateDeploymentRequest>>,
    /// Custom domain -> owning project
    domains: Mutex<HashMap<String, String>>,
    misconfigured: Mutex<bool>,
    delay: Mutex<Option<Duration>>,
}

impl MockHosting {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, method: &'static str, error: ProviderError) {
        self.recorder.fail_on(method, error);
    }

    pub fn add_project(&self, project: HostingProject) {
        lock(&self.projects).insert(project.name.clone(), project);
    }

    pub fn attach_domain(&self, domain: &str, project: &str) {
        lock(&self.domains).insert(domain.to_string(), project.to_string());
    }

    /// Every call sleeps this long first.
    pub fn set_delay(&self, delay: Duration) {
        *lock(&self.delay) = Some(delay);
    }

    pub fn set_misconfigured(&self, misconfigured: bool) {
        *lock(&self.misconfigured) = misconfigured;
    }

    pub fn calls(&self) -> Vec<String> {
        self.recorder.calls()
    }

    pub fn deleted_projects(&self) -> Vec<String> {
        lock(&self.deleted).clone()
    }

    pub fn deployments(&self) -> Vec<CreateDeploymentRequest> {
        lock(&self.deployments).clone()
    }

    async fn enter(&self, method: &'static str) -> ProviderResult<()> {
        let delay = *lock(&self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.recorder.enter(method)
    }
}

#[async_trait]
impl HostingPlatform for MockHosting {
    fn id(&self) -> &'static str {
        "mock-hosting"
    }

    async fn create_project(&self, req: &CreateProjectRequest) -> ProviderResult<HostingProject> {
        self.enter("create_project").await?;
        let (org, repo) = req
            .repository
            .split_once('/')
            .unwrap_or((OWNER, req.repository.as_str()));
        let project = HostingProject {
            id: format!("prj_{}", req.name),
            name: req.name.clone(),
            link: Some(ProjectLink {
                org: Some(org.to_string()),
                repo: Some(repo.to_string()),
                repo_id: Some(42),
            }),
            created_at: None,
        };
        self.add_project(project.clone());
        Ok(project)
    }

    async fn get_project(&self, name: &str) -> ProviderResult<Option<HostingProject>> {
        self.enter("get_project").await?;
        Ok(lock(&self.projects).get(name).cloned())
    }

    async fn list_projects(&self) -> ProviderResult<Vec<HostingProject>> {
        self.enter("list_projects").await?;
        let mut projects: Vec<_> = lock(&self.projects).values().cloned().collect();
        projects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(projects)
    }

    async fn delete_project(&self, name: &str) -> ProviderResult<()> {
        self.enter("delete_project").await?;
        if lock(&self.projects).remove(name).is_none() {
            return Err(ProviderError::NotFound {
                provider: self.id().to_string(),
                resource: name.to_string(),
                raw_message: None,
            });
        }
        lock(&self.deleted).push(name.to_string());
        Ok(())
    }

    async fn create_deployment(&self, req: &CreateDeploymentRequest) -> ProviderResult<Deployment> {
        self.enter("create_deployment").await?;
        lock(&self.deployments).push(req.clone());
        Ok(Deployment {
            id: format!("dpl_{}", req.project),
            url: Some(format!("{}-abc.vercel.app", req.project)),
            ready_state: Some("QUEUED".to_string()),
        })
    }

    async fn add_domain(&self, project: &str, domain: &str) -> ProviderResult<ProjectDomain> {
        self.enter("add_domain").await?;
        let mut domains = lock(&self.domains);
        match domains.get(domain) {
            Some(owner) if owner != project => {
                return Err(ProviderError::AlreadyExists {
                    provider: self.id().to_string(),
                    resource: domain.to_string(),
                    raw_message: Some(format!("Domain is already in use by project {owner}")),
                });
            }
            _ => {
                domains.insert(domain.to_string(), project.to_string());
            }
        }
        Ok(ProjectDomain {
            name: domain.to_string(),
            verified: true,
        })
    }

    async fn domain_project(&self, domain: &str) -> ProviderResult<Option<String>> {
        self.enter("domain_project").await?;
        Ok(lock(&self.domains).get(domain).cloned())
    }

    async fn domain_config(&self, domain: &str) -> ProviderResult<DomainConfiguration> {
        self.enter("domain_config").await?;
        Ok(DomainConfiguration {
            domain: domain.to_string(),
            misconfigured: *lock(&self.misconfigured),
        })
    }

    fn default_url(&self, project: &str) -> String {
        format!("https://{project}.vercel.app")
    }
}

// ===== MockDns =====

#[derive(Default)]
pub struct MockDns {
    recorder: CallRecorder,
    records: Mutex<Vec<DnsRecord>>,
    created: Mutex<Vec<CreateDnsRecordRequest>>,
    deleted: Mutex<Vec<String>>,
    next_id: AtomicU32,
}

impl MockDns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, method: &'static str, error: ProviderError) {
        self.recorder.fail_on(method, error);
    }

    pub fn add_record(&self, record: DnsRecord) {
        lock(&self.records).push(record);
    }

    pub fn calls(&self) -> Vec<String> {
        self.recorder.calls()
    }

    pub fn created_records(&self) -> Vec<CreateDnsRecordRequest> {
        lock(&self.created).clone()
    }

    pub fn deleted_records(&self) -> Vec<String> {
        lock(&self.deleted).clone()
    }
}

#[async_trait]
impl DnsProvider for MockDns {
    fn id(&self) -> &'static str {
        "mock-dns"
    }

    async fn list_records(
        &self,
        zone_id: &str,
        params: &RecordQueryParams,
    ) -> ProviderResult<Vec<DnsRecord>> {
        self.recorder.enter("list_records")?;
        Ok(lock(&self.records)
            .iter()
            .filter(|r| r.zone_id == zone_id)
            .filter(|r| params.name.as_ref().is_none_or(|n| &r.name == n))
            .cloned()
            .collect())
    }

    async fn create_record(&self, req: &CreateDnsRecordRequest) -> ProviderResult<DnsRecord> {
        self.recorder.enter("create_record")?;
        let id = format!("rec-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let created = DnsRecord {
            id,
            zone_id: req.zone_id.clone(),
            name: format!("{}.{ROOT_DOMAIN}", req.name),
            record_type: req.record_type.as_str().to_string(),
            content: req.content.clone(),
            ttl: req.ttl,
            proxied: req.proxied,
        };
        lock(&self.records).push(created.clone());
        lock(&self.created).push(req.clone());
        Ok(created)
    }

    async fn delete_record(&self, _zone_id: &str, record_id: &str) -> ProviderResult<()> {
        self.recorder.enter("delete_record")?;
        lock(&self.records).retain(|r| r.id != record_id);
        lock(&self.deleted).push(record_id.to_string());
        Ok(())
    }
}

// ===== ConflictingKeyStore =====

/// Key store that simulates another writer racing the caller.
#[derive(Default)]
pub struct ConflictingKeyStore {
    inner: InMemoryApiKeyStore,
    concurrent: Mutex<Option<(String, ApiKey)>>,
    always_conflict: bool,
    writes: AtomicU32,
}

impl ConflictingKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write fails with a revision conflict.
    pub fn always_conflicting() -> Self {
        Self {
            always_conflict: true,
            ..Self::default()
        }
    }

    /// The next write first lets another writer add `name`.
    pub fn inject_concurrent_write(&self, name: &str, key: ApiKey) {
        *lock(&self.concurrent) = Some((name.to_string(), key));
    }

    pub fn write_attempts(&self) -> u32 {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ApiKeyStore for ConflictingKeyStore {
    async fn read(&self) -> CoreResult<VersionedKeys> {
        self.inner.read().await
    }

    async fn write(
        &self,
        keys: &ApiKeyMap,
        expected: Option<&Revision>,
        message: &str,
    ) -> CoreResult<Revision> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.always_conflict {
            return Err(CoreError::RevisionConflict("api keys".to_string()));
        }

        let concurrent = lock(&self.concurrent).take();
        if let Some((name, key)) = concurrent {
            let mut doc = self.inner.read().await?;
            doc.keys.insert(name, key);
            self.inner
                .write(&doc.keys, doc.revision.as_ref(), "concurrent writer")
                .await?;
        }
        self.inner.write(keys, expected, message).await
    }
}

// ===== TestContext =====

/// Mocks plus settings, turned into a [`ServiceContext`] by [`ctx`](Self::ctx).
pub struct TestContext {
    pub scm: Arc<MockSourceControl>,
    pub hosting: Arc<MockHosting>,
    pub dns: Arc<MockDns>,
    pub key_store: Arc<dyn ApiKeyStore>,
    seed_keys: ApiKeyMap,
    settings: PublishSettings,
    scratch: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let scratch = tempfile::tempdir().unwrap();
        let settings = PublishSettings {
            scratch_dir: scratch.path().to_path_buf(),
            ..PublishSettings::default()
        };
        Self {
            scm: Arc::new(MockSourceControl::new()),
            hosting: Arc::new(MockHosting::new()),
            dns: Arc::new(MockDns::new()),
            key_store: Arc::new(InMemoryApiKeyStore::new()),
            seed_keys: ApiKeyMap::new(),
            settings,
            scratch,
        }
    }

    pub fn with_key(mut self, name: &str, key: ApiKey) -> Self {
        self.seed_keys.insert(name.to_string(), key);
        self.key_store = Arc::new(InMemoryApiKeyStore::with_keys(self.seed_keys.clone()));
        self
    }

    pub fn with_key_store(mut self, store: Arc<dyn ApiKeyStore>) -> Self {
        self.key_store = store;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.settings.probe_timeout = timeout;
        self
    }

    pub fn with_rollback(mut self, enabled: bool) -> Self {
        self.settings.rollback_on_failure = enabled;
        self
    }

    pub fn ctx(&self) -> Arc<ServiceContext> {
        let domains = DomainRegistry::new([(
            ROOT_DOMAIN.to_string(),
            DomainConfig {
                zone_id: ZONE_ID.to_string(),
                api_token: "cf-token".to_string(),
            },
        )]);
        let dns: Arc<dyn DnsProvider> = self.dns.clone();
        let registry = InMemoryProviderRegistry::with_providers([(ROOT_DOMAIN.to_string(), dns)]);

        Arc::new(ServiceContext::new(
            self.scm.clone(),
            self.hosting.clone(),
            Arc::new(registry),
            Arc::new(domains),
            self.key_store.clone(),
            self.settings.clone(),
        ))
    }

    /// Calls made to any of the three provider mocks.
    pub fn provider_calls(&self) -> usize {
        self.scm.calls().len() + self.hosting.calls().len() + self.dns.calls().len()
    }

    /// Entries left in the scratch root.
    pub fn scratch_entries(&self) -> usize {
        std::fs::read_dir(self.scratch.path()).unwrap().count()
    }
}

// ===== Fixtures =====

pub fn permanent_key() -> ApiKey {
    ApiKey {
        created_at: Utc::now(),
        expires_at: KeyExpiry::Permanent,
    }
}

pub fn expired_key() -> ApiKey {
    ApiKey {
        created_at: Utc::now() - TimeDelta::days(30),
        expires_at: KeyExpiry::At(Utc::now() - TimeDelta::hours(1)),
    }
}

pub fn quota_error(provider: &str) -> ProviderError {
    ProviderError::QuotaExceeded {
        provider: provider.to_string(),
        raw_message: Some("limit reached".to_string()),
    }
}

/// Project linked to `acme/{repo}`.
pub fn hosting_project(name: &str, repo: Option<&str>) -> HostingProject {
    HostingProject {
        id: format!("prj_{name}"),
        name: name.to_string(),
        link: repo.map(|repo| ProjectLink {
            org: Some(OWNER.to_string()),
            repo: Some(repo.to_string()),
            repo_id: Some(42),
        }),
        created_at: None,
    }
}

pub fn record(id: &str, name: &str, record_type: &str, content: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        zone_id: ZONE_ID.to_string(),
        name: name.to_string(),
        record_type: record_type.to_string(),
        content: content.to_string(),
        ttl: 1,
        proxied: Some(false),
    }
}

/// Zip upload holding `files` as `(path, content)`.
pub fn zip_bundle(files: &[(&str, &str)]) -> UploadedBundle {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (path, content) in files {
        writer.start_file(*path, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    let data = writer.finish().unwrap().into_inner();

    UploadedBundle {
        file_name: "site.zip".to_string(),
        content_type: Some("application/zip".to_string()),
        data,
    }
}
