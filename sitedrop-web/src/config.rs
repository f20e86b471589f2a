//! Server configuration (TOML file plus environment)
//!
//! Tunables live in `sitedrop.toml` (or the file named by `SITEDROP_CONFIG`);
//! every field has a default so the file is optional. Provider credentials
//! and the admin password only come from the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use sitedrop_core::PublishSettings;
use sitedrop_core::services::{
    DEFAULT_EDGE_ADDRESS, DEFAULT_MAX_EXTRACTED_BYTES, DEFAULT_MAX_UPLOAD_BYTES,
};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SITEDROP_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "sitedrop.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub publish: PublishConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Worker threads, defaults to the number of CPUs
    #[serde(default)]
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// `{"example.com": {"zone": "...", "apitoken": "..."}}`
    #[serde(default = "default_domains_file")]
    pub domains_file: PathBuf,
    /// Parent of the per-request scratch directories (system temp when unset)
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
    /// Cap on the unpacked size of an uploaded archive
    #[serde(default = "default_max_extracted_bytes")]
    pub max_extracted_bytes: u64,
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    /// Path of the key document inside the configuration repository
    #[serde(default = "default_key_store_path")]
    pub key_store_path: String,
    #[serde(default)]
    pub rollback_on_failure: bool,
    #[serde(default = "default_edge_address")]
    pub edge_address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    /// Directory for a daily rolling log file
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

// --- Defaults ---

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    3000
}
fn default_domains_file() -> PathBuf {
    PathBuf::from("data/domains.json")
}
fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}
fn default_max_extracted_bytes() -> u64 {
    DEFAULT_MAX_EXTRACTED_BYTES
}
fn default_probe_timeout_secs() -> u64 {
    8
}
fn default_key_store_path() -> String {
    "data/apikeys.json".into()
}
fn default_edge_address() -> String {
    DEFAULT_EDGE_ADDRESS.into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            domains_file: default_domains_file(),
            scratch_dir: None,
            max_upload_bytes: default_max_upload_bytes(),
            max_extracted_bytes: default_max_extracted_bytes(),
            probe_timeout_secs: default_probe_timeout_secs(),
            key_store_path: default_key_store_path(),
            rollback_on_failure: false,
            edge_address: default_edge_address(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Text,
            directory: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// `$SITEDROP_CONFIG` if set (must exist), else `./sitedrop.toml` if
    /// present, else defaults.
    pub fn load_default() -> anyhow::Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Get the bind address as "host:port"
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn workers(&self) -> usize {
        self.server.workers.unwrap_or_else(num_cpus::get).max(1)
    }

    pub fn publish_settings(&self) -> PublishSettings {
        let publish = &self.publish;
        PublishSettings {
            max_upload_bytes: publish.max_upload_bytes,
            max_extracted_bytes: publish.max_extracted_bytes,
            scratch_dir: publish
                .scratch_dir
                .clone()
                .unwrap_or_else(std::env::temp_dir),
            edge_address: publish.edge_address.clone(),
            rollback_on_failure: publish.rollback_on_failure,
            probe_timeout: Duration::from_secs(publish.probe_timeout_secs),
            ..PublishSettings::default()
        }
    }
}

/// Credentials read from the environment.
#[derive(Clone)]
pub struct ProviderEnv {
    pub github_token: String,
    /// Account owning the site repositories and the configuration repository
    pub repo_owner: String,
    /// Repository holding the key document
    pub config_repo: String,
    pub vercel_token: String,
    pub vercel_team_id: Option<String>,
    pub admin_password: String,
}

impl std::fmt::Debug for ProviderEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderEnv")
            .field("repo_owner", &self.repo_owner)
            .field("config_repo", &self.config_repo)
            .field("vercel_team_id", &self.vercel_team_id)
            .finish_non_exhaustive()
    }
}

impl ProviderEnv {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads through `lookup`, listing every missing variable at once.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut missing = Vec::new();
        let mut required = |name: &'static str| {
            let value = lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
            if value.is_none() {
                missing.push(name);
            }
            value.unwrap_or_default()
        };

        let github_token = required("GITHUB_TOKEN");
        let repo_owner = required("REPO_OWNER");
        let config_repo = required("REPO_NAME_FOR_JSON");
        let vercel_token = required("VERCEL_TOKEN");
        let admin_password = required("ADMIN_PASSWORD");

        if !missing.is_empty() {
            bail!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
        }

        Ok(Self {
            github_token,
            repo_owner,
            config_repo,
            vercel_token,
            vercel_team_id: lookup("VERCEL_TEAM_ID").filter(|v| !v.trim().is_empty()),
            admin_password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.publish.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.publish.key_store_path, "data/apikeys.json");
        assert_eq!(config.log.format, LogFormat::Text);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 8080

            [publish]
            rollback_on_failure = true
            probe_timeout_secs = 3
            max_extracted_bytes = 2048

            [log]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.log.format, LogFormat::Json);

        let settings = config.publish_settings();
        assert!(settings.rollback_on_failure);
        assert_eq!(settings.probe_timeout, Duration::from_secs(3));
        assert_eq!(settings.edge_address, "76.76.21.21");
        assert_eq!(settings.key_write_attempts, 3);
        assert_eq!(settings.bundle_limits().max_extracted_bytes, 2048);
        assert_eq!(settings.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn missing_env_lists_every_variable() {
        let vars: HashMap<&str, &str> = [("GITHUB_TOKEN", "ghp"), ("VERCEL_TOKEN", " ")].into();
        let err = ProviderEnv::from_lookup(|k| vars.get(k).map(ToString::to_string)).unwrap_err();
        let message = err.to_string();
        for name in ["REPO_OWNER", "REPO_NAME_FOR_JSON", "VERCEL_TOKEN", "ADMIN_PASSWORD"] {
            assert!(message.contains(name), "{message}");
        }
        assert!(!message.contains("GITHUB_TOKEN"));
    }

    #[test]
    fn team_id_is_optional() {
        let vars: HashMap<&str, &str> = [
            ("GITHUB_TOKEN", "ghp"),
            ("REPO_OWNER", "acme"),
            ("REPO_NAME_FOR_JSON", "site-config"),
            ("VERCEL_TOKEN", "vt"),
            ("ADMIN_PASSWORD", "pw"),
        ]
        .into();
        let env = ProviderEnv::from_lookup(|k| vars.get(k).map(ToString::to_string)).unwrap();
        assert_eq!(env.vercel_team_id, None);
        assert_eq!(env.config_repo, "site-config");
        assert!(!format!("{env:?}").contains("ghp"));
    }
}
