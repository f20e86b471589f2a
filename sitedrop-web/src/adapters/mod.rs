//! Platform implementations of the core storage traits

mod domain_file;
mod github_key_store;

pub use domain_file::load_domain_registry;
pub use github_key_store::GithubApiKeyStore;
