//! Utility functions

pub mod datetime;
mod subdomain;

pub use subdomain::{normalize_root_domain, normalize_subdomain};
