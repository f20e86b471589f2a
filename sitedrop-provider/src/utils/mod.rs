//! Utility modules.

/// Timestamp serde helpers shared by the provider types.
pub mod datetime;

/// Log sanitization utilities to keep tokens and large payloads out of logs.
pub mod log_sanitizer;
