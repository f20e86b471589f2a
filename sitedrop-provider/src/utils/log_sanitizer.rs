//! Log sanitization utilities
//!
//! Keeps API tokens and large response bodies (base64 file content, project
//! listings) from being dumped verbatim into debug/error logs.

/// Maximum number of bytes of a body included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Number of leading characters of a secret left visible by [`mask_secret`].
const VISIBLE_SECRET_PREFIX: usize = 4;

/// MSRV-compatible replacement for `str::floor_char_boundary`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Truncate a response or request body for logging.
///
/// Bodies within the limit are returned unchanged; longer ones keep the first
/// `TRUNCATE_LIMIT` bytes (on a char boundary) and note the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    format!(
        "{}... [truncated, total {} bytes]",
        &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
        s.len()
    )
}

/// Mask a secret for display, keeping only a short prefix.
///
/// `"ghp_abcdef123"` becomes `"ghp_****"`; secrets no longer than the prefix are fully masked.
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= VISIBLE_SECRET_PREFIX {
        return "****".to_string();
    }
    let prefix: String = secret.chars().take(VISIBLE_SECRET_PREFIX).collect();
    format!("{prefix}****")
}
