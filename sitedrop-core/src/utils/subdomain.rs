//! Subdomain label normalization

/// Normalizes a user-supplied subdomain into a DNS label and project name.
///
/// Lowercases, turns runs of whitespace into a single `-`, drops every character
/// outside `[a-z0-9-]` and trims leading and trailing `-`. The result may be empty.
///
/// ```
/// use sitedrop_core::utils::normalize_subdomain;
///
/// assert_eq!(normalize_subdomain("My Site!"), "my-site");
/// ```
#[must_use]
pub fn normalize_subdomain(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_whitespace = false;

    for c in raw.trim().chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            out.push(c);
        }
    }

    out.trim_matches('-').to_string()
}

/// Normalizes a root domain for registry lookups (lowercase, no trailing dot).
#[must_use]
pub fn normalize_root_domain(raw: &str) -> String {
    raw.trim().trim_end_matches('.').to_ascii_lowercase()
}
