//! Name normalization for compose project and service tokens.

/// `true` for characters compose accepts in project and service names.
fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Strips every character outside `[A-Za-z0-9_-]`.
///
/// Disallowed runs are removed, not replaced, so `"my project!!"` becomes
/// `"myproject"`. Total and idempotent.
pub fn sanitize(raw: &str) -> String {
    raw.chars().filter(|&c| is_allowed(c)).collect()
}

/// `true` if `name` is already in sanitized form.
pub fn is_sanitized(name: &str) -> bool {
    name.chars().all(is_allowed)
}
