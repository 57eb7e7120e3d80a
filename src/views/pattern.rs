//! Include/exclude name patterns for batch precompilation.
//!
//! Only a trailing `*` is a wildcard. `"li*"` matches every name starting
//! with `li`; anything else must match the whole name. Comparisons ignore
//! case.

/// The wildcard marker recognised at the end of a pattern.
pub const WILDCARD: char = '*';

/// Check whether `candidate` matches `pattern`.
pub fn matches(candidate: &str, pattern: &str) -> bool {
    match pattern.strip_suffix(WILDCARD) {
        Some(prefix) => starts_with_ignore_case(candidate, prefix),
        None => eq_ignore_case(candidate, pattern),
    }
}

/// Whether the pattern ends in the wildcard marker.
pub fn is_wildcard(pattern: &str) -> bool {
    pattern.ends_with(WILDCARD)
}

/// Remove a trailing `.{extension}` from `name`, ignoring case.
///
/// Names without the extension are returned unchanged.
pub fn strip_extension<'a>(name: &'a str, extension: &str) -> &'a str {
    let suffix_len = extension.len() + 1;
    if name.len() <= suffix_len || !name.is_char_boundary(name.len() - suffix_len) {
        return name;
    }

    let (stem, suffix) = name.split_at(name.len() - suffix_len);
    if suffix.starts_with('.') && eq_ignore_case(&suffix[1..], extension) {
        stem
    } else {
        name
    }
}

/// Whether `name` already carries `.{extension}`.
pub fn has_extension(name: &str, extension: &str) -> bool {
    strip_extension(name, extension).len() != name.len()
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

fn starts_with_ignore_case(candidate: &str, prefix: &str) -> bool {
    let mut candidate = candidate.chars().flat_map(char::to_lowercase);
    prefix
        .chars()
        .flat_map(char::to_lowercase)
        .all(|p| candidate.next() == Some(p))
}
