//! Product name normalization for image search queries.
//!
//! Pricing service names carry package annotations such as `(500g)` or
//! `(2L*6)` that hurt search relevance, so queries are built from the name
//! with those qualifiers removed.

/// Longest prefix, in characters, used when a name has no usable word.
const FALLBACK_PREFIX_CHARS: usize = 10;

/// Remove every `( ... )` segment and trim surrounding whitespace.
///
/// Each `(` is paired with the nearest following `)`. An unclosed `(` and
/// everything after it is kept verbatim.
pub fn strip_qualifiers(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut rest = name;

    while let Some(open) = rest.find('(') {
        match rest[open..].find(')') {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

/// Short token shown on a placeholder image.
///
/// The first word of the qualifier-free name, or the first few characters
/// of the raw name when nothing is left after stripping.
pub fn fallback_token(name: &str) -> String {
    let stripped = strip_qualifiers(name);
    match stripped.split_whitespace().next() {
        Some(word) => word.to_string(),
        None => name.trim().chars().take(FALLBACK_PREFIX_CHARS).collect(),
    }
}

#[cfg(test)]
#[path = "tests/name_tests.rs"]
mod tests;
