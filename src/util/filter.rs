//! Client-side search predicates.
//!
//! Every list view filters what it already fetched; nothing here talks to
//! the API. A blank search term matches every record.

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;

/// Case-insensitive substring test. A blank `term` matches anything.
#[must_use]
pub fn contains_ci(haystack: &str, term: &str) -> bool {
    let term = term.trim();
    term.is_empty() || haystack.to_lowercase().contains(&term.to_lowercase())
}

/// True when any of `fields` contains `term`. Missing fields never match,
/// except that a blank term matches regardless.
#[must_use]
pub fn matches_any<'a>(term: &str, fields: impl IntoIterator<Item = Option<&'a str>>) -> bool {
    if term.trim().is_empty() {
        return true;
    }
    fields.into_iter().flatten().any(|field| contains_ci(field, term))
}
