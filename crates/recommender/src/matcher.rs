//! Free-text title lookup.
//!
//! A catalog entry matches when the normalized query is a substring of its
//! search title, or when it is one after removing all whitespace from both
//! ("toystory" finds "Toy Story (1995)"). The first match in catalog order
//! wins; there is no relevance ordering.

use crate::catalog::{search_key, Catalog, CatalogEntry};

/// Lowercase, trim, then drop punctuation (same rule as catalog search titles)
pub fn normalize_query(query: &str) -> String {
    search_key(query.trim())
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// A normalized query, ready to test against catalog entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleQuery {
    normalized: String,
    compact: String,
}

impl TitleQuery {
    pub fn new(query: &str) -> Self {
        let normalized = normalize_query(query);
        let compact = strip_whitespace(&normalized);
        Self {
            normalized,
            compact,
        }
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        entry.search_title.contains(&self.normalized)
            || strip_whitespace(&entry.search_title).contains(&self.compact)
    }
}

/// Locates catalog entries for a free-text title
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleMatcher;

impl TitleMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Row of the first matching entry, or `None`
    pub fn find(&self, query: &str, catalog: &Catalog) -> Option<usize> {
        let query = TitleQuery::new(query);
        catalog.iter().position(|entry| query.matches(entry))
    }

    /// Rows of every matching entry, in catalog order
    pub fn find_all(&self, query: &str, catalog: &Catalog) -> Vec<usize> {
        let query = TitleQuery::new(query);
        catalog
            .iter()
            .enumerate()
            .filter(|(_, entry)| query.matches(entry))
            .map(|(row, _)| row)
            .collect()
    }
}
