//! Text and exact-id filtering over the active list.
//!
//! Filters never touch the list they read from; they return positions into
//! it so the caller can render a derived view.

use crate::types::{clean_text, Episode, Listable, Show};

/// Matching against a lowercased search term.
pub trait Searchable {
    /// `needle` is already trimmed and lowercased and never empty.
    fn matches(&self, needle: &str) -> bool;
}

impl Searchable for Show {
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.genres.iter().any(|g| g.to_lowercase().contains(needle))
            || summary_contains(&self.summary, needle)
    }
}

impl Searchable for Episode {
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || summary_contains(&self.summary, needle)
    }
}

fn summary_contains(summary: &Option<String>, needle: &str) -> bool {
    clean_text(summary.as_deref()).to_lowercase().contains(needle)
}

/// Normalize raw filter input.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Positions of the items matching `term`, in list order.
///
/// An empty (or whitespace-only) term matches everything.
pub fn text_filter<T: Searchable>(items: &[T], term: &str) -> Vec<usize> {
    let needle = normalize_term(term);
    if needle.is_empty() {
        return (0..items.len()).collect();
    }
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.matches(&needle))
        .map(|(i, _)| i)
        .collect()
}

/// Position of the item with the given identifier.
pub fn find_by_id<T: Listable>(items: &[T], id: u32) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}
