//! Session-scoped episode cache.
//!
//! Maps a show identifier to its ordered episode list. Entries are written
//! once, on the first successful fetch, and are never evicted.

use crate::types::Episode;
use log::debug;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct EpisodeCache {
    entries: HashMap<u32, Vec<Episode>>,
}

impl EpisodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, show_id: u32) -> bool {
        self.entries.contains_key(&show_id)
    }

    pub fn get(&self, show_id: u32) -> Option<&[Episode]> {
        self.entries.get(&show_id).map(Vec::as_slice)
    }

    /// Store episodes for a show.
    ///
    /// Returns `false` and keeps the existing list if the show is already
    /// cached.
    pub fn insert(&mut self, show_id: u32, episodes: Vec<Episode>) -> bool {
        if self.entries.contains_key(&show_id) {
            debug!("Episodes for show {} already cached, keeping first copy", show_id);
            return false;
        }
        debug!("Caching {} episodes for show {}", episodes.len(), show_id);
        self.entries.insert(show_id, episodes);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(id: u32, name: &str) -> Episode {
        Episode {
            id,
            season: 1,
            number: Some(id),
            name: name.to_string(),
            summary: None,
            image: None,
            url: String::new(),
        }
    }

    #[test]
    fn test_insert_then_get() {
        let mut cache = EpisodeCache::new();
        assert!(cache.is_empty());
        assert!(cache.insert(5, vec![episode(10, "Pilot")]));
        assert!(cache.contains(5));
        assert_eq!(cache.get(5).map(|e| e.len()), Some(1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_first_write_wins() {
        let mut cache = EpisodeCache::new();
        cache.insert(5, vec![episode(10, "Pilot")]);
        assert!(!cache.insert(5, vec![episode(11, "Other"), episode(12, "More")]));
        let cached = cache.get(5).unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].name, "Pilot");
    }

    #[test]
    fn test_empty_list_is_a_valid_entry() {
        let mut cache = EpisodeCache::new();
        cache.insert(7, Vec::new());
        assert!(cache.contains(7));
        assert_eq!(cache.get(7), Some(&[][..]));
    }

    #[test]
    fn test_missing_show() {
        let cache = EpisodeCache::new();
        assert!(!cache.contains(1));
        assert!(cache.get(1).is_none());
    }
}
