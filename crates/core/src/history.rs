//! Caption history: a bounded, deduplicating, most-recent-first list of
//! previously exported (caption, tags) pairs.
//!
//! The store itself is pure data (it serializes as part of the persisted
//! profile); recording, deleting and truncating never touch the disk.
//! Callers persist the owning [`Profile`](crate::profile::Profile) after
//! each mutation.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Smallest accepted history length.
pub const MIN_HISTORY_LEN: usize = 10;
/// Largest accepted history length.
pub const MAX_HISTORY_LEN: usize = 500;
/// History length used until the user configures one.
pub const DEFAULT_HISTORY_LEN: usize = 50;

/// One previously used (caption, tags) pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique, time-derived identifier.
    pub id: String,
    pub caption: String,
    pub tags: String,
    /// RFC 3339 timestamp of the most recent use.
    pub timestamp: String,
}

/// Bounded MRU store of caption history entries.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
    #[serde(default = "default_max_len")]
    max_len: usize,
}

fn default_max_len() -> usize {
    DEFAULT_HISTORY_LEN
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            max_len: DEFAULT_HISTORY_LEN,
        }
    }
}

impl HistoryStore {
    /// Records a (caption, tags) pair at the front of the list.
    ///
    /// Both fields are trimmed; a pair that is empty after trimming is
    /// ignored. Recording a pair that already exists promotes the existing
    /// entry to the front with a refreshed timestamp instead of duplicating
    /// it. The list is then truncated to the configured maximum, dropping
    /// the oldest entries.
    ///
    /// Returns `true` when the store changed.
    pub fn record(&mut self, caption: &str, tags: &str) -> bool {
        let caption = caption.trim();
        let tags = tags.trim();
        let key = dedup_key(caption, tags);
        if key.is_empty() {
            return false;
        }

        let timestamp = Utc::now().to_rfc3339();
        if let Some(pos) = self
            .entries
            .iter()
            .position(|e| dedup_key(&e.caption, &e.tags) == key)
        {
            let mut existing = self.entries.remove(pos);
            existing.timestamp = timestamp;
            self.entries.insert(0, existing);
        } else {
            let entry = HistoryEntry {
                id: self.fresh_id(),
                caption: caption.to_string(),
                tags: tags.to_string(),
                timestamp,
            };
            self.entries.insert(0, entry);
            self.entries.truncate(self.max_len);
        }
        true
    }

    /// Removes the entry with the given id. Absent ids are a no-op.
    pub fn delete(&mut self, id: &str) {
        self.entries.retain(|e| e.id != id);
    }

    /// Case-insensitive substring search over "caption tags".
    ///
    /// An empty query yields no results; callers wanting everything use
    /// [`list`](Self::list) instead.
    pub fn search(&self, query: &str) -> Vec<&HistoryEntry> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|e| format!("{} {}", e.caption, e.tags).to_lowercase().contains(&query))
            .collect()
    }

    /// All entries, most recent first.
    pub fn list(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Looks up an entry by id.
    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// The configured maximum number of entries.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Sets the maximum length, truncating existing entries past the new
    /// bound. Values outside `[MIN_HISTORY_LEN, MAX_HISTORY_LEN]` are
    /// rejected and the current bound stays in effect.
    pub fn set_max_len(&mut self, max_len: usize) -> bool {
        if !(MIN_HISTORY_LEN..=MAX_HISTORY_LEN).contains(&max_len) {
            return false;
        }
        self.max_len = max_len;
        self.entries.truncate(max_len);
        true
    }

    /// Millisecond-epoch id, nudged until unique against current entries.
    fn fresh_id(&self) -> String {
        let mut millis = Utc::now().timestamp_millis();
        loop {
            let id = millis.to_string();
            if self.get(&id).is_none() {
                return id;
            }
            millis += 1;
        }
    }
}

fn dedup_key(caption: &str, tags: &str) -> String {
    format!("{} {}", caption.trim(), tags.trim()).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_inserts_most_recent_first() {
        let mut store = HistoryStore::default();
        assert!(store.record("a cat", "animal"));
        assert!(store.record("a dog", "animal"));

        let captions: Vec<_> = store.list().iter().map(|e| e.caption.as_str()).collect();
        assert_eq!(captions, ["a dog", "a cat"]);
    }

    #[test]
    fn record_dedups_and_promotes() {
        let mut store = HistoryStore::default();
        store.record("a", "b");
        let first_id = store.list()[0].id.clone();
        let first_ts = store.list()[0].timestamp.clone();
        store.record("c", "d");
        store.record("  a  ", " b ");

        assert_eq!(store.list().len(), 2);
        assert_eq!(store.list()[0].caption, "a");
        // Promotion keeps the id but refreshes the timestamp ordering slot.
        assert_eq!(store.list()[0].id, first_id);
        assert!(store.list()[0].timestamp >= first_ts);
    }

    #[test]
    fn record_ignores_empty_pairs() {
        let mut store = HistoryStore::default();
        assert!(!store.record("   ", ""));
        assert!(store.list().is_empty());
    }

    #[test]
    fn record_truncates_to_max_len() {
        let mut store = HistoryStore::default();
        store.set_max_len(10);
        for i in 0..25 {
            store.record(&format!("caption {i}"), "");
        }
        assert_eq!(store.list().len(), 10);
        // Most recent kept, oldest dropped.
        assert_eq!(store.list()[0].caption, "caption 24");
        assert_eq!(store.list()[9].caption, "caption 15");
    }

    #[test]
    fn delete_is_idempotent() {
        let mut store = HistoryStore::default();
        store.record("a", "b");
        let id = store.list()[0].id.clone();
        store.delete(&id);
        assert!(store.list().is_empty());
        store.delete(&id);
        store.delete("never-existed");
        assert!(store.list().is_empty());
    }

    #[test]
    fn search_is_case_insensitive_over_caption_and_tags() {
        let mut store = HistoryStore::default();
        store.record("A red Fox", "animal, forest");
        store.record("city skyline", "urban");

        assert_eq!(store.search("FOX").len(), 1);
        assert_eq!(store.search("forest").len(), 1);
        assert_eq!(store.search("urban").len(), 1);
        assert_eq!(store.search("ocean").len(), 0);
    }

    #[test]
    fn search_empty_query_yields_nothing() {
        let mut store = HistoryStore::default();
        store.record("a", "b");
        assert!(store.search("").is_empty());
        assert!(store.search("   ").is_empty());
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn set_max_len_validates_and_truncates() {
        let mut store = HistoryStore::default();
        for i in 0..30 {
            store.record(&format!("c{i}"), "");
        }
        assert!(!store.set_max_len(5));
        assert!(!store.set_max_len(501));
        assert_eq!(store.list().len(), 30);

        assert!(store.set_max_len(12));
        assert_eq!(store.list().len(), 12);
        assert_eq!(store.max_len(), 12);
    }

    #[test]
    fn ids_are_unique_under_rapid_inserts() {
        let mut store = HistoryStore::default();
        for i in 0..50 {
            store.record(&format!("c{i}"), "");
        }
        let mut ids: Vec<_> = store.list().iter().map(|e| e.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), store.list().len());
    }
}
