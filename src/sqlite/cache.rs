use std::collections::HashSet;

/// Identity-cache key for a record.
///
/// Safe as long as table names cannot contain a `$` sign; the schema layer
/// guarantees that.
#[must_use]
pub fn cache_key(table: &str, id: &str) -> String {
    format!("{table}${id}")
}

/// The set of records the host has already received in materialized form.
///
/// Presence of a key means the host holds a full dictionary for that record
/// and sending the id alone suffices. Mutations flowing through a batch keep
/// this coherent with the database: their cache deltas are applied only once
/// the batch commits, so rollback leaves the cache exactly as it was.
#[derive(Debug, Default)]
pub struct RecordCache {
    records: HashSet<String>,
}

impl RecordCache {
    #[must_use]
    pub fn is_cached(&self, key: &str) -> bool {
        self.records.contains(key)
    }

    pub fn mark_as_cached(&mut self, key: String) {
        self.records.insert(key);
    }

    pub fn remove_from_cache(&mut self, key: &str) {
        self.records.remove(key);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
