//! Style table for deduplication

use super::StyleRecord;
use ahash::AHashMap;
use std::hash::{Hash, Hasher};

/// Index of a record in a [`StyleTable`]
pub type StyleId = u32;

/// Deduplicated style records.
///
/// A sheet has thousands of cells but only a handful of distinct styles;
/// grids store a [`StyleId`] per cell. Id 0 is always the absent style.
#[derive(Debug, Clone)]
pub struct StyleTable {
    records: Vec<StyleRecord>,
    /// Hash of a record to every id with that hash
    index: AHashMap<u64, Vec<StyleId>>,
}

fn record_hash(record: &StyleRecord) -> u64 {
    let mut hasher = ahash::AHasher::default();
    record.hash(&mut hasher);
    hasher.finish()
}

impl StyleTable {
    /// Create a table holding only the absent style
    pub fn new() -> Self {
        let mut table = Self {
            records: Vec::with_capacity(16),
            index: AHashMap::with_capacity(16),
        };
        table.intern(StyleRecord::default());
        table
    }

    /// Id of an identical record, inserting it if new
    pub fn intern(&mut self, record: StyleRecord) -> StyleId {
        let bucket = self.index.entry(record_hash(&record)).or_default();
        if let Some(&id) = bucket.iter().find(|&&id| self.records[id as usize] == record) {
            return id;
        }

        let id = self.records.len() as StyleId;
        bucket.push(id);
        self.records.push(record);
        id
    }

    /// Get a record by id
    pub fn get(&self, id: StyleId) -> Option<&StyleRecord> {
        self.records.get(id as usize)
    }

    /// Number of distinct records, including the absent style
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when only the absent style is present
    pub fn is_empty(&self) -> bool {
        self.records.len() <= 1
    }

    /// Iterate over all records with their ids
    pub fn iter(&self) -> impl Iterator<Item = (StyleId, &StyleRecord)> {
        self.records.iter().enumerate().map(|(i, s)| (i as StyleId, s))
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::HexColor;

    #[test]
    fn absent_style_is_id_zero() {
        let mut table = StyleTable::new();
        assert_eq!(table.len(), 1);
        assert_eq!(table.intern(StyleRecord::default()), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn identical_records_share_an_id() {
        let mut table = StyleTable::new();
        let bold = table.intern(StyleRecord::new().bold(true));
        let again = table.intern(StyleRecord::new().bold(true));
        let yellow = table.intern(StyleRecord::new().background(HexColor::rgb(255, 255, 0)));

        assert_eq!(bold, again);
        assert_ne!(bold, yellow);
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(yellow).and_then(|s| s.background), Some(HexColor::rgb(255, 255, 0)));
    }
}
