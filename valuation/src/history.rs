//! Append-only log of committed valuations.

use estate_types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub estimated_value: u128,
    pub committed_at: Timestamp,
}

/// Committed estimated values per record, in confirm order.
///
/// Entries are only ever appended, by a successful confirm.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalValueLog {
    entries: BTreeMap<RecordId, Vec<HistoryEntry>>,
}

impl HistoricalValueLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, id: RecordId, estimated_value: u128, committed_at: Timestamp) {
        self.entries.entry(id).or_default().push(HistoryEntry {
            estimated_value,
            committed_at,
        });
    }

    pub fn entries(&self, id: RecordId) -> &[HistoryEntry] {
        self.entries.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Committed estimated values for `id`, oldest first.
    pub fn values(&self, id: RecordId) -> Vec<u128> {
        self.entries(id).iter().map(|e| e.estimated_value).collect()
    }

    pub fn len(&self, id: RecordId) -> usize {
        self.entries(id).len()
    }

    pub fn latest(&self, id: RecordId) -> Option<&HistoryEntry> {
        self.entries(id).last()
    }
}
