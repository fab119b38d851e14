//! Persisted GradeMix state.
//!
//! All types are JSON-serialized into redb value columns.

use grademix_core::{Group, GroupingSettings, Individual};
use serde::{Deserialize, Serialize};

/// Keep at most this many history entries; older ones are pruned on push.
pub const MAX_HISTORY_ENTRIES: usize = 10;

// ── Session ────────────────────────────────────────────────────────

/// Everything the caller layer needs to resume where it left off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub roster: Vec<Individual>,
    pub settings: GroupingSettings,
    /// The most recent partition, if any. Renames apply here.
    pub groups: Option<Vec<Group>>,
}

// ── History ────────────────────────────────────────────────────────

/// A past grouping, kept so the operator can look back at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Monotonic sequence number, unique within a store.
    pub id: u64,
    /// Unix timestamp (seconds).
    pub timestamp: u64,
    /// Seed that reproduces this grouping, if one was used.
    pub seed: Option<u64>,
    pub groups: Vec<Group>,
}

impl HistoryEntry {
    /// Zero-padded key so lexical order equals insertion order.
    pub fn table_key(&self) -> String {
        history_key(self.id)
    }
}

pub(crate) fn history_key(id: u64) -> String {
    format!("{id:020}")
}

// ── Analytics ──────────────────────────────────────────────────────

/// Co-occurrence counter for one unordered pair of individuals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairRecord {
    pub first_email: String,
    pub first_name: String,
    pub second_email: String,
    pub second_name: String,
    pub count: u64,
}

impl PairRecord {
    /// Order-independent key for a pair of individuals.
    pub fn key_for(a: &Individual, b: &Individual) -> String {
        if a.email <= b.email {
            format!("{}\n{}", a.email, b.email)
        } else {
            format!("{}\n{}", b.email, a.email)
        }
    }

    pub(crate) fn new(a: &Individual, b: &Individual) -> Self {
        let (first, second) = if a.email <= b.email { (a, b) } else { (b, a) };
        Self {
            first_email: first.email.clone(),
            first_name: first.display_name(),
            second_email: second.email.clone(),
            second_name: second.display_name(),
            count: 0,
        }
    }
}

/// How often two individuals have shared a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairFrequency {
    pub first: String,
    pub second: String,
    pub count: u64,
}

impl From<PairRecord> for PairFrequency {
    fn from(record: PairRecord) -> Self {
        Self {
            first: record.first_name,
            second: record.second_name,
            count: record.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_key_is_order_independent() {
        let a = Individual::new("Ada", "Lovelace", "ada@x.test", "9", "f");
        let b = Individual::new("Alan", "Turing", "alan@x.test", "10", "m");
        assert_eq!(PairRecord::key_for(&a, &b), PairRecord::key_for(&b, &a));

        let record = PairRecord::new(&b, &a);
        assert_eq!(record.first_email, "ada@x.test");
        assert_eq!(record.second_name, "Alan Turing");
    }

    #[test]
    fn history_keys_sort_numerically() {
        assert!(history_key(9) < history_key(10));
        assert!(history_key(99) < history_key(100));
    }
}
