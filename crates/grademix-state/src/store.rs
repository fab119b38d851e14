//! StateStore: redb-backed persistence for the GradeMix caller layer.
//!
//! Holds the session (roster, settings, last partition), a capped
//! grouping history, and pair co-occurrence analytics. Values are
//! JSON-serialized into redb's `&[u8]` columns. The store supports both
//! on-disk and in-memory backends (the latter for testing).
//!
//! The grouping engine never sees this store; callers load state, run the
//! engine, and save the result.

use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use grademix_core::Group;
use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::{debug, info};

use crate::error::{StateError, StateResult};
use crate::tables::*;
use crate::types::*;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Load/save interface for session state, injected into the caller layer.
pub trait SessionStore {
    /// Current session, or the default session if none was saved.
    fn load(&self) -> StateResult<SessionState>;

    fn save(&self, state: &SessionState) -> StateResult<()>;
}

/// Thread-safe state store backed by redb.
#[derive(Clone)]
pub struct StateStore {
    db: Arc<Database>,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl StateStore {
    /// Open (or create) a persistent state store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "state store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory state store (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory state store opened");
        Ok(store)
    }

    /// Create all tables if they don't exist yet.
    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        txn.open_table(SESSION).map_err(map_err!(Table))?;
        txn.open_table(HISTORY).map_err(map_err!(Table))?;
        txn.open_table(PAIR_COUNTS).map_err(map_err!(Table))?;
        txn.open_table(META).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    // ── Session ────────────────────────────────────────────────────

    fn load_session(&self) -> StateResult<SessionState> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(SESSION).map_err(map_err!(Table))?;
        match table.get(SESSION_KEY).map_err(map_err!(Read))? {
            Some(guard) => {
                serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))
            }
            None => Ok(SessionState::default()),
        }
    }

    fn save_session(&self, state: &SessionState) -> StateResult<()> {
        let value = serde_json::to_vec(state).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(SESSION).map_err(map_err!(Table))?;
            table
                .insert(SESSION_KEY, value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(
            roster = state.roster.len(),
            num_groups = state.settings.num_groups,
            "session saved"
        );
        Ok(())
    }

    // ── History ────────────────────────────────────────────────────

    /// Record a grouping. Returns the new entry; entries beyond
    /// [`MAX_HISTORY_ENTRIES`] are pruned, oldest first.
    pub fn push_history(&self, groups: &[Group], seed: Option<u64>) -> StateResult<HistoryEntry> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let entry;
        {
            let mut meta = txn.open_table(META).map_err(map_err!(Table))?;
            let last = meta
                .get(HISTORY_SEQ_KEY)
                .map_err(map_err!(Read))?
                .map(|guard| guard.value())
                .unwrap_or(0);
            let id = last + 1;
            meta.insert(HISTORY_SEQ_KEY, id).map_err(map_err!(Write))?;

            entry = HistoryEntry {
                id,
                timestamp: now_secs(),
                seed,
                groups: groups.to_vec(),
            };
            let value = serde_json::to_vec(&entry).map_err(map_err!(Serialize))?;

            let mut table = txn.open_table(HISTORY).map_err(map_err!(Table))?;
            table
                .insert(entry.table_key().as_str(), value.as_slice())
                .map_err(map_err!(Write))?;

            let keys: Vec<String> = table
                .iter()
                .map_err(map_err!(Read))?
                .filter_map(|e| e.ok().map(|(key, _)| key.value().to_string()))
                .collect();
            let excess = keys.len().saturating_sub(MAX_HISTORY_ENTRIES);
            for key in &keys[..excess] {
                table.remove(key.as_str()).map_err(map_err!(Write))?;
            }
            if excess > 0 {
                debug!(pruned = excess, "history pruned");
            }
        }
        txn.commit().map_err(map_err!(Transaction))?;
        info!(id = entry.id, groups = entry.groups.len(), "history entry recorded");
        Ok(entry)
    }

    /// All history entries, newest first.
    pub fn list_history(&self) -> StateResult<Vec<HistoryEntry>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(HISTORY).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))?.rev() {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let item: HistoryEntry =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(item);
        }
        Ok(results)
    }

    /// Get a history entry by id.
    pub fn get_history(&self, id: u64) -> StateResult<Option<HistoryEntry>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(HISTORY).map_err(map_err!(Table))?;
        match table.get(history_key(id).as_str()).map_err(map_err!(Read))? {
            Some(guard) => {
                let item: HistoryEntry =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    /// Delete a history entry. Returns true if it existed.
    pub fn remove_history(&self, id: u64) -> StateResult<bool> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(HISTORY).map_err(map_err!(Table))?;
            existed = table
                .remove(history_key(id).as_str())
                .map_err(map_err!(Write))?
                .is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(id, existed, "history entry removed");
        Ok(existed)
    }

    /// Delete all history entries. Returns the number removed.
    pub fn clear_history(&self) -> StateResult<usize> {
        clear_table(&self.db, HISTORY)
    }

    // ── Analytics ──────────────────────────────────────────────────

    /// Count every unordered pair of members that shares a group.
    pub fn track_grouping(&self, groups: &[Group]) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let mut pairs = 0usize;
        {
            let mut table = txn.open_table(PAIR_COUNTS).map_err(map_err!(Table))?;
            for group in groups {
                let members = &group.members;
                for (i, a) in members.iter().enumerate() {
                    for b in &members[i + 1..] {
                        let key = PairRecord::key_for(a, b);
                        let existing: Option<PairRecord> =
                            match table.get(key.as_str()).map_err(map_err!(Read))? {
                                Some(guard) => Some(
                                    serde_json::from_slice(guard.value())
                                        .map_err(map_err!(Deserialize))?,
                                ),
                                None => None,
                            };
                        let mut record = existing.unwrap_or_else(|| PairRecord::new(a, b));
                        record.count += 1;
                        let value = serde_json::to_vec(&record).map_err(map_err!(Serialize))?;
                        table
                            .insert(key.as_str(), value.as_slice())
                            .map_err(map_err!(Write))?;
                        pairs += 1;
                    }
                }
            }
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(pairs, "grouping tracked");
        Ok(())
    }

    /// Pair frequencies, most frequent first. Ties keep key order.
    pub fn pair_frequencies(&self) -> StateResult<Vec<PairFrequency>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(PAIR_COUNTS).map_err(map_err!(Table))?;
        let mut results: Vec<PairFrequency> = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let record: PairRecord =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(record.into());
        }
        results.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(results)
    }

    /// Forget all pair counts. Returns the number of pairs removed.
    pub fn reset_analytics(&self) -> StateResult<usize> {
        clear_table(&self.db, PAIR_COUNTS)
    }
}

fn clear_table(
    db: &Database,
    definition: redb::TableDefinition<'static, &'static str, &'static [u8]>,
) -> StateResult<usize> {
    let txn = db.begin_write().map_err(map_err!(Transaction))?;
    let count;
    {
        let mut table = txn.open_table(definition).map_err(map_err!(Table))?;
        let keys: Vec<String> = table
            .iter()
            .map_err(map_err!(Read))?
            .filter_map(|e| e.ok().map(|(key, _)| key.value().to_string()))
            .collect();
        count = keys.len();
        for key in &keys {
            table.remove(key.as_str()).map_err(map_err!(Write))?;
        }
    }
    txn.commit().map_err(map_err!(Transaction))?;
    debug!(count, "table cleared");
    Ok(count)
}

impl SessionStore for StateStore {
    fn load(&self) -> StateResult<SessionState> {
        self.load_session()
    }

    fn save(&self, state: &SessionState) -> StateResult<()> {
        self.save_session(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grademix_core::{AssignConstraint, GroupingSettings, Individual, PairConstraint};

    fn person(first: &str, email: &str) -> Individual {
        Individual::new(first, "Test", email, "9", "m")
    }

    fn group(name: &str, members: &[&str]) -> Group {
        Group {
            name: name.to_string(),
            members: members
                .iter()
                .map(|e| person(&e.to_uppercase(), &format!("{e}@x.test")))
                .collect(),
        }
    }

    // ── Session ────────────────────────────────────────────────────

    #[test]
    fn empty_store_loads_default_session() {
        let store = StateStore::open_in_memory().unwrap();
        assert_eq!(store.load().unwrap(), SessionState::default());
    }

    #[test]
    fn session_save_and_load() {
        let store = StateStore::open_in_memory().unwrap();
        let mut settings = GroupingSettings::default();
        settings.set_num_groups(3);
        settings.pair_constraints.push(PairConstraint::new(["a@x.test", "b@x.test"]));
        settings.assign_constraints.push(AssignConstraint::new("c@x.test", 2));
        let state = SessionState {
            roster: vec![person("A", "a@x.test"), person("B", "b@x.test")],
            settings,
            groups: Some(vec![group("Group 1", &["a", "b"])]),
        };

        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), state);
    }

    #[test]
    fn session_save_overwrites() {
        let store = StateStore::open_in_memory().unwrap();
        let mut state = SessionState::default();
        store.save(&state).unwrap();

        state.roster.push(person("A", "a@x.test"));
        store.save(&state).unwrap();

        assert_eq!(store.load().unwrap().roster.len(), 1);
    }

    // ── History ────────────────────────────────────────────────────

    #[test]
    fn history_newest_first() {
        let store = StateStore::open_in_memory().unwrap();
        let first = store.push_history(&[group("G1", &["a"])], Some(1)).unwrap();
        let second = store.push_history(&[group("G1", &["b"])], None).unwrap();

        assert!(second.id > first.id);
        let listed = store.list_history().unwrap();
        assert_eq!(listed, vec![second, first]);
    }

    #[test]
    fn history_is_capped() {
        let store = StateStore::open_in_memory().unwrap();
        for i in 0..(MAX_HISTORY_ENTRIES as u64 + 3) {
            store.push_history(&[group("G", &["a"])], Some(i)).unwrap();
        }

        let listed = store.list_history().unwrap();
        assert_eq!(listed.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(listed[0].seed, Some(MAX_HISTORY_ENTRIES as u64 + 2));
        assert_eq!(listed.last().unwrap().seed, Some(3));
    }

    #[test]
    fn history_get_remove_clear() {
        let store = StateStore::open_in_memory().unwrap();
        let entry = store.push_history(&[group("G", &["a"])], Some(5)).unwrap();
        store.push_history(&[group("G", &["b"])], Some(6)).unwrap();

        assert_eq!(store.get_history(entry.id).unwrap(), Some(entry.clone()));
        assert!(store.remove_history(entry.id).unwrap());
        assert!(!store.remove_history(entry.id).unwrap());
        assert_eq!(store.get_history(entry.id).unwrap(), None);

        assert_eq!(store.clear_history().unwrap(), 1);
        assert!(store.list_history().unwrap().is_empty());
    }

    #[test]
    fn history_ids_keep_increasing_after_clear() {
        let store = StateStore::open_in_memory().unwrap();
        let first = store.push_history(&[], None).unwrap();
        store.clear_history().unwrap();
        let second = store.push_history(&[], None).unwrap();
        assert!(second.id > first.id);
    }

    // ── Analytics ──────────────────────────────────────────────────

    #[test]
    fn track_counts_pairs_within_groups() {
        let store = StateStore::open_in_memory().unwrap();
        store
            .track_grouping(&[group("G1", &["a", "b", "c"]), group("G2", &["d"])])
            .unwrap();
        store
            .track_grouping(&[group("G1", &["b", "a"]), group("G2", &["c", "d"])])
            .unwrap();

        let freqs = store.pair_frequencies().unwrap();
        // a-b, a-c, b-c, c-d
        assert_eq!(freqs.len(), 4);
        assert_eq!(freqs[0].count, 2);
        assert_eq!(freqs[0].first, "A Test");
        assert_eq!(freqs[0].second, "B Test");
        assert!(freqs[1..].iter().all(|f| f.count == 1));
    }

    #[test]
    fn reset_analytics_forgets_pairs() {
        let store = StateStore::open_in_memory().unwrap();
        store.track_grouping(&[group("G1", &["a", "b"])]).unwrap();

        assert_eq!(store.reset_analytics().unwrap(), 1);
        assert!(store.pair_frequencies().unwrap().is_empty());
    }

    // ── Persistence (on-disk) ──────────────────────────────────────

    #[test]
    fn persistence_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("grademix.redb");

        {
            let store = StateStore::open(&db_path).unwrap();
            let state = SessionState {
                roster: vec![person("A", "a@x.test")],
                ..SessionState::default()
            };
            store.save(&state).unwrap();
            store.push_history(&[group("G", &["a"])], Some(9)).unwrap();
        }

        let store = StateStore::open(&db_path).unwrap();
        assert_eq!(store.load().unwrap().roster.len(), 1);
        assert_eq!(store.list_history().unwrap()[0].seed, Some(9));
    }
}
