//! redb table definitions for the GradeMix state store.
//!
//! Each table uses `&str` keys and `&[u8]` values (JSON-serialized types),
//! except `META` which holds plain counters.

use redb::TableDefinition;

/// Session state under the single key [`SESSION_KEY`].
pub const SESSION: TableDefinition<&str, &[u8]> = TableDefinition::new("session");

/// History entries keyed by zero-padded sequence number.
pub const HISTORY: TableDefinition<&str, &[u8]> = TableDefinition::new("history");

/// Pair co-occurrence records keyed by `{email_a}\n{email_b}` (sorted).
pub const PAIR_COUNTS: TableDefinition<&str, &[u8]> = TableDefinition::new("pair_counts");

/// Store-wide counters.
pub const META: TableDefinition<&str, u64> = TableDefinition::new("meta");

pub const SESSION_KEY: &str = "current";

/// Last history sequence number handed out.
pub const HISTORY_SEQ_KEY: &str = "history_seq";
