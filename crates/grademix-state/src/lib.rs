//! grademix-state: persistence for the GradeMix caller layer.
//!
//! Backed by [redb](https://docs.rs/redb), stores the working session
//! (roster, settings, last partition), a capped history of past
//! groupings, and pair co-occurrence counts for analytics.
//!
//! # Architecture
//!
//! All domain types are JSON-serialized into redb's `&[u8]` value columns.
//! History keys are zero-padded sequence numbers so a plain scan returns
//! them in insertion order; pair keys are the two emails, sorted.
//!
//! The `StateStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`).
//! Session load/save goes through the [`SessionStore`] trait.

pub mod error;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StateError, StateResult};
pub use store::{SessionStore, StateStore};
pub use types::*;
