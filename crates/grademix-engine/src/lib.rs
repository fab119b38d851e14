//! GradeMix grouping engine: constrained, category-balanced partitioning.
//!
//! Assigns a roster of individuals into a fixed number of named groups.
//! Assignment and pairing constraints are honored first; the rest of the
//! population is spread so each primary category value is represented as
//! evenly as possible in every group. The result is annotated with a
//! balance audit but never blocked by it.
//!
//! The engine is a pure function of its inputs plus a randomness source.
//! It does no I/O and keeps no state between calls.
//!
//! # Components
//!
//! - **`resolve`**: Constraint resolution (disjoint claim set)
//! - **`placer`**: Constrained placement (pins, smallest-group blocks)
//! - **`distribute`**: Category bucketing, shuffling, round-robin dealing
//! - **`audit`**: Per-group domain coverage report
//! - **`partition`**: The end-to-end operation
//! - **`report`**: Text formatting of an outcome

pub mod audit;
pub mod distribute;
pub mod error;
pub mod partition;
pub mod placer;
pub mod report;
pub mod resolve;

pub use audit::{BalanceReport, GroupBalance, Verdict, audit_groups};
pub use error::{EngineError, EngineResult};
pub use partition::{PartitionOutcome, PartitionRequest, partition, partition_with_rng};
pub use report::format_outcome;
pub use resolve::{FixedClaim, Resolution, resolve_constraints};
