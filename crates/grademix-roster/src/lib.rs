//! grademix-roster: CSV in and out of the grouping engine.
//!
//! - **`import`**: lenient roster parsing (`categoryA,categoryB,first,last,email`)
//! - **`export`**: grouped export (`groupName,...`) and its strict decoder
//! - **`record`**: record reading and field escaping shared by both

pub mod error;
pub mod export;
pub mod import;
pub mod record;

pub use error::{RosterError, RosterResult};
pub use export::{GroupedRow, decode_grouped, encode_grouped, rows_to_groups, write_grouped};
pub use import::{RosterImport, parse_roster, read_roster};
