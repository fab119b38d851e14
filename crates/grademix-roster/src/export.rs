//! Grouped CSV export.
//!
//! Format: header `groupName,{primary},{secondary},first,last,email`, then
//! one row per member with groups emitted in order. [`decode_grouped`]
//! reads the same format back and, unlike roster import, rejects
//! malformed rows.

use std::path::Path;

use grademix_core::{CategoryDomains, Group, Individual};
use tracing::info;

use crate::error::{RosterError, RosterResult};
use crate::record::{Record, join_record, read_records};

const GROUPED_FIELDS: usize = 6;

/// One decoded row of a grouped export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedRow {
    pub group_name: String,
    pub individual: Individual,
}

/// Encode `groups` as grouped CSV text.
pub fn encode_grouped(groups: &[Group], domains: &CategoryDomains) -> String {
    let mut csv = join_record(&[
        "groupName",
        domains.primary.name.as_str(),
        domains.secondary.name.as_str(),
        "first",
        "last",
        "email",
    ]);
    csv.push('\n');

    for group in groups {
        for m in &group.members {
            csv.push_str(&join_record(&[
                &group.name,
                &m.category_a,
                &m.category_b,
                &m.first_name,
                &m.last_name,
                &m.email,
            ]));
            csv.push('\n');
        }
    }
    csv
}

/// Decode grouped CSV text produced by [`encode_grouped`].
pub fn decode_grouped(text: &str) -> RosterResult<Vec<GroupedRow>> {
    let mut rows = Vec::new();
    let mut records = read_records(text).into_iter();

    match records.next() {
        Some(header) => {
            let fields = &header.fields;
            if fields.len() != GROUPED_FIELDS || fields[0] != "groupName" {
                return Err(RosterError::InvalidRow {
                    line: header.line,
                    reason: "expected grouped export header".to_string(),
                });
            }
        }
        None => return Ok(rows),
    }

    for Record { line, fields } in records {
        if fields.len() != GROUPED_FIELDS {
            return Err(RosterError::InvalidRow {
                line,
                reason: format!("expected {GROUPED_FIELDS} fields, found {}", fields.len()),
            });
        }
        let mut fields = fields.into_iter();
        let mut next = || fields.next().unwrap_or_default();
        let group_name = next();
        let category_a = next();
        let category_b = next();
        let first_name = next();
        let last_name = next();
        let email = next();
        rows.push(GroupedRow {
            group_name,
            individual: Individual {
                first_name,
                last_name,
                email,
                category_a,
                category_b,
            },
        });
    }
    Ok(rows)
}

/// Regroup decoded rows by group name, preserving first-seen group order.
pub fn rows_to_groups(rows: Vec<GroupedRow>) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    for row in rows {
        match groups.iter_mut().find(|g| g.name == row.group_name) {
            Some(group) => group.members.push(row.individual),
            None => groups.push(Group {
                name: row.group_name,
                members: vec![row.individual],
            }),
        }
    }
    groups
}

/// Write `groups` as grouped CSV to `path`.
pub fn write_grouped(path: &Path, groups: &[Group], domains: &CategoryDomains) -> RosterResult<()> {
    std::fs::write(path, encode_grouped(groups, domains))?;
    let rows: usize = groups.iter().map(Group::len).sum();
    info!(?path, groups = groups.len(), rows, "grouped csv written");
    Ok(())
}
