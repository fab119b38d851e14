//! Balance audit.
//!
//! Checks every group for complete coverage of both category domains and
//! reports the values it lacks. The audit never touches the partition.

use std::collections::HashSet;

use grademix_core::{CategoryDomain, CategoryDomains, Group};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Balanced,
    Unbalanced,
}

/// Audit result for a single group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBalance {
    pub index: usize,
    pub name: String,
    /// Labels of primary values with no representative in this group.
    pub missing_primary: Vec<String>,
    /// Labels of secondary values with no representative in this group.
    pub missing_secondary: Vec<String>,
    pub verdict: Verdict,
}

/// Per-group audit of a partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub primary_name: String,
    pub secondary_name: String,
    pub groups: Vec<GroupBalance>,
}

impl BalanceReport {
    pub fn is_balanced(&self) -> bool {
        self.groups.iter().all(|g| g.verdict == Verdict::Balanced)
    }

    /// Groups flagged unbalanced.
    pub fn flagged(&self) -> impl Iterator<Item = &GroupBalance> {
        self.groups
            .iter()
            .filter(|g| g.verdict == Verdict::Unbalanced)
    }

    /// One human-readable line per (group, category) imbalance.
    pub fn violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        for group in self.flagged() {
            if !group.missing_primary.is_empty() {
                out.push(format!(
                    "{}: Missing {} {}",
                    group.name,
                    self.primary_name,
                    group.missing_primary.join(", ")
                ));
            }
            if !group.missing_secondary.is_empty() {
                out.push(format!(
                    "{}: Missing {} {}",
                    group.name,
                    self.secondary_name,
                    group.missing_secondary.join(", ")
                ));
            }
        }
        out
    }
}

fn missing_values(domain: &CategoryDomain, present: &HashSet<&str>) -> Vec<String> {
    domain
        .values
        .iter()
        .filter(|v| !present.contains(v.code.as_str()))
        .map(|v| v.label().to_string())
        .collect()
}

/// Audit `groups` against the full domains.
pub fn audit_groups(groups: &[Group], domains: &CategoryDomains) -> BalanceReport {
    let groups = groups
        .iter()
        .enumerate()
        .map(|(index, group)| {
            let primary: HashSet<&str> =
                group.members.iter().map(|m| m.category_a.as_str()).collect();
            let secondary: HashSet<&str> =
                group.members.iter().map(|m| m.category_b.as_str()).collect();

            let missing_primary = missing_values(&domains.primary, &primary);
            let missing_secondary = missing_values(&domains.secondary, &secondary);
            let verdict = if missing_primary.is_empty() && missing_secondary.is_empty() {
                Verdict::Balanced
            } else {
                Verdict::Unbalanced
            };

            GroupBalance {
                index,
                name: group.name.clone(),
                missing_primary,
                missing_secondary,
                verdict,
            }
        })
        .collect();

    BalanceReport {
        primary_name: domains.primary.name.clone(),
        secondary_name: domains.secondary.name.clone(),
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grademix_core::Individual;

    fn group(name: &str, members: &[(&str, &str)]) -> Group {
        Group {
            name: name.to_string(),
            members: members
                .iter()
                .enumerate()
                .map(|(i, (grade, gender))| {
                    Individual::new("F", "L", format!("{name}-{i}"), *grade, *gender)
                })
                .collect(),
        }
    }

    #[test]
    fn full_coverage_is_balanced() {
        let groups = vec![group(
            "Group 1",
            &[("9", "m"), ("10", "f"), ("11", "m"), ("12", "f")],
        )];
        let report = audit_groups(&groups, &CategoryDomains::default());
        assert!(report.is_balanced());
        assert!(report.violations().is_empty());
    }

    #[test]
    fn missing_grade_is_named() {
        let groups = vec![group(
            "Group 2",
            &[("9", "m"), ("10", "f"), ("12", "f")],
        )];
        let report = audit_groups(&groups, &CategoryDomains::default());

        assert!(!report.is_balanced());
        assert_eq!(report.groups[0].missing_primary, vec!["11"]);
        assert_eq!(report.violations(), vec!["Group 2: Missing grade 11"]);
    }

    #[test]
    fn missing_gender_uses_label() {
        let groups = vec![group(
            "Owls",
            &[("9", "m"), ("10", "m"), ("11", "m"), ("12", "m")],
        )];
        let report = audit_groups(&groups, &CategoryDomains::default());
        assert_eq!(report.groups[0].missing_secondary, vec!["female"]);
        assert_eq!(report.violations(), vec!["Owls: Missing gender female"]);
    }

    #[test]
    fn empty_group_misses_everything() {
        let groups = vec![group("Group 1", &[])];
        let report = audit_groups(&groups, &CategoryDomains::default());
        let g = &report.groups[0];
        assert_eq!(g.missing_primary, vec!["9", "10", "11", "12"]);
        assert_eq!(g.missing_secondary, vec!["male", "female"]);
        assert_eq!(
            report.violations(),
            vec![
                "Group 1: Missing grade 9, 10, 11, 12",
                "Group 1: Missing gender male, female",
            ]
        );
    }

    #[test]
    fn audit_reports_every_group_in_order() {
        let groups = vec![
            group("A", &[("9", "m"), ("10", "f"), ("11", "m"), ("12", "f")]),
            group("B", &[("9", "m")]),
        ];
        let report = audit_groups(&groups, &CategoryDomains::default());
        assert_eq!(report.groups.len(), 2);
        assert_eq!(report.groups[0].verdict, Verdict::Balanced);
        assert_eq!(report.groups[1].verdict, Verdict::Unbalanced);
        assert_eq!(report.flagged().count(), 1);
    }
}
