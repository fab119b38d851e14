//! Shared types used across GradeMix crates.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// One member of the roster to be grouped.
///
/// `email` is the identity key: constraints refer to individuals by it and
/// the engine rejects a population that repeats one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Individual {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Primary category code (e.g. grade).
    pub category_a: String,
    /// Secondary category code (e.g. gender).
    pub category_b: String,
}

impl Individual {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        category_a: impl Into<String>,
        category_b: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            category_a: category_a.into(),
            category_b: category_b.into(),
        }
    }

    /// "First Last", as shown to operators.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// ── Categories ─────────────────────────────────────────────────────

/// A single value of a categorical attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryValue {
    /// Code as it appears on an [`Individual`] and in CSV files.
    pub code: String,
    /// Human-readable label used in violation messages. Defaults to the code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl CategoryValue {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: None,
        }
    }

    pub fn labeled(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: Some(label.into()),
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.code)
    }
}

/// The full, closed set of values a categorical attribute may take.
///
/// Declaration order is significant: the engine processes buckets in this
/// order and the audit lists missing values in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDomain {
    /// Attribute name, e.g. "grade". Used in CSV headers and messages.
    pub name: String,
    pub values: Vec<CategoryValue>,
}

impl CategoryDomain {
    pub fn new(name: impl Into<String>, values: Vec<CategoryValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Position of `code` in the domain, if it belongs to it.
    pub fn position(&self, code: &str) -> Option<usize> {
        self.values.iter().position(|v| v.code == code)
    }

    /// Display label for `code`, if it belongs to the domain.
    pub fn label_of(&self, code: &str) -> Option<&str> {
        self.position(code).map(|pos| self.values[pos].label())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Grades 9 through 12.
    pub fn grades() -> Self {
        Self::new(
            "grade",
            ["9", "10", "11", "12"].into_iter().map(CategoryValue::new).collect(),
        )
    }

    /// Binary gender, coded `m` / `f`.
    pub fn genders() -> Self {
        Self::new(
            "gender",
            vec![
                CategoryValue::labeled("m", "male"),
                CategoryValue::labeled("f", "female"),
            ],
        )
    }
}

/// The two attributes balanced and audited by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDomains {
    /// Category A: drives bucketing and is audited.
    pub primary: CategoryDomain,
    /// Category B: audited only.
    pub secondary: CategoryDomain,
}

impl Default for CategoryDomains {
    fn default() -> Self {
        Self {
            primary: CategoryDomain::grades(),
            secondary: CategoryDomain::genders(),
        }
    }
}

// ── Constraints ────────────────────────────────────────────────────

/// Individuals (by email) that must land in the same group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairConstraint {
    pub members: Vec<String>,
}

impl PairConstraint {
    pub fn new<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}

/// One individual (by email) pinned to a group index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignConstraint {
    pub email: String,
    pub group_index: usize,
}

impl AssignConstraint {
    pub fn new(email: impl Into<String>, group_index: usize) -> Self {
        Self {
            email: email.into(),
            group_index,
        }
    }
}

// ── Groups ─────────────────────────────────────────────────────────

/// One output slot of a partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub members: Vec<Individual>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Positional default name for group `index` (zero-based).
pub fn default_group_name(index: usize) -> String {
    format!("Group {}", index + 1)
}

/// Resolve `count` group names, synthesizing positional defaults for
/// missing or blank entries. Extra names are ignored.
pub fn resolve_group_names(names: &[String], count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match names.get(i) {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => default_group_name(i),
        })
        .collect()
}

/// Rename an existing group in place. Membership is untouched.
pub fn rename_group(groups: &mut [Group], index: usize, name: &str) -> CoreResult<()> {
    let len = groups.len();
    let group = groups
        .get_mut(index)
        .ok_or(CoreError::GroupIndexOutOfRange { index, len })?;
    group.name = name.to_string();
    Ok(())
}

// ── Settings ───────────────────────────────────────────────────────

/// Operator-chosen grouping parameters, persisted with the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingSettings {
    pub num_groups: usize,
    #[serde(default)]
    pub group_names: Vec<String>,
    #[serde(default)]
    pub pair_constraints: Vec<PairConstraint>,
    #[serde(default)]
    pub assign_constraints: Vec<AssignConstraint>,
}

impl Default for GroupingSettings {
    fn default() -> Self {
        let num_groups = 4;
        Self {
            num_groups,
            group_names: (0..num_groups).map(default_group_name).collect(),
            pair_constraints: Vec::new(),
            assign_constraints: Vec::new(),
        }
    }
}

impl GroupingSettings {
    pub fn resolved_names(&self) -> Vec<String> {
        resolve_group_names(&self.group_names, self.num_groups)
    }

    /// Change the group count, keeping existing names and filling the rest
    /// with positional defaults.
    pub fn set_num_groups(&mut self, num_groups: usize) {
        self.group_names = resolve_group_names(&self.group_names, num_groups);
        self.num_groups = num_groups;
    }
}
