//! grademix.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::types::{
    AssignConstraint, CategoryDomain, CategoryDomains, CategoryValue, GroupingSettings,
    PairConstraint,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrademixConfig {
    pub grouping: Option<GroupingConfig>,
    pub categories: Option<CategoriesConfig>,
    pub pairings: Option<Vec<PairingConfig>>,
    pub assignments: Option<Vec<AssignmentConfig>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupingConfig {
    pub num_groups: Option<usize>,
    pub group_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesConfig {
    pub primary: Option<CategoryConfig>,
    pub secondary: Option<CategoryConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub values: Vec<String>,
    /// Optional code → label map for messages (e.g. `f = "female"`).
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingConfig {
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentConfig {
    pub email: String,
    /// Zero-based group slot.
    pub group: usize,
}

impl CategoryConfig {
    fn to_domain(&self) -> CategoryDomain {
        let values = self
            .values
            .iter()
            .map(|code| {
                match self.labels.as_ref().and_then(|labels| labels.get(code)) {
                    Some(label) => CategoryValue::labeled(code.clone(), label.clone()),
                    None => CategoryValue::new(code.clone()),
                }
            })
            .collect();
        CategoryDomain::new(self.name.clone(), values)
    }

    fn from_domain(domain: &CategoryDomain) -> Self {
        let labels: HashMap<String, String> = domain
            .values
            .iter()
            .filter_map(|v| v.label.clone().map(|label| (v.code.clone(), label)))
            .collect();
        Self {
            name: domain.name.clone(),
            values: domain.values.iter().map(|v| v.code.clone()).collect(),
            labels: if labels.is_empty() { None } else { Some(labels) },
        }
    }
}

impl GrademixConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GrademixConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Category domains, falling back to grades/genders for absent sections.
    pub fn domains(&self) -> CategoryDomains {
        let defaults = CategoryDomains::default();
        let categories = self.categories.as_ref();
        CategoryDomains {
            primary: categories
                .and_then(|c| c.primary.as_ref())
                .map(CategoryConfig::to_domain)
                .unwrap_or(defaults.primary),
            secondary: categories
                .and_then(|c| c.secondary.as_ref())
                .map(CategoryConfig::to_domain)
                .unwrap_or(defaults.secondary),
        }
    }

    /// Grouping settings described by this file, or `None` if it declares
    /// neither grouping parameters nor constraints.
    pub fn settings(&self) -> Option<GroupingSettings> {
        if self.grouping.is_none() && self.pairings.is_none() && self.assignments.is_none() {
            return None;
        }

        let mut settings = GroupingSettings::default();
        if let Some(grouping) = &self.grouping {
            if let Some(names) = &grouping.group_names {
                settings.group_names = names.clone();
            }
            let num_groups = grouping
                .num_groups
                .or_else(|| grouping.group_names.as_ref().map(Vec::len))
                .unwrap_or(settings.num_groups);
            settings.set_num_groups(num_groups);
        }
        if let Some(pairings) = &self.pairings {
            settings.pair_constraints = pairings
                .iter()
                .map(|p| PairConstraint::new(p.members.iter().cloned()))
                .collect();
        }
        if let Some(assignments) = &self.assignments {
            settings.assign_constraints = assignments
                .iter()
                .map(|a| AssignConstraint::new(a.email.clone(), a.group))
                .collect();
        }
        Some(settings)
    }

    /// Scaffold a grademix.toml with the default domains and `num_groups` groups.
    pub fn scaffold(num_groups: usize) -> Self {
        let domains = CategoryDomains::default();
        let mut settings = GroupingSettings::default();
        settings.set_num_groups(num_groups);
        GrademixConfig {
            grouping: Some(GroupingConfig {
                num_groups: Some(settings.num_groups),
                group_names: Some(settings.group_names),
            }),
            categories: Some(CategoriesConfig {
                primary: Some(CategoryConfig::from_domain(&domains.primary)),
                secondary: Some(CategoryConfig::from_domain(&domains.secondary)),
            }),
            pairings: None,
            assignments: None,
        }
    }
}
