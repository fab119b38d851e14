//! The grouping operation.
//!
//! `partition` runs three stages over one request and holds no state
//! between calls:
//!
//! ```text
//! resolve_constraints ──► place_constrained ──► distribute_balanced ──► audit_groups
//!   (claims)               (pins, blocks)        (bucket, shuffle, deal)   (report)
//! ```

use std::collections::HashSet;

use grademix_core::{
    AssignConstraint, CategoryDomains, Group, Individual, PairConstraint, resolve_group_names,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::audit::{BalanceReport, audit_groups};
use crate::distribute::distribute_balanced;
use crate::error::{EngineError, EngineResult};
use crate::placer::place_constrained;
use crate::resolve::resolve_constraints;

/// Inputs to one grouping operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionRequest {
    pub individuals: Vec<Individual>,
    pub num_groups: usize,
    /// May be shorter than `num_groups`; gaps get positional names.
    #[serde(default)]
    pub group_names: Vec<String>,
    #[serde(default)]
    pub pair_constraints: Vec<PairConstraint>,
    #[serde(default)]
    pub assign_constraints: Vec<AssignConstraint>,
    /// Absent means system randomness.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl PartitionRequest {
    pub fn new(individuals: Vec<Individual>, num_groups: usize) -> Self {
        Self {
            individuals,
            num_groups,
            group_names: Vec::new(),
            pair_constraints: Vec::new(),
            assign_constraints: Vec::new(),
            seed: None,
        }
    }

    pub fn with_group_names(mut self, names: Vec<String>) -> Self {
        self.group_names = names;
        self
    }

    pub fn with_pairs(mut self, pairs: Vec<PairConstraint>) -> Self {
        self.pair_constraints = pairs;
        self
    }

    pub fn with_assignments(mut self, assignments: Vec<AssignConstraint>) -> Self {
        self.assign_constraints = assignments;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Result of one grouping operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionOutcome {
    /// Exactly `num_groups` groups, in slot order.
    pub groups: Vec<Group>,
    pub balanced: bool,
    pub violations: Vec<String>,
    pub report: BalanceReport,
}

fn validate(request: &PartitionRequest, domains: &CategoryDomains) -> EngineResult<()> {
    if request.num_groups < 1 {
        return Err(EngineError::InvalidArgument(
            "num_groups must be at least 1".to_string(),
        ));
    }
    if domains.primary.is_empty() || domains.secondary.is_empty() {
        return Err(EngineError::InvalidArgument(
            "category domains must declare at least one value".to_string(),
        ));
    }
    let mut seen = HashSet::with_capacity(request.individuals.len());
    for individual in &request.individuals {
        if !seen.insert(individual.email.as_str()) {
            return Err(EngineError::InvalidArgument(format!(
                "duplicate individual email: {}",
                individual.email
            )));
        }
    }
    Ok(())
}

/// Partition `request.individuals` into balanced groups.
///
/// A fresh generator is built per call: seeded from `request.seed` when
/// present, otherwise from OS entropy.
pub fn partition(
    request: &PartitionRequest,
    domains: &CategoryDomains,
) -> EngineResult<PartitionOutcome> {
    let mut rng = match request.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    partition_with_rng(request, domains, &mut rng)
}

/// Same as [`partition`] with a caller-supplied randomness source.
/// `request.seed` is ignored.
pub fn partition_with_rng<R: Rng + ?Sized>(
    request: &PartitionRequest,
    domains: &CategoryDomains,
    rng: &mut R,
) -> EngineResult<PartitionOutcome> {
    validate(request, domains)?;

    let population = &request.individuals;
    let num_groups = request.num_groups;

    let resolution = resolve_constraints(
        population,
        num_groups,
        &request.assign_constraints,
        &request.pair_constraints,
    );

    let mut slots: Vec<Vec<usize>> = vec![Vec::new(); num_groups];
    place_constrained(&mut slots, &resolution);
    distribute_balanced(
        &mut slots,
        population,
        &resolution.available,
        &domains.primary,
        rng,
    );

    let groups: Vec<Group> = resolve_group_names(&request.group_names, num_groups)
        .into_iter()
        .zip(slots)
        .map(|(name, members)| Group {
            name,
            members: members.into_iter().map(|i| population[i].clone()).collect(),
        })
        .collect();

    let report = audit_groups(&groups, domains);
    let violations = report.violations();
    let balanced = report.is_balanced();

    info!(
        individuals = population.len(),
        groups = num_groups,
        constrained = resolution.claimed(),
        balanced,
        violations = violations.len(),
        "partition complete"
    );

    Ok(PartitionOutcome {
        groups,
        balanced,
        violations,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(email: &str, grade: &str, gender: &str) -> Individual {
        Individual::new("F", "L", email, grade, gender)
    }

    #[test]
    fn zero_groups_is_invalid() {
        let request = PartitionRequest::new(vec![person("a", "9", "m")], 0);
        let err = partition(&request, &CategoryDomains::default()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(_)));
    }

    #[test]
    fn duplicate_email_is_invalid() {
        let request = PartitionRequest::new(
            vec![person("a", "9", "m"), person("a", "10", "f")],
            2,
        );
        let err = partition(&request, &CategoryDomains::default()).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidArgument("duplicate individual email: a".to_string())
        );
    }

    #[test]
    fn empty_domain_is_invalid() {
        let mut domains = CategoryDomains::default();
        domains.secondary.values.clear();
        let request = PartitionRequest::new(vec![person("a", "9", "m")], 1);
        assert!(partition(&request, &domains).is_err());
    }

    #[test]
    fn empty_population_yields_empty_groups() {
        let request = PartitionRequest::new(Vec::new(), 3).with_seed(1);
        let outcome = partition(&request, &CategoryDomains::default()).unwrap();
        assert_eq!(outcome.groups.len(), 3);
        assert!(outcome.groups.iter().all(Group::is_empty));
        assert!(!outcome.balanced);
        assert_eq!(outcome.violations.len(), 6);
    }

    #[test]
    fn group_names_are_resolved() {
        let request = PartitionRequest::new(vec![person("a", "9", "m")], 3)
            .with_group_names(vec!["Red".to_string()])
            .with_seed(3);
        let outcome = partition(&request, &CategoryDomains::default()).unwrap();
        let names: Vec<&str> = outcome.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Red", "Group 2", "Group 3"]);
    }

    #[test]
    fn constrained_members_reduce_general_share() {
        // Two grade-9 students pinned to group 0; four more grade-9 students
        // are dealt round-robin afterwards.
        let pop: Vec<Individual> = (0..6).map(|i| person(&format!("p{i}"), "9", "m")).collect();
        let request = PartitionRequest::new(pop, 2)
            .with_assignments(vec![
                AssignConstraint::new("p0", 0),
                AssignConstraint::new("p1", 0),
            ])
            .with_seed(11);
        let outcome = partition(&request, &CategoryDomains::default()).unwrap();
        assert_eq!(outcome.groups[0].len(), 4);
        assert_eq!(outcome.groups[1].len(), 2);
        assert_eq!(outcome.groups[0].members[0].email, "p0");
        assert_eq!(outcome.groups[0].members[1].email, "p1");
    }
}
