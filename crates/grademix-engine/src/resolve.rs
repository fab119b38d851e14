//! Constraint resolution.
//!
//! Turns the raw assignment and pairing lists into a disjoint claim set
//! before any random distribution happens:
//! 1. Assignments claim first, in input order (first claim wins).
//! 2. Pairings claim second, over whatever is still unclaimed.
//! 3. Everything left over is available for general distribution.
//!
//! Nothing here fails. Unknown emails, out-of-range group indices and
//! already-claimed members are dropped and logged at debug level.

use std::collections::HashMap;

use grademix_core::{AssignConstraint, Individual, PairConstraint};
use tracing::debug;

/// An individual pinned to a group by an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClaim {
    /// Index into the population.
    pub individual: usize,
    pub group_index: usize,
}

/// Disjoint claim set produced by [`resolve_constraints`].
///
/// All values are indices into the population slice that was resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Unclaimed individuals, in population order.
    pub available: Vec<usize>,
    /// Assignment claims, in constraint order.
    pub fixed: Vec<FixedClaim>,
    /// Surviving pairing blocks, not yet bound to a group.
    pub blocks: Vec<Vec<usize>>,
}

impl Resolution {
    /// Number of individuals claimed by constraints.
    pub fn claimed(&self) -> usize {
        self.fixed.len() + self.blocks.iter().map(Vec::len).sum::<usize>()
    }
}

/// Resolve assignment and pairing constraints against `population`.
pub fn resolve_constraints(
    population: &[Individual],
    num_groups: usize,
    assignments: &[AssignConstraint],
    pairings: &[PairConstraint],
) -> Resolution {
    let by_email: HashMap<&str, usize> = population
        .iter()
        .enumerate()
        .map(|(i, ind)| (ind.email.as_str(), i))
        .collect();
    let mut claimed = vec![false; population.len()];
    let mut resolution = Resolution::default();

    for assignment in assignments {
        if assignment.group_index >= num_groups {
            debug!(
                email = %assignment.email,
                group_index = assignment.group_index,
                num_groups,
                "dropping assignment to out-of-range group"
            );
            continue;
        }
        let Some(&idx) = by_email.get(assignment.email.as_str()) else {
            debug!(email = %assignment.email, "dropping assignment for unknown individual");
            continue;
        };
        if claimed[idx] {
            debug!(email = %assignment.email, "dropping assignment for already-claimed individual");
            continue;
        }
        claimed[idx] = true;
        resolution.fixed.push(FixedClaim {
            individual: idx,
            group_index: assignment.group_index,
        });
    }

    for (n, pairing) in pairings.iter().enumerate() {
        let mut block = Vec::with_capacity(pairing.members.len());
        for email in &pairing.members {
            match by_email.get(email.as_str()) {
                Some(&idx) if !claimed[idx] => {
                    claimed[idx] = true;
                    block.push(idx);
                }
                Some(_) => debug!(pairing = n, %email, "pairing member already claimed"),
                None => debug!(pairing = n, %email, "pairing member not in population"),
            }
        }
        if block.is_empty() {
            debug!(pairing = n, "dropping pairing with no available members");
            continue;
        }
        resolution.blocks.push(block);
    }

    resolution.available = (0..population.len()).filter(|&i| !claimed[i]).collect();
    resolution
}
