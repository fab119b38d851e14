//! Placement of constrained individuals.
//!
//! Runs before general distribution so that pre-loaded groups take a
//! smaller share of what comes after:
//! 1. Assignment claims go verbatim to their pinned group.
//! 2. Each pairing block goes, whole, to the currently smallest group.

use tracing::debug;

use crate::resolve::{FixedClaim, Resolution};

/// Index of the group with the fewest members. Ties go to the lowest index.
///
/// Returns `None` only when there are no groups.
pub fn smallest_group(slots: &[Vec<usize>]) -> Option<usize> {
    slots
        .iter()
        .enumerate()
        .min_by_key(|(i, members)| (members.len(), *i))
        .map(|(i, _)| i)
}

/// Place every fixed claim into its pinned group.
///
/// Claims were range-checked during resolution; any that still fall
/// outside `slots` are skipped.
pub fn place_fixed(slots: &mut [Vec<usize>], fixed: &[FixedClaim]) {
    for claim in fixed {
        if let Some(slot) = slots.get_mut(claim.group_index) {
            slot.push(claim.individual);
        }
    }
}

/// Place each block atomically into the smallest group at the time it is placed.
pub fn place_blocks(slots: &mut [Vec<usize>], blocks: &[Vec<usize>]) {
    for block in blocks {
        let Some(target) = smallest_group(slots) else {
            return;
        };
        slots[target].extend_from_slice(block);
        debug!(group = target, size = block.len(), "placed pairing block");
    }
}

/// Place all constrained individuals from a resolution.
pub fn place_constrained(slots: &mut [Vec<usize>], resolution: &Resolution) {
    place_fixed(slots, &resolution.fixed);
    place_blocks(slots, &resolution.blocks);
}
