//! Category-balanced distribution.
//!
//! Available individuals are bucketed by primary category, each bucket is
//! shuffled (Fisher–Yates via [`SliceRandom::shuffle`]), and buckets are
//! dealt round-robin across groups in domain order. Every group therefore
//! receives ⌊n/k⌋ or ⌈n/k⌉ members of each category value.

use grademix_core::{CategoryDomain, Individual};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

/// Individuals sharing one primary category value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// Category code, or `None` for values outside the domain.
    pub code: Option<String>,
    /// Indices into the population.
    pub members: Vec<usize>,
}

/// Split `available` into one bucket per domain value, in domain order.
///
/// Empty buckets are kept. Individuals whose value is not in the domain
/// are collected into a trailing unclassified bucket, present only when
/// non-empty.
pub fn bucket_by_category(
    population: &[Individual],
    available: &[usize],
    domain: &CategoryDomain,
) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = domain
        .values
        .iter()
        .map(|v| Bucket {
            code: Some(v.code.clone()),
            members: Vec::new(),
        })
        .collect();
    let mut unclassified = Vec::new();

    for &idx in available {
        let individual = &population[idx];
        match domain.position(&individual.category_a) {
            Some(pos) => buckets[pos].members.push(idx),
            None => unclassified.push(idx),
        }
    }

    if !unclassified.is_empty() {
        warn!(
            count = unclassified.len(),
            domain = %domain.name,
            "individuals outside the category domain; distributing them last"
        );
        buckets.push(Bucket {
            code: None,
            members: unclassified,
        });
    }
    buckets
}

/// Shuffle every bucket with `rng`, in bucket order.
pub fn shuffle_buckets<R: Rng + ?Sized>(buckets: &mut [Bucket], rng: &mut R) {
    for bucket in buckets.iter_mut() {
        bucket.members.shuffle(rng);
    }
}

/// Deal each bucket round-robin across `slots`, restarting at group 0 for
/// every bucket.
pub fn deal_round_robin(slots: &mut [Vec<usize>], buckets: &[Bucket]) {
    let count = slots.len();
    if count == 0 {
        return;
    }
    for bucket in buckets.iter().filter(|b| !b.members.is_empty()) {
        for (position, &idx) in bucket.members.iter().enumerate() {
            slots[position % count].push(idx);
        }
        debug!(
            code = bucket.code.as_deref().unwrap_or("<unclassified>"),
            dealt = bucket.members.len(),
            "bucket distributed"
        );
    }
}

/// Bucket, shuffle and deal the available population.
pub fn distribute_balanced<R: Rng + ?Sized>(
    slots: &mut [Vec<usize>],
    population: &[Individual],
    available: &[usize],
    domain: &CategoryDomain,
    rng: &mut R,
) {
    let mut buckets = bucket_by_category(population, available, domain);
    shuffle_buckets(&mut buckets, rng);
    deal_round_robin(slots, &buckets);
}
