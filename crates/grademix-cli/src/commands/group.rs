use std::path::Path;

use grademix_core::{CategoryDomain, CategoryDomains, Group};
use grademix_engine::{PartitionOutcome, PartitionRequest};
use tracing::{info, warn};

use super::Context;

/// Command-line overrides for one grouping run.
#[derive(Debug, Default)]
pub struct GroupOptions {
    pub groups: Option<usize>,
    pub names: Vec<String>,
    pub seed: Option<u64>,
}

pub fn run(
    ctx: &mut Context,
    options: &GroupOptions,
    format: &str,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let outcome = regroup(ctx, options)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        _ => {
            println!("{}", grademix_engine::format_outcome(&outcome));
        }
    }

    if let Some(out) = out {
        grademix_roster::write_grouped(out, &outcome.groups, &ctx.domains)?;
        println!("✓ Wrote {}", out.display());
    }
    Ok(())
}

/// Apply overrides, partition the session roster, and record the result
/// in the session, the history and the pair analytics.
pub fn regroup(ctx: &mut Context, options: &GroupOptions) -> anyhow::Result<PartitionOutcome> {
    if ctx.session.roster.is_empty() {
        anyhow::bail!("no roster loaded; run `grademix import <file>` first");
    }

    let settings = &mut ctx.session.settings;
    if !options.names.is_empty() {
        settings.group_names = options.names.clone();
        settings.set_num_groups(options.groups.unwrap_or(options.names.len()));
    } else if let Some(groups) = options.groups {
        settings.set_num_groups(groups);
    }

    let mut request = PartitionRequest::new(ctx.session.roster.clone(), settings.num_groups)
        .with_group_names(settings.resolved_names())
        .with_pairs(settings.pair_constraints.clone())
        .with_assignments(settings.assign_constraints.clone());
    if let Some(seed) = options.seed {
        request = request.with_seed(seed);
    }

    let outcome = grademix_engine::partition(&request, &ctx.domains)?;
    for violation in &outcome.violations {
        warn!(%violation, "group is missing a category value");
    }

    ctx.session.groups = Some(outcome.groups.clone());
    ctx.save()?;
    let entry = ctx.store.push_history(&outcome.groups, options.seed)?;
    ctx.store.track_grouping(&outcome.groups)?;

    info!(
        history_id = entry.id,
        groups = outcome.groups.len(),
        balanced = outcome.balanced,
        "grouping recorded"
    );
    Ok(outcome)
}

/// Plain listing of groups and their members.
pub fn format_groups(groups: &[Group], domains: &CategoryDomains) -> String {
    let mut out = String::new();
    for group in groups {
        out.push_str(&format!("{} ({})\n", group.name, group.members.len()));
        for member in &group.members {
            out.push_str(&format!(
                "  - {} <{}> [{}, {}]\n",
                member.display_name(),
                member.email,
                label_for(&domains.primary, &member.category_a),
                label_for(&domains.secondary, &member.category_b),
            ));
        }
    }
    out
}

fn label_for<'a>(domain: &'a CategoryDomain, code: &'a str) -> &'a str {
    domain.label_of(code).unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use grademix_core::{AssignConstraint, Individual};

    use super::*;
    use crate::commands::test_context;

    fn roster() -> Vec<Individual> {
        let mut individuals = Vec::new();
        for (i, grade) in ["9", "10", "11", "12"].iter().cycle().take(16).enumerate() {
            let gender = if i % 2 == 0 { "m" } else { "f" };
            individuals.push(Individual::new(
                format!("First{i}"),
                format!("Last{i}"),
                format!("p{i}@x.test"),
                *grade,
                gender,
            ));
        }
        individuals
    }

    #[test]
    fn regroup_requires_a_roster() {
        let mut ctx = test_context();
        assert!(regroup(&mut ctx, &GroupOptions::default()).is_err());
    }

    #[test]
    fn regroup_records_session_history_and_analytics() {
        let mut ctx = test_context();
        ctx.session.roster = roster();
        let options = GroupOptions {
            groups: Some(2),
            names: Vec::new(),
            seed: Some(7),
        };

        let outcome = regroup(&mut ctx, &options).unwrap();
        assert_eq!(outcome.groups.len(), 2);
        assert!(outcome.balanced);

        let stored = grademix_state::SessionStore::load(&ctx.store).unwrap();
        assert_eq!(stored.settings.num_groups, 2);
        assert_eq!(stored.groups, Some(outcome.groups.clone()));

        let history = ctx.store.list_history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].seed, Some(7));
        assert!(!ctx.store.pair_frequencies().unwrap().is_empty());
    }

    #[test]
    fn names_set_group_count_and_persist() {
        let mut ctx = test_context();
        ctx.session.roster = roster();
        ctx.session
            .settings
            .assign_constraints
            .push(AssignConstraint::new("p0@x.test", 2));
        let options = GroupOptions {
            groups: None,
            names: vec!["Red".into(), "Green".into(), "Blue".into()],
            seed: Some(1),
        };

        let outcome = regroup(&mut ctx, &options).unwrap();
        let names: Vec<&str> = outcome.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Red", "Green", "Blue"]);
        assert!(outcome.groups[2].members.iter().any(|m| m.email == "p0@x.test"));
        assert_eq!(ctx.session.settings.group_names, vec!["Red", "Green", "Blue"]);
    }

    #[test]
    fn same_seed_same_grouping() {
        let options = GroupOptions {
            groups: Some(3),
            names: Vec::new(),
            seed: Some(42),
        };
        let mut a = test_context();
        a.session.roster = roster();
        let mut b = test_context();
        b.session.roster = roster();
        assert_eq!(
            regroup(&mut a, &options).unwrap().groups,
            regroup(&mut b, &options).unwrap().groups
        );
    }

    #[test]
    fn listing_uses_primary_labels() {
        let mut group = Group::new("Red");
        group
            .members
            .push(Individual::new("Ada", "Lovelace", "ada@x.test", "9", "f"));
        let listing = format_groups(&[group], &CategoryDomains::default());
        assert!(listing.starts_with("Red (1)\n"));
        assert!(listing.contains("  - Ada Lovelace <ada@x.test> [9, female]"));
    }
}
