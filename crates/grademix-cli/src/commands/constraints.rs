use grademix_core::{AssignConstraint, PairConstraint};
use tracing::warn;

use super::{group_index, Context};

pub fn pair(ctx: &mut Context, emails: Vec<String>) -> anyhow::Result<()> {
    let mut members: Vec<String> = Vec::with_capacity(emails.len());
    for email in emails {
        let email = email.trim().to_string();
        if !email.is_empty() && !members.contains(&email) {
            members.push(email);
        }
    }
    if members.len() < 2 {
        anyhow::bail!("a pair needs at least two distinct emails");
    }
    for email in &members {
        if !ctx.session.roster.iter().any(|i| &i.email == email) {
            warn!(%email, "not on the current roster; it will be ignored when grouping");
        }
    }

    let count = members.len();
    ctx.session
        .settings
        .pair_constraints
        .push(PairConstraint::new(members));
    ctx.save()?;
    println!("✓ Pair constraint added ({count} members)");
    Ok(())
}

/// Pin `email` to a group, replacing any earlier assignment for it.
pub fn assign(ctx: &mut Context, email: String, number: usize) -> anyhow::Result<()> {
    let index = group_index(number)?;
    let email = email.trim().to_string();
    if email.is_empty() {
        anyhow::bail!("email must not be blank");
    }

    let settings = &mut ctx.session.settings;
    if index >= settings.num_groups {
        warn!(
            group = number,
            num_groups = settings.num_groups,
            "group does not exist yet; the assignment is ignored until it does"
        );
    }
    settings.assign_constraints.retain(|a| a.email != email);
    settings
        .assign_constraints
        .push(AssignConstraint::new(email.clone(), index));
    ctx.save()?;
    println!("✓ {email} assigned to group {number}");
    Ok(())
}

pub fn list(ctx: &Context) -> anyhow::Result<()> {
    let settings = &ctx.session.settings;
    let names = settings.resolved_names();

    if settings.pair_constraints.is_empty() && settings.assign_constraints.is_empty() {
        println!("No constraints.");
        return Ok(());
    }

    if !settings.pair_constraints.is_empty() {
        println!("Pairs:");
        for (i, pair) in settings.pair_constraints.iter().enumerate() {
            println!("  {}. {}", i + 1, pair.members.join(" + "));
        }
    }
    if !settings.assign_constraints.is_empty() {
        println!("Assignments:");
        for assign in &settings.assign_constraints {
            let name = names
                .get(assign.group_index)
                .map(String::as_str)
                .unwrap_or("(no such group)");
            println!("  {} → {} ({})", assign.email, assign.group_index + 1, name);
        }
    }
    Ok(())
}

pub fn clear(ctx: &mut Context) -> anyhow::Result<()> {
    let settings = &mut ctx.session.settings;
    let pairs = settings.pair_constraints.len();
    let assigns = settings.assign_constraints.len();
    settings.pair_constraints.clear();
    settings.assign_constraints.clear();
    ctx.save()?;
    println!("✓ Cleared {pairs} pair(s) and {assigns} assignment(s)");
    Ok(())
}
