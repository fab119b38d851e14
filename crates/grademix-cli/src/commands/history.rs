use super::group::format_groups;
use super::Context;

pub fn list(ctx: &Context) -> anyhow::Result<()> {
    let entries = ctx.store.list_history()?;
    if entries.is_empty() {
        println!("No history.");
        return Ok(());
    }

    println!("{:<6} {:<12} {:<8} {:<8} {}", "ID", "TIMESTAMP", "GROUPS", "PEOPLE", "SEED");
    for entry in entries {
        let people: usize = entry.groups.iter().map(|g| g.len()).sum();
        let seed = entry.seed.map_or_else(|| "-".to_string(), |s| s.to_string());
        println!(
            "{:<6} {:<12} {:<8} {:<8} {}",
            entry.id,
            entry.timestamp,
            entry.groups.len(),
            people,
            seed
        );
    }
    Ok(())
}

pub fn show(ctx: &Context, id: u64) -> anyhow::Result<()> {
    let Some(entry) = ctx.store.get_history(id)? else {
        anyhow::bail!("history entry {id} not found");
    };
    println!("Grouping #{} (timestamp {})", entry.id, entry.timestamp);
    if let Some(seed) = entry.seed {
        println!("Seed: {seed}");
    }
    println!();
    print!("{}", format_groups(&entry.groups, &ctx.domains));
    Ok(())
}

/// Make a past grouping the session's current one. The engine is not rerun.
pub fn restore(ctx: &mut Context, id: u64) -> anyhow::Result<()> {
    let Some(entry) = ctx.store.get_history(id)? else {
        anyhow::bail!("history entry {id} not found");
    };
    let count = entry.groups.len();
    ctx.session.groups = Some(entry.groups);
    ctx.save()?;
    tracing::info!(id, groups = count, "history entry restored");
    println!("✓ Restored grouping #{id} ({count} groups)");
    Ok(())
}

pub fn remove(ctx: &Context, id: u64) -> anyhow::Result<()> {
    if !ctx.store.remove_history(id)? {
        anyhow::bail!("history entry {id} not found");
    }
    println!("✓ Removed history entry {id}");
    Ok(())
}

pub fn clear(ctx: &Context) -> anyhow::Result<()> {
    let removed = ctx.store.clear_history()?;
    println!("✓ Cleared {removed} history entr{}", if removed == 1 { "y" } else { "ies" });
    Ok(())
}
