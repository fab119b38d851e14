use std::path::Path;

use grademix_core::{rename_group, GrademixConfig, GroupingSettings};

use super::{group_index, Context};

pub fn init(path: &str, groups: usize) -> anyhow::Result<()> {
    if groups < 1 {
        anyhow::bail!("at least one group is required");
    }
    let output = Path::new(path).join("grademix.toml");
    if output.exists() {
        anyhow::bail!("{} already exists", output.display());
    }
    std::fs::write(&output, GrademixConfig::scaffold(groups).to_toml_string()?)?;
    println!("✓ Generated {}", output.display());
    Ok(())
}

pub fn import(ctx: &mut Context, roster: &Path) -> anyhow::Result<()> {
    let imported = grademix_roster::read_roster(roster)?;
    let count = imported.individuals.len();
    ctx.session.roster = imported.individuals;
    ctx.session.groups = None;
    ctx.save()?;

    println!("✓ Imported {count} individuals from {}", roster.display());
    if !imported.skipped.is_empty() {
        let lines: Vec<String> = imported.skipped.iter().map(ToString::to_string).collect();
        println!("  Skipped malformed lines: {}", lines.join(", "));
    }
    Ok(())
}

pub fn export(ctx: &Context, out: &Path) -> anyhow::Result<()> {
    let Some(groups) = &ctx.session.groups else {
        anyhow::bail!("nothing to export; run `grademix group` first");
    };
    grademix_roster::write_grouped(out, groups, &ctx.domains)?;
    println!("✓ Wrote {}", out.display());
    Ok(())
}

pub fn rename(ctx: &mut Context, number: usize, name: &str) -> anyhow::Result<()> {
    let index = group_index(number)?;
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("group name must not be blank");
    }

    let settings = &mut ctx.session.settings;
    if index >= settings.num_groups {
        anyhow::bail!(
            "group {number} does not exist ({} groups configured)",
            settings.num_groups
        );
    }
    if let Some(groups) = ctx.session.groups.as_mut() {
        rename_group(groups, index, name)?;
    }
    settings.set_num_groups(settings.num_groups);
    settings.group_names[index] = name.to_string();
    ctx.save()?;

    println!("✓ Group {number} is now \"{name}\"");
    Ok(())
}

pub fn reset(ctx: &mut Context) -> anyhow::Result<()> {
    ctx.session.settings = GroupingSettings::default();
    ctx.session.groups = None;
    ctx.save()?;
    println!("✓ Settings restored to defaults");
    Ok(())
}
