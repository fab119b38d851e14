use super::Context;

pub fn show(ctx: &Context, top: usize) -> anyhow::Result<()> {
    let frequencies = ctx.store.pair_frequencies()?;
    if frequencies.is_empty() {
        println!("No groupings recorded yet.");
        return Ok(());
    }

    println!("Most frequent pairings:");
    for (rank, pair) in frequencies.iter().take(top).enumerate() {
        println!(
            "  {:>2}. {} & {} — {} time{}",
            rank + 1,
            pair.first,
            pair.second,
            pair.count,
            if pair.count == 1 { "" } else { "s" }
        );
    }
    Ok(())
}

pub fn reset(ctx: &Context) -> anyhow::Result<()> {
    let removed = ctx.store.reset_analytics()?;
    println!("✓ Forgot {removed} pairing record(s)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use grademix_core::{Group, Individual};

    use super::*;
    use crate::commands::test_context;

    #[test]
    fn reset_forgets_tracked_pairs() {
        let ctx = test_context();
        let mut group = Group::new("A");
        group
            .members
            .push(Individual::new("Ada", "Lovelace", "ada@x.test", "9", "f"));
        group
            .members
            .push(Individual::new("Alan", "Turing", "alan@x.test", "10", "m"));
        ctx.store.track_grouping(&[group]).unwrap();

        show(&ctx, 5).unwrap();
        assert_eq!(ctx.store.pair_frequencies().unwrap().len(), 1);
        reset(&ctx).unwrap();
        assert!(ctx.store.pair_frequencies().unwrap().is_empty());
    }
}
