//! Human-readable outcome formatting.

use crate::partition::PartitionOutcome;

pub fn format_outcome(outcome: &PartitionOutcome) -> String {
    let mut out = String::new();
    let total: usize = outcome.groups.iter().map(|g| g.len()).sum();
    let status = if outcome.balanced { "BALANCED" } else { "UNBALANCED" };

    out.push_str("\n╔══════════════════════════════════════════╗\n");
    out.push_str("║  GradeMix Groups                         ║\n");
    out.push_str("╠══════════════════════════════════════════╣\n");
    out.push_str(&format!("║  Groups:      {:<27}║\n", outcome.groups.len()));
    out.push_str(&format!("║  Individuals: {:<27}║\n", total));
    out.push_str(&format!("║  Status:      {:<27}║\n", status));
    out.push_str("╚══════════════════════════════════════════╝\n\n");

    for (i, group) in outcome.groups.iter().enumerate() {
        out.push_str(&format!("{}. {} ({} members)\n", i + 1, group.name, group.len()));
        for m in &group.members {
            out.push_str(&format!(
                "     {:<24} {:>4}  {:<2} {}\n",
                m.display_name(),
                m.category_a,
                m.category_b,
                m.email
            ));
        }
        out.push('\n');
    }

    if !outcome.violations.is_empty() {
        out.push_str(&format!(
            "⚠️  BALANCE WARNINGS ({}):\n\n",
            outcome.violations.len()
        ));
        for v in &outcome.violations {
            out.push_str(&format!("  • {v}\n"));
        }
        out.push('\n');
    }

    out
}
