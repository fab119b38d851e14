use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(
    name = "grademix",
    about = "GradeMix — balanced group maker",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Path to the state database
    #[arg(long, global = true, default_value = "grademix.redb")]
    state: PathBuf,
    /// Optional grademix.toml with category domains and grouping settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a grademix.toml scaffold
    Init {
        /// Directory to write into (default: current directory)
        #[arg(short, long, default_value = ".")]
        path: String,
        #[arg(short, long, default_value_t = 4)]
        groups: usize,
    },
    #[command(flatten)]
    Session(SessionCommand),
}

/// Commands that work on the state database.
#[derive(Subcommand)]
enum SessionCommand {
    /// Replace the roster with the contents of a CSV file.
    ///
    /// Expected columns after a header row:
    /// categoryA,categoryB,first,last,email
    Import {
        roster: PathBuf,
    },
    /// Partition the roster into balanced groups
    Group {
        /// Number of groups (persisted)
        #[arg(short, long)]
        groups: Option<usize>,
        /// Group name, repeat once per group in order (persisted)
        #[arg(short, long = "name")]
        names: Vec<String>,
        /// Seed for a reproducible grouping
        #[arg(short, long)]
        seed: Option<u64>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
        /// Also write the grouping as CSV
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Write the last grouping as CSV
    Export {
        out: PathBuf,
    },
    /// Rename a group of the last grouping (numbers start at 1)
    Rename {
        group: usize,
        name: String,
    },
    /// Keep individuals together in one group
    Pair {
        #[arg(num_args = 2.., required = true)]
        emails: Vec<String>,
    },
    /// Pin an individual to a group (numbers start at 1)
    Assign {
        email: String,
        group: usize,
    },
    /// Inspect or clear pair and assign constraints
    Constraints {
        #[command(subcommand)]
        action: ConstraintsAction,
    },
    /// Past groupings
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// How often individuals have shared a group
    Analytics {
        #[arg(short, long, default_value_t = 10)]
        top: usize,
        /// Forget all recorded pairings
        #[arg(long)]
        reset: bool,
    },
    /// Restore default settings and drop the last grouping
    Reset,
}

#[derive(Subcommand)]
enum ConstraintsAction {
    List,
    Clear,
}

#[derive(Subcommand)]
enum HistoryAction {
    List,
    Show { id: u64 },
    /// Make a past grouping the current one
    Restore { id: u64 },
    Remove { id: u64 },
    Clear,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("grademix=info".parse()?)
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path, groups } => commands::session::init(&path, groups),
        Commands::Session(command) => {
            let mut ctx = Context::open(&cli.state, cli.config.as_deref())?;
            dispatch(&mut ctx, command)
        }
    }
}

fn dispatch(ctx: &mut Context, command: SessionCommand) -> anyhow::Result<()> {
    match command {
        SessionCommand::Import { roster } => commands::session::import(ctx, &roster),
        SessionCommand::Group { groups, names, seed, format, out } => {
            let options = commands::group::GroupOptions { groups, names, seed };
            commands::group::run(ctx, &options, &format, out.as_deref())
        }
        SessionCommand::Export { out } => commands::session::export(ctx, &out),
        SessionCommand::Rename { group, name } => commands::session::rename(ctx, group, &name),
        SessionCommand::Pair { emails } => commands::constraints::pair(ctx, emails),
        SessionCommand::Assign { email, group } => {
            commands::constraints::assign(ctx, email, group)
        }
        SessionCommand::Constraints { action } => match action {
            ConstraintsAction::List => commands::constraints::list(ctx),
            ConstraintsAction::Clear => commands::constraints::clear(ctx),
        },
        SessionCommand::History { action } => match action {
            HistoryAction::List => commands::history::list(ctx),
            HistoryAction::Show { id } => commands::history::show(ctx, id),
            HistoryAction::Restore { id } => commands::history::restore(ctx, id),
            HistoryAction::Remove { id } => commands::history::remove(ctx, id),
            HistoryAction::Clear => commands::history::clear(ctx),
        },
        SessionCommand::Analytics { top, reset } => {
            if reset {
                commands::analytics::reset(ctx)
            } else {
                commands::analytics::show(ctx, top)
            }
        }
        SessionCommand::Reset => commands::session::reset(ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_parses_without_state() {
        let cli = Cli::try_parse_from(["grademix", "init", "--groups", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::Init { groups: 3, .. }));
    }

    #[test]
    fn session_commands_are_flattened() {
        let cli = Cli::try_parse_from(["grademix", "history", "restore", "7"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Session(SessionCommand::History {
                action: HistoryAction::Restore { id: 7 }
            })
        ));

        let cli = Cli::try_parse_from(["grademix", "--state", "x.redb", "reset"]).unwrap();
        assert_eq!(cli.state, PathBuf::from("x.redb"));
        assert!(matches!(cli.command, Commands::Session(SessionCommand::Reset)));
    }
}
