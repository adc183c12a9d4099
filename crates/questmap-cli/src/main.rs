use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "questmap-cli", version, about = "Questmap CLI")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a curriculum document for structural defects
    Validate {
        #[command(flatten)]
        tree: commands::inputs::TreeArg,
    },
    /// Resolved status of every subtopic, or module roll-ups
    Status(commands::curriculum::StatusArgs),
    /// Overall completion counts
    Progress(commands::curriculum::ProgressArgs),
    /// Day-by-day study plan
    Plan(commands::curriculum::PlanArgs),
    /// Quest map nodes, edges and current position
    Map(commands::curriculum::MapArgs),
    /// Every derived view at once
    Derive(commands::curriculum::DeriveArgs),
    /// Spaced-repetition review queue
    Review(commands::review::ReviewArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Validate { tree } => commands::curriculum::validate(tree),
        Commands::Status(args) => commands::curriculum::status(args),
        Commands::Progress(args) => commands::curriculum::progress(args),
        Commands::Plan(args) => commands::curriculum::plan(args),
        Commands::Map(args) => commands::curriculum::map(args),
        Commands::Derive(args) => commands::curriculum::derive(args),
        Commands::Review(args) => commands::review::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
