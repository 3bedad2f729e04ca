mod cmd;
mod output;
mod settings;

use clap::{Parser, Subcommand};
use cmd::{actions::ActionsArgs, fields::FieldsArgs, gantt::GanttArgs, serve::ServeArgs};
use settings::StoreArgs;

#[derive(Parser)]
#[command(
    name = "gantt",
    about = "Roadmap Gantt dashboard over an Airtable base: milestones, Director View actions, field mapping",
    version,
    propagate_version = true
)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate every table and show what was loaded
    Dashboard,

    /// Milestone timeline with filters, grouping and bar layout
    Gantt(GanttArgs),

    /// Director View actions, grouped and ordered by deadline
    Actions(ActionsArgs),

    /// Show the effective field map
    Fields(FieldsArgs),

    /// Serve the dashboard API over HTTP
    Serve(ServeArgs),
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve(_) => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Dashboard => cmd::dashboard::run(&cli.store, cli.json),
        Commands::Gantt(args) => cmd::gantt::run(&cli.store, args, cli.json),
        Commands::Actions(args) => cmd::actions::run(&cli.store, args, cli.json),
        Commands::Fields(args) => cmd::fields::run(&cli.store, args, cli.json),
        Commands::Serve(args) => cmd::serve::run(&cli.store, args),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
