mod commands;
mod scene;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pafgrouper", about = "Multi-person 2D pose grouping engine")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group a frame's peaks into instances using a PAF stack
    Group(commands::group::GroupArgs),
    /// Show a skeleton configuration's resolved nodes and edges
    Info(commands::info::InfoArgs),
    /// Print an example skeleton configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Group(args) => commands::group::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Config => commands::config::run(),
    }
}
