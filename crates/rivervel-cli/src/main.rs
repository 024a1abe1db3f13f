mod commands;
mod progress;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rivervel", about = "River surface velocity cross-section analysis")]
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
    /// Compute a meters-per-pixel factor from two image points
    Calibrate(commands::calibrate::CalibrateArgs),
    /// Show velocity field statistics
    Info(commands::info::InfoArgs),
    /// Sample and average one cross-section of a velocity field
    Analyze(commands::analyze::AnalyzeArgs),
    /// Run an analysis described by a config file
    Run(commands::run::RunArgs),
    /// Print a default analysis config
    Config(commands::config::ConfigArgs),
    /// Extract a velocity field from a video with an external program
    Flow(commands::flow::FlowArgs),
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
        Commands::Calibrate(args) => commands::calibrate::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Run(args) => commands::run::run(args),
        Commands::Config(args) => commands::config::run(args),
        Commands::Flow(args) => commands::flow::run(args),
    }
}
