use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rivervel_core::pipeline::config::AnalysisConfig;

use super::analyze::execute;

#[derive(Args)]
pub struct RunArgs {
    /// Analysis config file (TOML)
    pub config: PathBuf,

    /// Override the configured output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let contents = std::fs::read_to_string(&args.config)
        .with_context(|| format!("Failed to read config {}", args.config.display()))?;
    let mut config: AnalysisConfig = toml::from_str(&contents).context("Invalid analysis config")?;
    if let Some(ref dir) = args.output_dir {
        config.output_dir = dir.clone();
    }
    execute(&config)
}
