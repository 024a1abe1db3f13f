use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use rivervel_core::consts::DEFAULT_PROFILE_RESOLUTION;
use rivervel_core::pipeline::config::{AnalysisConfig, EndpointSource};
use rivervel_core::pipeline::run_analysis;
use rivervel_core::point::Point2;
use rivervel_core::section::{SamplerConfig, UnresolvedPolicy};

use crate::progress::StageBar;
use crate::summary::print_analysis_summary;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Velocity field table (CSV)
    pub field: PathBuf,

    /// Cross-section start in meters, as x,y
    #[arg(long, allow_hyphen_values = true, requires = "to", conflicts_with = "points")]
    pub from: Option<Point2>,

    /// Cross-section end in meters, as x,y
    #[arg(long, allow_hyphen_values = true, requires = "from")]
    pub to: Option<Point2>,

    /// Reuse the endpoints of a previous selected_points.csv
    #[arg(long)]
    pub points: Option<PathBuf>,

    /// Number of sections to average over
    #[arg(short, long, default_value = "1")]
    pub sections: usize,

    /// Number of samples along the cross-section
    #[arg(long, default_value_t = DEFAULT_PROFILE_RESOLUTION)]
    pub resolution: usize,

    /// Keep samples no interpolator could resolve instead of failing
    #[arg(long)]
    pub allow_unresolved: bool,

    /// Existing directory the result tables are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,
}

pub fn run(args: &AnalyzeArgs) -> Result<()> {
    let endpoints = match (args.from, args.to, &args.points) {
        (Some(from), Some(to), _) => EndpointSource::Points { from, to },
        (_, _, Some(path)) => EndpointSource::File(path.clone()),
        _ => bail!("Select two endpoints with --from/--to or --points"),
    };

    let config = AnalysisConfig {
        field: args.field.clone(),
        output_dir: args.output_dir.clone(),
        sections: args.sections,
        endpoints,
        sampling: SamplerConfig {
            resolution: args.resolution,
            unresolved: if args.allow_unresolved {
                UnresolvedPolicy::Flag
            } else {
                UnresolvedPolicy::Fail
            },
        },
    };
    execute(&config)
}

/// Run a full analysis with a progress bar and print the summary.
pub fn execute(config: &AnalysisConfig) -> Result<()> {
    let bar = StageBar::new()?;
    let output = match run_analysis(config, &bar) {
        Ok(output) => {
            bar.finish();
            output
        }
        Err(e) => {
            bar.abandon();
            return Err(e.into());
        }
    };

    print_analysis_summary(config, &output);
    Ok(())
}
