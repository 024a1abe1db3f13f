use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rivervel_core::calibration::CalibrationModel;
use rivervel_core::context::SharedContext;
use rivervel_core::flow::{CommandExtractor, FlowConfig, FlowEvent, FlowRequest, FlowRunner};
use rivervel_core::pipeline::config::{AnalysisConfig, EndpointSource};
use rivervel_core::point::Point2;
use tracing::info;

use super::analyze::execute;

#[derive(Args)]
pub struct FlowArgs {
    /// Input video
    pub video: PathBuf,

    /// Calibration file written by `rivervel calibrate`
    #[arg(long)]
    pub calibration: PathBuf,

    /// Extractor config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Extractor program, overriding the config
    #[arg(long)]
    pub program: Option<String>,

    /// First frame of the analysis window
    #[arg(long)]
    pub start_frame: Option<usize>,

    /// Upper bound of the velocity range in m/s
    #[arg(long)]
    pub vlim: Option<f64>,

    /// Video frame rate
    #[arg(long)]
    pub fps: Option<f64>,

    /// Working directory the extractor runs in
    #[arg(long, default_value = ".")]
    pub workdir: PathBuf,

    /// Directory the resulting velocity_field.csv is moved to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Analyze the extracted field from this point, in meters as x,y
    #[arg(long, allow_hyphen_values = true, requires = "to")]
    pub from: Option<Point2>,

    /// Analyze the extracted field up to this point, in meters as x,y
    #[arg(long, allow_hyphen_values = true, requires = "from")]
    pub to: Option<Point2>,

    /// Existing directory the analysis tables are written to
    #[arg(long)]
    pub save_dir: Option<PathBuf>,
}

pub fn run(args: &FlowArgs) -> Result<()> {
    let mut config = match args.config {
        Some(ref path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str::<FlowConfig>(&contents).context("Invalid flow config")?
        }
        None => FlowConfig::default(),
    };
    if let Some(ref program) = args.program {
        config.program = program.clone();
    }
    if let Some(start) = args.start_frame {
        config.params.start_frame = start;
    }
    if let Some(vlim) = args.vlim {
        config.params.velocity_limit = vlim;
    }
    if let Some(fps) = args.fps {
        config.params.frames_per_second = fps;
    }

    let contents = std::fs::read_to_string(&args.calibration)
        .with_context(|| format!("Failed to read calibration {}", args.calibration.display()))?;
    let calibration: CalibrationModel =
        toml::from_str(&contents).context("Invalid calibration file")?;

    let mut ctx = SharedContext::with_calibration(calibration);
    ctx.video_path = Some(args.video.clone());
    ctx.optical_flow_output_dir = args.output_dir.clone();
    ctx.save_dir = args.save_dir.clone();
    let request = FlowRequest::from_context(&ctx, config.params.clone())?;

    let runner = FlowRunner::new(
        Arc::new(CommandExtractor::from_config(&config)),
        args.workdir.clone(),
    );
    let (handle, events) = runner.spawn_channel(request)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg} [{elapsed}]")?);
    spinner.enable_steady_tick(Duration::from_millis(100));

    for event in events {
        match event {
            FlowEvent::Started { video } => {
                spinner.set_message(format!("Running {} on {}", config.program, video.display()));
            }
            FlowEvent::Completed { elapsed, .. } => {
                spinner.finish_with_message(format!("Done in {:.1}s", elapsed.as_secs_f64()));
            }
            FlowEvent::Failed { message } => {
                spinner.abandon_with_message(message);
            }
        }
    }

    let csv = handle.wait()?;
    println!("\nVelocity field saved to {}", csv.display());
    ctx.optical_flow_csv = Some(csv);

    if let (Some(from), Some(to)) = (args.from, args.to) {
        let config = AnalysisConfig::from_context(&ctx, EndpointSource::Points { from, to })?;
        info!(
            field = %config.field.display(),
            dir = %config.output_dir.display(),
            "Analyzing extracted field"
        );
        println!();
        execute(&config)?;
    }

    Ok(())
}
