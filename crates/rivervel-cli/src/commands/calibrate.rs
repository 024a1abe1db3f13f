use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rivervel_core::calibration::CalibrationModel;
use rivervel_core::context::SharedContext;
use rivervel_core::point::Point2;

use crate::summary::print_calibration;

#[derive(Args)]
pub struct CalibrateArgs {
    /// First reference point in image pixels, as x,y
    #[arg(long, allow_hyphen_values = true)]
    pub a: Point2,

    /// Second reference point in image pixels, as x,y
    #[arg(long, allow_hyphen_values = true)]
    pub b: Point2,

    /// Real distance between the two points in meters
    #[arg(long, allow_hyphen_values = true)]
    pub distance: String,

    /// Calibration image; its size is reported in meters
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Save the calibration as TOML
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &CalibrateArgs) -> Result<()> {
    let mut calibration = CalibrationModel::new();
    calibration.set_from_str(args.a, args.b, &args.distance)?;

    let mut ctx = SharedContext::with_calibration(calibration);
    ctx.saved_frame_path = args.image.clone();
    let extent = ctx
        .frame_extent()
        .context("Failed to read calibration image")?;
    let calibration = ctx.calibration();
    print_calibration(calibration, extent.as_ref());

    if let Some(ref path) = args.output {
        let toml_str = toml::to_string_pretty(calibration)?;
        std::fs::write(path, toml_str)
            .with_context(|| format!("Failed to write calibration to {}", path.display()))?;
        println!("Calibration saved to {}", path.display());
    }

    Ok(())
}
