use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use rivervel_core::field::VelocityField;

use crate::summary::print_field_summary;

#[derive(Args)]
pub struct InfoArgs {
    /// Velocity field table (CSV)
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let field = VelocityField::load(&args.file)?;
    print_field_summary(&args.file, &field.summary(), field.columns());
    Ok(())
}
