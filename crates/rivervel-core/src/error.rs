use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VelocityError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid calibration: {0}")]
    InvalidCalibration(String),

    #[error("Calibration factor not set")]
    NotCalibrated,

    #[error("Missing column {field} (tried: {})", tried.join(", "))]
    MissingColumn {
        field: &'static str,
        tried: Vec<&'static str>,
    },

    #[error("Malformed row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("Interpolation undefined at sample {index} ({x}, {y})")]
    Interpolation { index: usize, x: f64, y: f64 },

    #[error("Invalid section count {requested} for a profile of {samples} samples")]
    InvalidSectionCount { requested: usize, samples: usize },

    #[error("Invalid sampling resolution: {0}")]
    InvalidResolution(usize),

    #[error("Expected at least two points, found {found}")]
    InsufficientPoints { found: usize },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No video selected")]
    MissingVideo,

    #[error("No velocity field has been extracted yet")]
    MissingVelocityField,

    #[error("An optical flow extraction is already running")]
    FlowBusy,

    #[error("Optical flow extraction failed: {0}")]
    Flow(String),
}

pub type Result<T> = std::result::Result<T, VelocityError>;
