use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, VelocityError};
use crate::point::Point2;

/// Two pixel points picked on a calibration image plus the real distance
/// between them, in meters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoints {
    pub a: Point2,
    pub b: Point2,
    pub real_distance: f64,
}

impl CalibrationPoints {
    pub fn pixel_distance(&self) -> f64 {
        self.a.distance(&self.b)
    }
}

/// Display extent of an image in meters: `[x_min, x_max, y_min, y_max]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricExtent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl MetricExtent {
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn contains(&self, p: &Point2) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
    }
}

/// Meters-per-pixel calibration. Unset until [`CalibrationModel::set`]
/// succeeds; re-setting overwrites.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scale_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    points: Option<CalibrationPoints>,
}

impl CalibrationModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calibrate from two pixel points and the real distance between them.
    ///
    /// On failure the previous calibration (if any) is left untouched.
    pub fn set(&mut self, a: Point2, b: Point2, real_distance: f64) -> Result<f64> {
        if !a.is_finite() || !b.is_finite() {
            return Err(VelocityError::InvalidCalibration(
                "calibration points must be finite".into(),
            ));
        }
        let pixel_distance = a.distance(&b);
        if pixel_distance == 0.0 {
            return Err(VelocityError::InvalidCalibration(format!(
                "calibration points coincide at {a}"
            )));
        }
        if !(pixel_distance.is_finite() && pixel_distance > 0.0) {
            return Err(VelocityError::InvalidCalibration(format!(
                "pixel distance between {a} and {b} is not finite"
            )));
        }
        if !real_distance.is_finite() || real_distance <= 0.0 {
            return Err(VelocityError::InvalidCalibration(format!(
                "real distance must be a positive number, got {real_distance}"
            )));
        }

        let scale = real_distance / pixel_distance;
        self.points = Some(CalibrationPoints {
            a,
            b,
            real_distance,
        });
        self.scale_factor = Some(scale);
        info!(
            pixel_distance,
            real_distance,
            meters_per_pixel = scale,
            "Calibration set"
        );
        Ok(scale)
    }

    /// Like [`set`](Self::set), parsing the real distance from user input.
    pub fn set_from_str(&mut self, a: Point2, b: Point2, real_distance: &str) -> Result<f64> {
        let value: f64 = real_distance.trim().parse().map_err(|_| {
            VelocityError::InvalidCalibration(format!(
                "invalid real distance provided: {real_distance:?}"
            ))
        })?;
        self.set(a, b, value)
    }

    pub fn scale_factor(&self) -> Result<f64> {
        self.scale_factor.ok_or(VelocityError::NotCalibrated)
    }

    pub fn is_calibrated(&self) -> bool {
        self.scale_factor.is_some()
    }

    /// The raw points of the last successful calibration.
    pub fn points(&self) -> Option<&CalibrationPoints> {
        self.points.as_ref()
    }

    /// Metric extent of an image of the given pixel size, origin at 0.
    pub fn metric_extent(&self, width_px: u32, height_px: u32) -> Result<MetricExtent> {
        let scale = self.scale_factor()?;
        Ok(MetricExtent {
            x_min: 0.0,
            x_max: width_px as f64 * scale,
            y_min: 0.0,
            y_max: height_px as f64 * scale,
        })
    }

    /// Metric extent of an image file, reading only its dimensions.
    pub fn image_extent(&self, path: &Path) -> Result<MetricExtent> {
        let scale = self.scale_factor()?;
        let (w, h) = image::image_dimensions(path)?;
        info!(width = w, height = h, meters_per_pixel = scale, "Rescaling image");
        self.metric_extent(w, h)
    }
}
