use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::consts::{DEFAULT_PROFILE_RESOLUTION, PARALLEL_SAMPLE_THRESHOLD};
use crate::error::{Result, VelocityError};
use crate::field::VelocityField;
use crate::interp::{LinearInterpolator, NearestInterpolator, ScatteredInterpolator};
use crate::point::Point2;

use super::profile::{CrossSectionProfile, ProfileSample, SampleSource};

/// What to do with samples neither pass could resolve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnresolvedPolicy {
    /// Return the first `Interpolation` error.
    #[default]
    Fail,
    /// Keep the sample in the profile with an undefined speed.
    Flag,
}

impl std::fmt::Display for UnresolvedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fail => write!(f, "Fail"),
            Self::Flag => write!(f, "Flag"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Number of samples, both endpoints included.
    pub resolution: usize,
    #[serde(default)]
    pub unresolved: UnresolvedPolicy,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_PROFILE_RESOLUTION,
            unresolved: UnresolvedPolicy::default(),
        }
    }
}

/// Samples speed along a segment through a velocity field: a linear pass
/// over the triangulated field, then a nearest-neighbour pass restricted to
/// the samples the first pass left undefined.
pub struct CrossSectionSampler {
    primary: Box<dyn ScatteredInterpolator>,
    fallback: Box<dyn ScatteredInterpolator>,
}

impl CrossSectionSampler {
    /// Build the linear and nearest interpolators over the field's speeds.
    pub fn new(field: &VelocityField) -> Self {
        let points: Vec<Point2> = field.positions().collect();
        let speeds = field.speeds().to_vec();
        Self {
            primary: Box::new(LinearInterpolator::new(&points, &speeds)),
            fallback: Box::new(NearestInterpolator::new(&points, &speeds)),
        }
    }

    pub fn with_interpolators(
        primary: Box<dyn ScatteredInterpolator>,
        fallback: Box<dyn ScatteredInterpolator>,
    ) -> Self {
        Self { primary, fallback }
    }

    pub fn sample(
        &self,
        a: Point2,
        b: Point2,
        config: &SamplerConfig,
    ) -> Result<CrossSectionProfile> {
        let n = config.resolution;
        if n == 0 {
            return Err(VelocityError::InvalidResolution(n));
        }

        let positions = linspace(a, b, n);
        let first = positions[0];

        let linear: Vec<Option<f64>> = if n >= PARALLEL_SAMPLE_THRESHOLD {
            positions
                .par_iter()
                .map(|&p| self.primary.interpolate(p))
                .collect()
        } else {
            positions
                .iter()
                .map(|&p| self.primary.interpolate(p))
                .collect()
        };

        let mut samples: Vec<ProfileSample> = positions
            .iter()
            .zip(linear)
            .enumerate()
            .map(|(index, (&position, speed))| ProfileSample {
                index,
                position,
                distance: position.distance(&first),
                speed,
                source: if speed.is_some() {
                    SampleSource::Linear
                } else {
                    SampleSource::Unresolved
                },
            })
            .collect();

        let pending = samples
            .iter()
            .filter(|s| s.source == SampleSource::Unresolved)
            .count();
        if pending > 0 {
            debug!(pending, "Repairing samples with nearest neighbour");
        }
        for sample in samples
            .iter_mut()
            .filter(|s| s.source == SampleSource::Unresolved)
        {
            if let Some(speed) = self.fallback.interpolate(sample.position) {
                sample.speed = Some(speed);
                sample.source = SampleSource::Nearest;
            }
        }

        let profile = CrossSectionProfile::new(a, b, samples);
        let unresolved = profile.count(SampleSource::Unresolved);
        info!(
            samples = n,
            linear = profile.count(SampleSource::Linear),
            nearest = profile.count(SampleSource::Nearest),
            unresolved,
            "Cross-section sampled"
        );

        if unresolved > 0 {
            match config.unresolved {
                UnresolvedPolicy::Fail => profile.require_resolved()?,
                UnresolvedPolicy::Flag => {
                    warn!(unresolved, "Cross-section has undefined samples")
                }
            }
        }
        Ok(profile)
    }
}

/// Sample a field between two points, building the interpolators on the fly.
pub fn sample_cross_section(
    field: &VelocityField,
    a: Point2,
    b: Point2,
    config: &SamplerConfig,
) -> Result<CrossSectionProfile> {
    CrossSectionSampler::new(field).sample(a, b, config)
}

/// `n` evenly spaced points from `a` to `b`, both included exactly.
fn linspace(a: Point2, b: Point2, n: usize) -> Vec<Point2> {
    if n == 1 {
        return vec![a];
    }
    let step = 1.0 / (n - 1) as f64;
    (0..n)
        .map(|i| if i == n - 1 { b } else { a.lerp(&b, i as f64 * step) })
        .collect()
}
