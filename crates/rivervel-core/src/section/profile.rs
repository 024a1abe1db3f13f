use serde::{Deserialize, Serialize};

use crate::error::{Result, VelocityError};
use crate::point::Point2;

/// Which pass produced a sample's speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleSource {
    Linear,
    Nearest,
    Unresolved,
}

impl std::fmt::Display for SampleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "Linear"),
            Self::Nearest => write!(f, "Nearest"),
            Self::Unresolved => write!(f, "Unresolved"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfileSample {
    pub index: usize,
    pub position: Point2,
    /// Distance from the first sample, in meters.
    pub distance: f64,
    /// Interpolated speed in m/s, `None` when unresolved.
    pub speed: Option<f64>,
    pub source: SampleSource,
}

/// Speeds sampled at evenly spaced points along a segment.
#[derive(Clone, Debug, PartialEq)]
pub struct CrossSectionProfile {
    start: Point2,
    end: Point2,
    samples: Vec<ProfileSample>,
}

impl CrossSectionProfile {
    pub(crate) fn new(start: Point2, end: Point2, samples: Vec<ProfileSample>) -> Self {
        Self {
            start,
            end,
            samples,
        }
    }

    pub fn start(&self) -> Point2 {
        self.start
    }

    pub fn end(&self) -> Point2 {
        self.end
    }

    /// Length of the sampled segment in meters.
    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[ProfileSample] {
        &self.samples
    }

    pub fn distances(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.distance).collect()
    }

    pub fn speeds(&self) -> Vec<Option<f64>> {
        self.samples.iter().map(|s| s.speed).collect()
    }

    /// Mean speed over resolved samples only.
    pub fn mean_speed(&self) -> Option<f64> {
        defined_mean(self.samples.iter().map(|s| s.speed))
    }

    pub fn count(&self, source: SampleSource) -> usize {
        self.samples.iter().filter(|s| s.source == source).count()
    }

    /// One `Interpolation` error per unresolved sample.
    pub fn unresolved(&self) -> Vec<VelocityError> {
        self.samples
            .iter()
            .filter(|s| s.source == SampleSource::Unresolved)
            .map(|s| VelocityError::Interpolation {
                index: s.index,
                x: s.position.x,
                y: s.position.y,
            })
            .collect()
    }

    /// Fail with the first unresolved sample, if any.
    pub fn require_resolved(&self) -> Result<()> {
        match self.unresolved().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Arithmetic mean of the defined values; `None` if there are none.
pub fn defined_mean(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
