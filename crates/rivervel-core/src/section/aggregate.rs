use std::ops::Range;

use tracing::info;

use crate::error::{Result, VelocityError};

use super::profile::{defined_mean, CrossSectionProfile};

/// Mean statistics of one contiguous run of profile samples.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionAggregate {
    /// 1-based section number.
    pub index: usize,
    /// Sample indices covered by this section.
    pub samples: Range<usize>,
    pub start_distance: f64,
    pub end_distance: f64,
    /// Mean of the section's sample distances.
    pub centroid_distance: f64,
    /// Mean of the section's resolved speeds.
    pub mean_speed: Option<f64>,
}

impl SectionAggregate {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectionSummary {
    pub sections: Vec<SectionAggregate>,
    /// Mean over every resolved sample of the profile.
    pub overall_mean_speed: Option<f64>,
}

/// Split `len` items into `count` contiguous parts whose sizes differ by at
/// most one, larger parts first.
pub fn partition_sizes(len: usize, count: usize) -> Vec<usize> {
    if count == 0 {
        return Vec::new();
    }
    let base = len / count;
    let extra = len % count;
    (0..count)
        .map(|i| if i < extra { base + 1 } else { base })
        .collect()
}

/// Partition a profile into `section_count` near-equal sections and average
/// each one.
pub fn aggregate(profile: &CrossSectionProfile, section_count: usize) -> Result<SectionSummary> {
    let len = profile.len();
    if section_count == 0 || section_count > len {
        return Err(VelocityError::InvalidSectionCount {
            requested: section_count,
            samples: len,
        });
    }

    let samples = profile.samples();
    let mut start = 0;
    let sections: Vec<SectionAggregate> = partition_sizes(len, section_count)
        .into_iter()
        .enumerate()
        .map(|(i, size)| {
            let range = start..start + size;
            start += size;
            let slice = &samples[range.clone()];
            let centroid_distance =
                slice.iter().map(|s| s.distance).sum::<f64>() / slice.len() as f64;
            SectionAggregate {
                index: i + 1,
                start_distance: slice[0].distance,
                end_distance: slice[slice.len() - 1].distance,
                centroid_distance,
                mean_speed: defined_mean(slice.iter().map(|s| s.speed)),
                samples: range,
            }
        })
        .collect();

    let overall_mean_speed = profile.mean_speed();
    info!(
        sections = section_count,
        mean_speed = overall_mean_speed.unwrap_or(f64::NAN),
        "Sections aggregated"
    );

    Ok(SectionSummary {
        sections,
        overall_mean_speed,
    })
}
