use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::consts::{CROSS_SECTION_FILE, SECTION_AVERAGES_FILE, SELECTED_POINTS_FILE};
use crate::error::{Result, VelocityError};
use crate::point::Point2;
use crate::section::{CrossSectionProfile, SectionSummary};
use crate::selection::EndpointSelection;

use super::table::{open_table, parse_cell};

#[derive(Serialize)]
struct CrossSectionRow {
    #[serde(rename = "Distance (m)")]
    distance: f64,
    #[serde(rename = "Velocity (m/s)")]
    velocity: Option<f64>,
}

/// One row of the section averages table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionRow {
    #[serde(rename = "Section")]
    pub section: usize,
    #[serde(rename = "Section Center (m)")]
    pub center: f64,
    #[serde(rename = "Average Velocity (m/s)")]
    pub average_velocity: Option<f64>,
}

#[derive(Serialize)]
struct PointRow {
    #[serde(rename = "X")]
    x: f64,
    #[serde(rename = "Y")]
    y: f64,
}

/// Paths of the three artifacts written by [`export`].
#[derive(Clone, Debug, PartialEq)]
pub struct ExportedFiles {
    pub cross_section: PathBuf,
    pub sections: PathBuf,
    pub points: PathBuf,
}

/// Write the cross-section, section averages and endpoints as three CSV
/// files in `save_dir`.
///
/// `save_dir` must already exist. Existing files are overwritten; a failure
/// part-way may leave earlier files written.
pub fn export(
    save_dir: &Path,
    profile: &CrossSectionProfile,
    summary: &SectionSummary,
    endpoints: (Point2, Point2),
) -> Result<ExportedFiles> {
    if !save_dir.is_dir() {
        return Err(VelocityError::Write {
            path: save_dir.to_path_buf(),
            source: std::io::Error::new(ErrorKind::NotFound, "save directory does not exist"),
        });
    }

    let files = ExportedFiles {
        cross_section: save_dir.join(CROSS_SECTION_FILE),
        sections: save_dir.join(SECTION_AVERAGES_FILE),
        points: save_dir.join(SELECTED_POINTS_FILE),
    };

    write_rows(
        &files.cross_section,
        profile.samples().iter().map(|s| CrossSectionRow {
            distance: s.distance,
            velocity: s.speed,
        }),
    )?;
    write_rows(
        &files.sections,
        summary.sections.iter().map(|s| SectionRow {
            section: s.index,
            center: s.centroid_distance,
            average_velocity: s.mean_speed,
        }),
    )?;
    let (a, b) = endpoints;
    write_rows(
        &files.points,
        [a, b].into_iter().map(|p| PointRow { x: p.x, y: p.y }),
    )?;

    info!(dir = %save_dir.display(), "Analysis exported");
    Ok(files)
}

fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<()> {
    let to_write_error = |e: csv::Error| VelocityError::Write {
        path: path.to_path_buf(),
        source: e.into(),
    };
    let mut writer = csv::Writer::from_path(path).map_err(to_write_error)?;
    for row in rows {
        writer.serialize(row).map_err(to_write_error)?;
    }
    writer.flush().map_err(|source| VelocityError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a saved endpoint pair: the first two columns of the first two rows.
pub fn read_endpoints(path: &Path) -> Result<EndpointSelection> {
    let selection = read_endpoints_from(File::open(path)?)?;
    info!(path = %path.display(), "Endpoints reloaded");
    Ok(selection)
}

pub fn read_endpoints_from<R: Read>(reader: R) -> Result<EndpointSelection> {
    let mut table = open_table(reader)?;
    let mut points = Vec::with_capacity(2);
    for (i, record) in table.records().take(2).enumerate() {
        let record = record?;
        let x = parse_cell(&record, 0, "X", i + 1)?;
        let y = parse_cell(&record, 1, "Y", i + 1)?;
        points.push(Point2::new(x, y));
    }
    match points.as_slice() {
        [a, b] => Ok(EndpointSelection::from_pair(*a, *b)),
        _ => Err(VelocityError::InsufficientPoints {
            found: points.len(),
        }),
    }
}

/// Read a section averages table written by [`export`].
pub fn read_section_aggregates(path: &Path) -> Result<Vec<SectionRow>> {
    let mut table = open_table(File::open(path)?)?;
    let rows = table
        .deserialize()
        .collect::<std::result::Result<Vec<SectionRow>, _>>()?;
    Ok(rows)
}
