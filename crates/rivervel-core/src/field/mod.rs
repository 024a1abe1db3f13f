pub mod columns;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ndarray::{Array1, Zip};
use tracing::{debug, info};

use crate::error::{Result, VelocityError};
use crate::io::table::{open_table, parse_cell};
use crate::point::Point2;

pub use columns::{ColumnMap, ResolvedColumn};

/// A scattered 2D velocity field: positions in meters, velocity components
/// in m/s, and the speed magnitude derived once at load.
///
/// Columns are parallel and keep the source row order. Nothing about spatial
/// ordering or gridding is assumed.
#[derive(Clone, Debug, PartialEq)]
pub struct VelocityField {
    x: Array1<f64>,
    y: Array1<f64>,
    ux: Array1<f64>,
    uy: Array1<f64>,
    speed: Array1<f64>,
    columns: ColumnMap,
}

/// Aggregate description of a loaded field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSummary {
    pub rows: usize,
    /// Rows whose speed is finite.
    pub valid_rows: usize,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub min_speed: f64,
    pub max_speed: f64,
    pub mean_speed: f64,
}

impl VelocityField {
    /// Load a field from a delimited file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let field = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            rows = field.len(),
            ux = %field.columns.ux.name,
            uy = %field.columns.uy.name,
            "Velocity field loaded"
        );
        Ok(field)
    }

    /// Load a field from any delimited source with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut table = open_table(reader)?;
        let columns = ColumnMap::resolve(table.headers()?)?;
        debug!(?columns, "Resolved velocity columns");

        let mut x = Vec::new();
        let mut y = Vec::new();
        let mut ux = Vec::new();
        let mut uy = Vec::new();

        for (i, record) in table.records().enumerate() {
            let record = record?;
            let row = i + 1;
            if record.len() <= columns.max_index() {
                return Err(VelocityError::MalformedRow {
                    row,
                    reason: format!(
                        "expected at least {} fields, found {}",
                        columns.max_index() + 1,
                        record.len()
                    ),
                });
            }
            x.push(parse_cell(&record, columns.x.index, &columns.x.name, row)?);
            y.push(parse_cell(&record, columns.y.index, &columns.y.name, row)?);
            ux.push(parse_cell(&record, columns.ux.index, &columns.ux.name, row)?);
            uy.push(parse_cell(&record, columns.uy.index, &columns.uy.name, row)?);
        }

        Ok(Self::from_components(
            Array1::from(x),
            Array1::from(y),
            Array1::from(ux),
            Array1::from(uy),
            columns,
        ))
    }

    /// Build a field from in-memory columns, which must have equal length.
    pub fn from_columns(x: Vec<f64>, y: Vec<f64>, ux: Vec<f64>, uy: Vec<f64>) -> Result<Self> {
        let lengths = [x.len(), y.len(), ux.len(), uy.len()];
        let shortest = lengths.iter().copied().min().unwrap_or(0);
        if lengths.iter().any(|&n| n != shortest) {
            return Err(VelocityError::MalformedRow {
                row: shortest + 1,
                reason: format!(
                    "column lengths differ (X={}, Y={}, Ux={}, Uy={})",
                    lengths[0], lengths[1], lengths[2], lengths[3]
                ),
            });
        }
        let columns = ColumnMap {
            x: ResolvedColumn {
                name: "X".into(),
                index: 0,
            },
            y: ResolvedColumn {
                name: "Y".into(),
                index: 1,
            },
            ux: ResolvedColumn {
                name: "Ux".into(),
                index: 2,
            },
            uy: ResolvedColumn {
                name: "Uy".into(),
                index: 3,
            },
        };
        Ok(Self::from_components(
            Array1::from(x),
            Array1::from(y),
            Array1::from(ux),
            Array1::from(uy),
            columns,
        ))
    }

    fn from_components(
        x: Array1<f64>,
        y: Array1<f64>,
        ux: Array1<f64>,
        uy: Array1<f64>,
        columns: ColumnMap,
    ) -> Self {
        let speed = Zip::from(&ux)
            .and(&uy)
            .map_collect(|&u, &v| (u * u + v * v).sqrt());
        Self {
            x,
            y,
            ux,
            uy,
            speed,
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn position_at_index(&self, i: usize) -> Point2 {
        Point2::new(self.x[i], self.y[i])
    }

    pub fn velocity_at_index(&self, i: usize) -> (f64, f64) {
        (self.ux[i], self.uy[i])
    }

    /// Speed magnitude; NaN when a velocity component was NaN in the source.
    pub fn speed_at_index(&self, i: usize) -> f64 {
        self.speed[i]
    }

    pub fn x(&self) -> &Array1<f64> {
        &self.x
    }

    pub fn y(&self) -> &Array1<f64> {
        &self.y
    }

    pub fn ux(&self) -> &Array1<f64> {
        &self.ux
    }

    pub fn uy(&self) -> &Array1<f64> {
        &self.uy
    }

    pub fn speeds(&self) -> &Array1<f64> {
        &self.speed
    }

    /// Header names the velocity columns resolved to.
    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    pub fn positions(&self) -> impl Iterator<Item = Point2> + '_ {
        self.x
            .iter()
            .zip(self.y.iter())
            .map(|(&x, &y)| Point2::new(x, y))
    }

    pub fn summary(&self) -> FieldSummary {
        let range = |a: &Array1<f64>| {
            a.iter()
                .filter(|v| v.is_finite())
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                })
        };

        let finite: Vec<f64> = self
            .speed
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .collect();
        let (min_speed, max_speed) = finite
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let mean_speed = if finite.is_empty() {
            f64::NAN
        } else {
            finite.iter().sum::<f64>() / finite.len() as f64
        };

        FieldSummary {
            rows: self.len(),
            valid_rows: finite.len(),
            x_range: range(&self.x),
            y_range: range(&self.y),
            min_speed,
            max_speed,
            mean_speed,
        }
    }
}
