use std::path::{Path, PathBuf};

use rivervel_core::field::VelocityField;

/// Render rows as a CSV table with the given header.
pub fn csv_table(header: &[&str], rows: &[Vec<f64>]) -> String {
    let mut out = header.join(",");
    out.push('\n');
    for row in rows {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

/// Write a table into `dir` and return its path.
pub fn write_table(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write table");
    path
}

/// A `cols` x `rows` grid with spacing `step`, each point's velocity given
/// by `velocity(x, y)`.
pub fn grid_field(
    cols: usize,
    rows: usize,
    step: f64,
    velocity: impl Fn(f64, f64) -> (f64, f64),
) -> VelocityField {
    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut ux = Vec::new();
    let mut uy = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let (px, py) = (c as f64 * step, r as f64 * step);
            let (u, v) = velocity(px, py);
            x.push(px);
            y.push(py);
            ux.push(u);
            uy.push(v);
        }
    }
    VelocityField::from_columns(x, y, ux, uy).expect("equal columns")
}

/// The two-point field used throughout: speed 1 at (0,0) and (10,0).
pub fn two_point_field() -> VelocityField {
    VelocityField::from_columns(vec![0.0, 10.0], vec![0.0, 0.0], vec![1.0, 1.0], vec![0.0, 0.0])
        .expect("equal columns")
}

/// Element `i` of the van der Corput sequence in `base`.
pub fn halton(mut i: usize, base: usize) -> f64 {
    let mut f = 1.0;
    let mut r = 0.0;
    while i > 0 {
        f /= base as f64;
        r += f * (i % base) as f64;
        i /= base;
    }
    r
}

/// Irregularly scattered points over a `width` x `height` rectangle, its
/// four corners included, with velocity `velocity(x, y)`.
pub fn scattered_field(
    width: f64,
    height: f64,
    interior: usize,
    velocity: impl Fn(f64, f64) -> (f64, f64),
) -> VelocityField {
    let mut points = vec![(0.0, 0.0), (width, 0.0), (width, height), (0.0, height)];
    points.extend((1..=interior).map(|i| (width * halton(i, 2), height * halton(i, 3))));

    let (x, y): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();
    let (ux, uy): (Vec<f64>, Vec<f64>) = points.iter().map(|&(px, py)| velocity(px, py)).unzip();
    VelocityField::from_columns(x, y, ux, uy).expect("equal columns")
}
