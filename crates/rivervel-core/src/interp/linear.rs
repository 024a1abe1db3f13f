use rstar::{RTree, RTreeObject, AABB};
use tracing::debug;

use crate::consts::{BARYCENTRIC_EPSILON, DEGENERATE_AREA_EPSILON};
use crate::point::Point2;

use super::delaunay::{orient, Triangulation};
use super::ScatteredInterpolator;

/// One triangle of the mesh with the sample values at its corners.
#[derive(Clone, Debug)]
struct TriangleCell {
    corners: [Point2; 3],
    values: [f64; 3],
}

impl RTreeObject for TriangleCell {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let [a, b, c] = self.corners;
        AABB::from_corners(
            [a.x.min(b.x).min(c.x), a.y.min(b.y).min(c.y)],
            [a.x.max(b.x).max(c.x), a.y.max(b.y).max(c.y)],
        )
    }
}

impl TriangleCell {
    /// Barycentric blend of the corner values at `p`, or `None` when `p` lies
    /// outside the triangle.
    fn blend(&self, p: Point2) -> Option<f64> {
        let [a, b, c] = self.corners;
        let det = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
        let l1 = ((b.y - c.y) * (p.x - c.x) + (c.x - b.x) * (p.y - c.y)) / det;
        let l2 = ((c.y - a.y) * (p.x - c.x) + (a.x - c.x) * (p.y - c.y)) / det;
        let l3 = 1.0 - l1 - l2;
        if l1 < -BARYCENTRIC_EPSILON || l2 < -BARYCENTRIC_EPSILON || l3 < -BARYCENTRIC_EPSILON {
            return None;
        }
        Some(l1 * self.values[0] + l2 * self.values[1] + l3 * self.values[2])
    }
}

/// Piecewise-linear interpolation over the Delaunay triangulation of the
/// sample positions.
///
/// Undefined outside the convex hull, inside triangles too thin to invert,
/// and wherever the containing triangle carries a NaN value.
pub struct LinearInterpolator {
    cells: RTree<TriangleCell>,
}

impl LinearInterpolator {
    pub fn new(points: &[Point2], values: &[f64]) -> Self {
        let triangulation = Triangulation::build(points);

        let (min, max) = points.iter().filter(|p| p.is_finite()).fold(
            (
                Point2::new(f64::INFINITY, f64::INFINITY),
                Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            ),
            |(lo, hi), p| {
                (
                    Point2::new(lo.x.min(p.x), lo.y.min(p.y)),
                    Point2::new(hi.x.max(p.x), hi.y.max(p.y)),
                )
            },
        );
        let extent = (max.x - min.x).max(max.y - min.y);
        let min_area = DEGENERATE_AREA_EPSILON * extent * extent;

        let mut singular = 0usize;
        let cells: Vec<TriangleCell> = triangulation
            .triangles()
            .iter()
            .filter_map(|&[i, j, k]| {
                let corners = [points[i], points[j], points[k]];
                if orient(corners[0], corners[1], corners[2]).abs() <= min_area {
                    singular += 1;
                    return None;
                }
                Some(TriangleCell {
                    corners,
                    values: [values[i], values[j], values[k]],
                })
            })
            .collect();

        debug!(triangles = cells.len(), singular, "Linear interpolator ready");
        Self {
            cells: RTree::bulk_load(cells),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.cells.size()
    }
}

impl ScatteredInterpolator for LinearInterpolator {
    fn interpolate(&self, p: Point2) -> Option<f64> {
        if !p.is_finite() {
            return None;
        }
        self.cells
            .locate_in_envelope_intersecting(&AABB::from_point([p.x, p.y]))
            .find_map(|cell| cell.blend(p))
            .filter(|v| v.is_finite())
    }
}
