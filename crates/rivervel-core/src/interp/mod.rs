pub mod delaunay;
pub mod linear;
pub mod nearest;

use crate::point::Point2;

pub use delaunay::Triangulation;
pub use linear::LinearInterpolator;
pub use nearest::NearestInterpolator;

/// Estimates a scalar value at an arbitrary point from scattered samples.
///
/// `None` means the estimate is undefined there; callers decide how to
/// repair or report it.
pub trait ScatteredInterpolator: Send + Sync {
    fn interpolate(&self, p: Point2) -> Option<f64>;
}
