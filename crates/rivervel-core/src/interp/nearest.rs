use rstar::primitives::GeomWithData;
use rstar::RTree;

use crate::point::Point2;

use super::ScatteredInterpolator;

type Sample = GeomWithData<[f64; 2], f64>;

/// Value of the closest sample position. Undefined only for an empty set,
/// a non-finite query, or when the closest sample itself is NaN.
pub struct NearestInterpolator {
    tree: RTree<Sample>,
}

impl NearestInterpolator {
    pub fn new(points: &[Point2], values: &[f64]) -> Self {
        let samples: Vec<Sample> = points
            .iter()
            .zip(values)
            .filter(|(p, _)| p.is_finite())
            .map(|(p, &v)| GeomWithData::new(p.to_array(), v))
            .collect();
        Self {
            tree: RTree::bulk_load(samples),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl ScatteredInterpolator for NearestInterpolator {
    fn interpolate(&self, p: Point2) -> Option<f64> {
        if !p.is_finite() {
            return None;
        }
        self.tree
            .nearest_neighbor(&p.to_array())
            .map(|s| s.data)
            .filter(|v| v.is_finite())
    }
}
