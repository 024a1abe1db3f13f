use crate::point::Point2;

/// The two cross-section endpoints, in the order they were picked.
///
/// Starts empty and holds at most two points; additions past the second are
/// ignored until the selection is cleared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EndpointSelection {
    points: Vec<Point2>,
}

impl EndpointSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// A complete selection from a stored pair.
    pub fn from_pair(first: Point2, second: Point2) -> Self {
        Self {
            points: vec![first, second],
        }
    }

    /// Returns the selection with `p` appended, unchanged if already full.
    #[must_use]
    pub fn add_point(mut self, p: Point2) -> Self {
        if self.points.len() < 2 {
            self.points.push(p);
        }
        self
    }

    #[must_use]
    pub fn cleared(self) -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Analysis is available only once both endpoints are set.
    pub fn is_complete(&self) -> bool {
        self.points.len() == 2
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn pair(&self) -> Option<(Point2, Point2)> {
        match self.points.as_slice() {
            [a, b] => Some((*a, *b)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grows_to_two_then_ignores() {
        let sel = EndpointSelection::new()
            .add_point(Point2::new(1.0, 2.0))
            .add_point(Point2::new(3.0, 4.0))
            .add_point(Point2::new(5.0, 6.0));
        assert!(sel.is_complete());
        assert_eq!(
            sel.pair(),
            Some((Point2::new(1.0, 2.0), Point2::new(3.0, 4.0)))
        );
    }

    #[test]
    fn test_clear() {
        let sel = EndpointSelection::new().add_point(Point2::new(0.0, 0.0));
        assert!(!sel.is_complete());
        assert!(sel.pair().is_none());
        assert!(sel.cleared().is_empty());
    }
}
