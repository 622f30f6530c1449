use geo::Rect;
use rstar::{RTreeObject, AABB};

/// A bounding box in an R-tree, associated with a MultiPolygon by index.
#[derive(Debug, Clone)]
pub(crate) struct BoundingBox {
    idx: usize, // Index of corresponding MultiPolygon in shapes
    bbox: Rect<f64>,
}

impl BoundingBox {
    pub(super) fn new(idx: usize, bbox: Rect<f64>) -> Self {
        Self { idx, bbox }
    }

    /// Get the index of the corresponding MultiPolygon.
    #[inline] pub(crate) fn idx(&self) -> usize { self.idx }

    /// Get a reference to the bounding rectangle.
    #[inline] pub(crate) fn bbox(&self) -> &Rect<f64> { &self.bbox }
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Envelope of a rectangle, for R-tree queries.
#[inline]
pub(crate) fn envelope(rect: &Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners(rect.min().into(), rect.max().into())
}

/// Smallest Euclidean distance between two rectangles (zero when they overlap).
/// A lower bound on the distance between anything the rectangles enclose.
#[inline]
pub(crate) fn rect_distance(a: &Rect<f64>, b: &Rect<f64>) -> f64 {
    let dx = (b.min().x - a.max().x).max(a.min().x - b.max().x).max(0.0);
    let dy = (b.min().y - a.max().y).max(a.min().y - b.max().y).max(0.0);
    dx.hypot(dy)
}

#[cfg(test)]
mod tests {
    use geo::coord;

    use super::*;

    #[test]
    fn overlapping_rects_have_zero_distance() {
        let a = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 2.0, y: 2.0 });
        let b = Rect::new(coord! { x: 1.0, y: 1.0 }, coord! { x: 3.0, y: 3.0 });
        assert_eq!(rect_distance(&a, &b), 0.0);
    }

    #[test]
    fn diagonal_gap_uses_both_axes() {
        let a = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 1.0 });
        let b = Rect::new(coord! { x: 4.0, y: 5.0 }, coord! { x: 6.0, y: 6.0 });
        assert!((rect_distance(&a, &b) - 5.0).abs() < 1e-12);
        assert!((rect_distance(&b, &a) - 5.0).abs() < 1e-12);
    }
}
