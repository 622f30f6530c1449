use geo::{Area, BooleanOps, Intersects};

use crate::geom::{repair_multipolygon, Geometries};

/// One piece of the pairwise intersection between `left[left]` and `right[right]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Fragment {
    pub left: usize,
    pub right: usize,
    pub area: f64,
}

impl Geometries {
    /// Pairwise intersection overlay of `self` against `other`.
    /// Emits one fragment per pair with positive overlap area, ordered by
    /// (`left`, `right`) index; touching boundaries produce no fragment.
    pub(crate) fn overlay(&self, other: &Geometries) -> Vec<Fragment> {
        let mut fragments = Vec::new();

        for (i, shape) in self.shapes().iter().enumerate() {
            // Candidates come back in ascending index order.
            for j in other.candidates(shape) {
                let target = other.shape(j);
                if !shape.intersects(target) { continue }

                let piece = repair_multipolygon(shape.intersection(target));
                let area = piece.unsigned_area();
                if area > 0.0 {
                    fragments.push(Fragment { left: i, right: j, area });
                }
            }
        }

        fragments
    }
}
