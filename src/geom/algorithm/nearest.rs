use geo::{BoundingRect, Distance, Euclidean, Geometry, Intersects, MultiPolygon};

use crate::geom::{bbox::rect_distance, Geometries};

impl Geometries {
    /// Find the shape closest to `shape` by Euclidean distance.
    /// Returns its index and the distance; ties go to the lowest index.
    /// `None` if `shape` or every indexed shape is empty.
    pub(crate) fn nearest(&self, shape: &MultiPolygon<f64>) -> Option<(usize, f64)> {
        let rect = shape.bounding_rect()?;

        // Visit candidates by bounding-box distance, which never exceeds the true distance.
        let mut order = self.boxes()
            .map(|bb| (rect_distance(&rect, bb.bbox()), bb.idx()))
            .collect::<Vec<_>>();
        order.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let origin = Geometry::MultiPolygon(shape.clone());
        let mut best: Option<(usize, f64)> = None;

        for (lower_bound, j) in order {
            if let Some((_, best_dist)) = best {
                if lower_bound > best_dist { break }
            }

            let target = self.shape(j);
            let dist = if shape.intersects(target) {
                0.0
            } else {
                Euclidean.distance(&origin, &Geometry::MultiPolygon(target.clone()))
            };

            match best {
                Some((k, d)) if d < dist || (d == dist && k < j) => {}
                _ => best = Some((j, dist)),
            }
        }

        best
    }
}
