use geo::{BooleanOps, BoundingRect, Coord, MultiPolygon, Rect};
use rstar::RTree;

use crate::{geom::{bbox::envelope, BoundingBox}, Frame};

/// Geometries represents an indexed collection of MultiPolygons in one reference frame.
/// Empty shapes keep their slot (so indices stay row-aligned) but are left out of the R-tree.
#[derive(Debug, Clone)]
pub struct Geometries {
    shapes: Vec<MultiPolygon<f64>>,
    rtree: RTree<BoundingBox>,
    frame: Frame,
}

impl Geometries {
    /// Construct a Geometries object from a vector of MultiPolygons
    pub fn new(shapes: Vec<MultiPolygon<f64>>, frame: Frame) -> Self {
        Self {
            rtree: RTree::bulk_load(
                shapes.iter().enumerate()
                    .filter_map(|(i, shape)| shape.bounding_rect().map(|rect| BoundingBox::new(i, rect)))
                    .collect()
            ),
            shapes,
            frame,
        }
    }

    /// Index each polygon of `shape` as its own one-member MultiPolygon.
    pub(crate) fn from_parts(shape: &MultiPolygon<f64>, frame: Frame) -> Self {
        Self::new(shape.0.iter().map(|polygon| MultiPolygon::new(vec![polygon.clone()])).collect(), frame)
    }

    /// Get the number of MultiPolygons.
    #[inline] pub fn len(&self) -> usize { self.shapes.len() }

    /// Check if there are no MultiPolygons.
    #[inline] pub fn is_empty(&self) -> bool { self.shapes.is_empty() }

    /// Get a reference to the list of MultiPolygons.
    #[inline] pub fn shapes(&self) -> &[MultiPolygon<f64>] { &self.shapes }

    /// Get the MultiPolygon at `idx`.
    #[inline] pub fn shape(&self, idx: usize) -> &MultiPolygon<f64> { &self.shapes[idx] }

    /// Get the reference frame the coordinates are expressed in.
    #[inline] pub fn frame(&self) -> Frame { self.frame }

    /// Take ownership of the underlying MultiPolygons.
    #[inline] pub fn into_shapes(self) -> Vec<MultiPolygon<f64>> { self.shapes }

    /// Indices of shapes whose bounding box intersects `rect`, in ascending order.
    pub(crate) fn query(&self, rect: &Rect<f64>) -> Vec<usize> {
        let mut hits = self.rtree
            .locate_in_envelope_intersecting(&envelope(rect))
            .map(|bb| bb.idx())
            .collect::<Vec<_>>();
        hits.sort_unstable();
        hits
    }

    /// Indices of shapes whose bounding box intersects the bounding box of `shape`.
    #[inline]
    pub(crate) fn candidates(&self, shape: &MultiPolygon<f64>) -> Vec<usize> {
        shape.bounding_rect()
            .map(|rect| self.query(&rect))
            .unwrap_or_default()
    }

    /// Iterate over the indexed bounding boxes (non-empty shapes only).
    #[inline]
    pub(crate) fn boxes(&self) -> impl Iterator<Item = &BoundingBox> {
        self.rtree.iter()
    }

    /// Compute the bounding rectangle of all MultiPolygons.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.shapes.iter()
            .filter_map(|shape| shape.bounding_rect())
            .reduce(|a, b| Rect::new(
                Coord {
                    x: a.min().x.min(b.min().x),
                    y: a.min().y.min(b.min().y),
                },
                Coord {
                    x: a.max().x.max(b.max().x),
                    y: a.max().y.max(b.max().y),
                }
            ))
    }

    /// Compute the union of all MultiPolygons into a single MultiPolygon.
    /// Merges pairwise in a balanced tree, so the result only depends on input order.
    pub fn union(&self) -> MultiPolygon<f64> {
        union_all(self.shapes.iter().filter(|shape| !shape.0.is_empty()).cloned().collect())
    }

    /// The polygons of all shapes near `shape`, gathered into one MultiPolygon.
    /// Only meaningful when the shapes are pairwise disjoint (e.g. members of a union).
    pub(crate) fn gather_near(&self, shape: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        MultiPolygon::new(
            self.candidates(shape).into_iter()
                .flat_map(|i| self.shapes[i].0.iter().cloned())
                .collect()
        )
    }
}

/// Union a list of MultiPolygons, merging neighbors pairwise until one remains.
pub(crate) fn union_all(mut level: Vec<MultiPolygon<f64>>) -> MultiPolygon<f64> {
    while level.len() > 1 {
        level = level.chunks(2)
            .map(|pair| pair[1..].iter().fold(pair[0].clone(), |acc, next| acc.union(next)))
            .collect();
    }
    level.pop().unwrap_or_else(|| MultiPolygon::new(vec![]))
}
