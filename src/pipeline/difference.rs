use anyhow::{ensure, Result};
use geo::{BooleanOps, Intersects, MultiPolygon};
use tracing::info;

use crate::{
    geom::{align_frame, repair_multipolygon, repair_with_status},
    layer::Features,
    BlockGroups, Frame, Geometries, RunReport,
};

/// Population-center polygons restricted to the study region, and their union.
#[derive(Debug, Clone)]
pub struct PopulationCenters {
    pieces: Geometries,
    union: MultiPolygon<f64>,
    union_parts: Geometries,
}

impl PopulationCenters {
    /// Bring population centers into `frame`, repair them and clip them to `region`
    /// (normally the union of the study block groups). Centers with nothing inside the
    /// region are dropped; an empty region keeps none.
    pub fn prepare(features: &Features, region: &MultiPolygon<f64>, frame: Frame, report: &mut RunReport) -> Result<Self> {
        let (geoms, moved) = align_frame("population centers", features.geoms(), features.frame(), frame)?;
        report.reprojected("population centers", moved);

        let region = Geometries::from_parts(&repair_multipolygon(region.clone()), frame);
        let mut pieces = Vec::new();
        for geom in &geoms {
            let (shape, was_invalid) = repair_with_status(geom);
            report.repaired(was_invalid);

            let near = region.gather_near(&shape);
            if near.0.is_empty() { continue }

            let clipped = repair_multipolygon(shape.intersection(&near));
            if !clipped.0.is_empty() {
                pieces.push(clipped);
            }
        }

        let pieces = Geometries::new(pieces, frame);
        let union = repair_multipolygon(pieces.union());
        let union_parts = Geometries::from_parts(&union, frame);

        info!(input = features.len(), in_region = pieces.len(), "prepared population centers");

        Ok(Self { pieces, union, union_parts })
    }

    /// The clipped population centers.
    #[inline] pub fn pieces(&self) -> &Geometries { &self.pieces }

    #[inline] pub fn union(&self) -> &MultiPolygon<f64> { &self.union }

    #[inline] pub fn frame(&self) -> Frame { self.pieces.frame() }

    /// Whether `shape` touches or overlaps any population center.
    pub fn intersects(&self, shape: &MultiPolygon<f64>) -> bool {
        self.union_parts.candidates(shape).into_iter()
            .any(|i| shape.intersects(self.union_parts.shape(i)))
    }

    /// `shape` minus the population-center union, unrepaired.
    pub(crate) fn subtract_from(&self, shape: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        let near = self.union_parts.gather_near(shape);
        if near.0.is_empty() { return shape.clone() }
        shape.difference(&near)
    }
}

/// Block groups split by their relation to the population-center union.
#[derive(Debug, Clone)]
pub struct Partition {
    /// No contact with any population center; geometry unchanged.
    pub outside: BlockGroups,
    /// Any contact with a population center; geometry before differencing.
    pub intersecting: BlockGroups,
    /// Intersecting block groups with the population centers cut away, minus any left empty.
    pub partially_outside: BlockGroups,
}

impl BlockGroups {
    /// Partition block groups into outside, intersecting and partially outside subsets.
    /// Every row lands in exactly one of `outside` and `intersecting`. Rows that the
    /// difference leaves empty are listed in `report.fully_covered`.
    pub fn split_by_population_centers(&self, centers: &PopulationCenters, report: &mut RunReport) -> Result<Partition> {
        ensure!(
            centers.frame() == self.frame(),
            "population centers are in {} but block groups are in {}", centers.frame(), self.frame()
        );

        let mut outside = Vec::new();
        let mut intersecting = Vec::new();
        let mut partial = Vec::new();
        let mut partial_shapes = Vec::new();

        for (i, shape) in self.geometries().shapes().iter().enumerate() {
            if !centers.intersects(shape) {
                outside.push(i as u32);
                continue
            }
            intersecting.push(i as u32);

            let remainder = repair_multipolygon(centers.subtract_from(shape));
            if remainder.0.is_empty() {
                report.fully_covered.push(self.geo_ids()[i].clone());
            } else {
                partial.push(i as u32);
                partial_shapes.push(remainder);
            }
        }

        info!(
            outside = outside.len(),
            intersecting = intersecting.len(),
            partially_outside = partial.len(),
            fully_covered = intersecting.len() - partial.len(),
            "split block groups by population centers"
        );

        Ok(Partition {
            outside: self.select_rows(&outside)?,
            intersecting: self.select_rows(&intersecting)?,
            partially_outside: self.select_rows(&partial)?.with_geometries(partial_shapes)?,
        })
    }
}
