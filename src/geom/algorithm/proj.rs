use anyhow::{Context, Result};
use geo::{Coord, Geometry, MapCoords};
use proj4rs::{proj::Proj as Proj4, transform::transform};
use tracing::debug;

use crate::{Error, Frame};

/// Converts coordinates between two reference frames.
/// Geographic frames take degrees on the outside; PROJ.4 wants radians inside.
pub(crate) struct Reprojector {
    from: Frame,
    to: Frame,
    source: Proj4,
    target: Proj4,
}

impl Reprojector {
    pub(crate) fn new(from: Frame, to: Frame) -> Result<Self> {
        /// Build the PROJ.4 projection for a frame.
        fn build(frame: Frame) -> Result<Proj4> {
            let proj_string = frame.proj4()?;
            Proj4::from_proj_string(&proj_string)
                .with_context(|| format!("failed to build PROJ.4 for {frame}: {proj_string}"))
        }

        Ok(Self { from, to, source: build(from)?, target: build(to)? })
    }

    /// Transform a single coordinate.
    pub(crate) fn coord(&self, coord: Coord<f64>) -> Result<Coord<f64>, Error> {
        let mut point = if self.from.is_geographic() {
            (coord.x.to_radians(), coord.y.to_radians(), 0.0)
        } else {
            (coord.x, coord.y, 0.0)
        };

        transform(&self.source, &self.target, &mut point)
            .map_err(|e| Error::Reprojection {
                from: self.from.code(),
                to: self.to.code(),
                reason: e.to_string(),
            })?;

        Ok(if self.to.is_geographic() {
            Coord { x: point.0.to_degrees(), y: point.1.to_degrees() }
        } else {
            Coord { x: point.0, y: point.1 }
        })
    }

    /// Transform every coordinate of a geometry.
    pub(crate) fn geometry(&self, geom: &Geometry<f64>) -> Result<Geometry<f64>, Error> {
        geom.try_map_coords(|coord| self.coord(coord))
    }
}

/// Bring a layer's geometries into `target`, leaving them untouched if already there.
/// Returns whether a reprojection took place.
pub(crate) fn align_frame(
    layer: &str,
    geoms: &[Geometry<f64>],
    from: Frame,
    target: Frame,
) -> Result<(Vec<Geometry<f64>>, bool)> {
    if from == target { return Ok((geoms.to_vec(), false)) }

    debug!(layer, %from, %target, "reprojecting {} geometries", geoms.len());
    let reprojector = Reprojector::new(from, target)?;
    let projected = geoms.iter()
        .map(|geom| reprojector.geometry(geom))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("{layer}: reprojection from {from} to {target} failed"))?;

    Ok((projected, true))
}
