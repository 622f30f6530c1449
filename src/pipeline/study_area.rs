use anyhow::{Context, Result};
use geo::{BooleanOps, Geometry, MultiPolygon, Rect};
use tracing::{info, warn};

use crate::{
    geom::{align_frame, repair_multipolygon, repair_with_status},
    CountyKey, Error, Frame, Geometries, PipelineConfig, RunReport,
};

/// One administrative boundary (a county) as handed over by a boundary source.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    /// State FIPS code, e.g. "53".
    pub state: String,
    /// County FIPS code, e.g. "033".
    pub county: String,
    /// County name, e.g. "King".
    pub name: String,
    pub geometry: Geometry<f64>,
}

/// Where county boundaries come from (a TIGER/Line download, a cached file, ...).
pub trait BoundarySource {
    /// Frame the boundary geometries are expressed in.
    fn frame(&self) -> Frame;

    /// Every county boundary of `state`, in a stable order.
    fn counties(&self, state: &str) -> Result<Vec<Boundary>>;
}

/// Boundaries already held in memory. Holds a single state, so `state` is not consulted.
#[derive(Debug, Clone)]
pub struct StaticBoundaries {
    frame: Frame,
    boundaries: Vec<Boundary>,
}

impl StaticBoundaries {
    pub fn new(frame: Frame, boundaries: Vec<Boundary>) -> Self {
        Self { frame, boundaries }
    }
}

impl BoundarySource for StaticBoundaries {
    fn frame(&self) -> Frame { self.frame }

    fn counties(&self, _state: &str) -> Result<Vec<Boundary>> {
        Ok(self.boundaries.clone())
    }
}

/// The counties making up the region of interest, repaired and in the run's frame.
#[derive(Debug, Clone)]
pub struct StudyArea {
    region_code: String,
    keys: Vec<CountyKey>,
    names: Vec<String>,
    geoms: Geometries,
    union: MultiPolygon<f64>,
    union_parts: Geometries,
}

impl StudyArea {
    /// Load the counties named in `config` from `source`.
    /// Names the source does not know are logged and skipped; if none are left the run fails.
    pub fn load(source: &dyn BoundarySource, config: &PipelineConfig, report: &mut RunReport) -> Result<Self> {
        let boundaries = source.counties(&config.state)
            .with_context(|| format!("Failed to load county boundaries for state {:?}", config.state))?;

        for name in &config.counties {
            if !boundaries.iter().any(|b| &b.name == name) {
                warn!(county = %name, state = %config.state, "county not found in boundary source");
            }
        }

        let selected = boundaries.into_iter()
            .filter(|b| config.counties.contains(&b.name))
            .collect::<Vec<_>>();

        if selected.is_empty() {
            return Err(Error::EmptyStudyArea {
                state: config.state.clone(),
                requested: config.counties.clone(),
            }.into());
        }

        Self::from_boundaries(selected, source.frame(), config.frame, report)
    }

    /// Build a study area from already selected boundaries given in frame `from`.
    pub fn from_boundaries(
        boundaries: Vec<Boundary>,
        from: Frame,
        frame: Frame,
        report: &mut RunReport,
    ) -> Result<Self> {
        let Some(first) = boundaries.first() else {
            return Err(Error::EmptyStudyArea { state: String::new(), requested: vec![] }.into());
        };

        let region_code = CountyKey::new(&first.state, &first.county).state().to_string();

        let mut keys = Vec::with_capacity(boundaries.len());
        let mut names = Vec::with_capacity(boundaries.len());
        let mut raw = Vec::with_capacity(boundaries.len());
        for boundary in boundaries {
            let key = CountyKey::new(&boundary.state, &boundary.county);
            if key.state() != region_code {
                return Err(Error::MixedRegion(region_code, key.state().to_string()).into());
            }
            keys.push(key);
            names.push(boundary.name);
            raw.push(boundary.geometry);
        }

        let (raw, moved) = align_frame("study area", &raw, from, frame)?;
        report.reprojected("study area", moved);

        let shapes = raw.iter()
            .map(|geom| {
                let (shape, was_invalid) = repair_with_status(geom);
                report.repaired(was_invalid);
                shape
            })
            .collect();

        let geoms = Geometries::new(shapes, frame);
        let union = repair_multipolygon(geoms.union());
        let union_parts = Geometries::from_parts(&union, frame);

        info!(region = %region_code, counties = ?names, "loaded study area");

        Ok(Self { region_code, keys, names, geoms, union, union_parts })
    }

    /// State code shared by every boundary.
    #[inline] pub fn region_code(&self) -> &str { &self.region_code }

    #[inline] pub fn county_keys(&self) -> &[CountyKey] { &self.keys }

    #[inline] pub fn county_names(&self) -> &[String] { &self.names }

    #[inline] pub fn contains_county(&self, key: &CountyKey) -> bool { self.keys.contains(key) }

    /// County boundaries, row-aligned with `county_keys`.
    #[inline] pub fn geometries(&self) -> &Geometries { &self.geoms }

    #[inline] pub fn frame(&self) -> Frame { self.geoms.frame() }

    /// All counties merged into one MultiPolygon.
    #[inline] pub fn union(&self) -> &MultiPolygon<f64> { &self.union }

    /// Outer envelope of the study area.
    pub fn envelope(&self) -> Option<Rect<f64>> { self.geoms.bounds() }

    /// Intersect `shape` with the study area, only consulting the parts near it.
    pub(crate) fn clip(&self, shape: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        shape.intersection(&self.union_parts.gather_near(shape))
    }
}
