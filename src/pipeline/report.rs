use serde::Serialize;

use crate::GeoId;

/// Everything a run recovered from instead of failing on.
/// Row-dropping and locale-unresolved conditions list the identifiers involved.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    /// Geometries that failed validation and were rebuilt.
    pub repaired_geometries: usize,
    /// Layers that arrived in another frame and were reprojected.
    pub reprojected_layers: Vec<String>,

    /// Block groups outside the study area's counties.
    pub filtered_by_county: usize,
    /// Block groups with missing or non-positive land area.
    pub filtered_by_land_area: usize,
    /// Block groups with nothing left after clipping to the study area.
    pub clipped_out: Vec<GeoId>,

    /// Medians the wage categories were split on (`None` if every value was missing).
    pub home_wage_median: Option<f64>,
    pub work_wage_median: Option<f64>,

    /// Intersecting block groups left empty by the difference.
    pub fully_covered: Vec<GeoId>,

    /// Partially outside block groups whose locale came from the nearest area-type polygon.
    pub locale_fallback: Vec<GeoId>,
    /// Partially outside block groups that still have no locale.
    pub locale_unresolved: Vec<GeoId>,
}

impl RunReport {
    /// Record whether a layer had to be reprojected.
    pub(crate) fn reprojected(&mut self, layer: &str, moved: bool) {
        if moved { self.reprojected_layers.push(layer.to_string()) }
    }

    /// Count a geometry repair.
    #[inline]
    pub(crate) fn repaired(&mut self, was_invalid: bool) {
        self.repaired_geometries += was_invalid as usize;
    }

    /// True if no block group was dropped and every locale resolved.
    pub fn is_clean(&self) -> bool {
        self.clipped_out.is_empty() && self.fully_covered.is_empty() && self.locale_unresolved.is_empty()
    }
}
