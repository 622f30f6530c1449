use anyhow::{ensure, Result};
use polars::prelude::*;
use tracing::{info, warn};

use crate::{
    geom::{align_frame, repair_with_status},
    layer::{columns, Features},
    BlockGroups, Frame, Geometries, Locale, RunReport,
};

const LAYER: &str = "area types";

/// Locale polygons (NCES EDGE), repaired and in the run's frame.
#[derive(Debug, Clone)]
pub struct AreaTypes {
    geoms: Geometries,
    locales: Vec<Locale>,
}

impl AreaTypes {
    /// Read locale codes from `locale_column` and bring the polygons into `frame`.
    /// Polygons without a locale code are skipped.
    pub fn prepare(features: &Features, locale_column: &str, frame: Frame, report: &mut RunReport) -> Result<Self> {
        features.require_columns(LAYER, &[locale_column])?;
        let codes = features.str_values(LAYER, locale_column)?;

        let (geoms, moved) = align_frame(LAYER, features.geoms(), features.frame(), frame)?;
        report.reprojected(LAYER, moved);

        let mut shapes = Vec::with_capacity(geoms.len());
        let mut locales = Vec::with_capacity(geoms.len());
        let mut skipped = 0;
        for (geom, code) in geoms.iter().zip(codes) {
            let Some(code) = code else {
                skipped += 1;
                continue
            };
            let (shape, was_invalid) = repair_with_status(geom);
            report.repaired(was_invalid);
            shapes.push(shape);
            locales.push(Locale::parse(&code));
        }

        if skipped > 0 {
            warn!(skipped, "area-type polygons without a locale code were skipped");
        }

        Ok(Self { geoms: Geometries::new(shapes, frame), locales })
    }

    /// Area types from already repaired shapes.
    pub fn new(geoms: Geometries, locales: Vec<Locale>) -> Result<Self> {
        ensure!(geoms.len() == locales.len(), "{} area-type shapes but {} locales", geoms.len(), locales.len());
        Ok(Self { geoms, locales })
    }

    #[inline] pub fn len(&self) -> usize { self.locales.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.locales.is_empty() }

    #[inline] pub fn geometries(&self) -> &Geometries { &self.geoms }

    #[inline] pub fn locales(&self) -> &[Locale] { &self.locales }

    #[inline] pub fn frame(&self) -> Frame { self.geoms.frame() }
}

impl BlockGroups {
    /// Attach a `LOCALE` to every block group: the area type it overlaps most, or failing
    /// that the nearest one. The winning overlap area goes into `max_area`.
    ///
    /// Equal overlaps go to the area type listed first. Rows resolved by distance and rows
    /// left without a locale are listed in the report.
    pub fn classify_area_types(self, area_types: &AreaTypes, report: &mut RunReport) -> Result<Self> {
        ensure!(
            area_types.frame() == self.frame(),
            "area types are in {} but block groups are in {}", area_types.frame(), self.frame()
        );

        let mut fragments = self.geometries().overlay(area_types.geometries());
        // Stable, so ties keep (block group, area type) order.
        fragments.sort_by(|a, b| b.area.total_cmp(&a.area));

        let mut best: Vec<Option<(usize, f64)>> = vec![None; self.len()];
        for fragment in &fragments {
            if best[fragment.left].is_none() {
                best[fragment.left] = Some((fragment.right, fragment.area));
            }
        }

        let mut locales = Vec::with_capacity(self.len());
        let mut max_area = Vec::with_capacity(self.len());
        for (i, choice) in best.into_iter().enumerate() {
            match choice {
                Some((j, area)) => {
                    locales.push(Some(area_types.locales[j].as_str()));
                    max_area.push(Some(area));
                }
                None => {
                    let geo_id = self.geo_ids()[i].clone();
                    match area_types.geometries().nearest(self.geometries().shape(i)) {
                        Some((j, _)) => {
                            locales.push(Some(area_types.locales[j].as_str()));
                            report.locale_fallback.push(geo_id);
                        }
                        None => {
                            locales.push(None);
                            report.locale_unresolved.push(geo_id);
                        }
                    }
                    max_area.push(None);
                }
            }
        }

        if !report.locale_fallback.is_empty() {
            info!(geo_ids = ?report.locale_fallback, "locale taken from nearest area type");
        }
        if !report.locale_unresolved.is_empty() {
            warn!(geo_ids = ?report.locale_unresolved, "block groups left without a locale");
        }

        let df = DataFrame::new(vec![
            Column::new(self.id_column().into(), self.geo_ids().iter().map(|id| id.as_str()).collect::<Vec<_>>()),
            Column::new(columns::LOCALE.into(), locales),
            Column::new(columns::MAX_AREA.into(), max_area),
        ])?;

        self.merge_by_id(df)
    }
}
