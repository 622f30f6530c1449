use ahash::AHashSet;
use anyhow::Result;
use polars::prelude::*;
use tracing::info;

use crate::{
    geom::{align_frame, repair_multipolygon, repair_with_status},
    layer::Features,
    BlockGroups, CountyKey, Error, GeoId, PipelineConfig, RunReport, StudyArea,
};

const LAYER: &str = "block groups";

impl BlockGroups {
    /// Restrict raw block groups to the study area.
    ///
    /// Rows survive if their county is part of the study area, their land area is positive,
    /// and something is left after clipping to the counties. Survivors are repaired and
    /// projected to the configured output columns, in input order.
    pub fn filter_to_study_area(
        features: &Features,
        study_area: &StudyArea,
        config: &PipelineConfig,
        report: &mut RunReport,
    ) -> Result<Self> {
        features.require_columns(LAYER, &config.required_block_group_columns())?;

        let ids = features.str_values(LAYER, &config.id_column)?;
        let mut seen = AHashSet::with_capacity(ids.len());
        for id in &ids {
            let id = id.as_deref().map(str::trim).unwrap_or_default();
            if id.is_empty() || !seen.insert(id) {
                return Err(Error::DuplicateId { layer: LAYER.into(), id: id.to_string() }.into());
            }
        }

        let states = features.str_values(LAYER, &config.state_column)?;
        let counties = features.str_values(LAYER, &config.county_column)?;
        let land = features.f64_values(LAYER, &config.land_area_column)?;

        let (geoms, moved) = align_frame(LAYER, features.geoms(), features.frame(), study_area.frame())?;
        report.reprojected(LAYER, moved);

        let mut rows = Vec::new();
        let mut shapes = Vec::new();
        for (i, geom) in geoms.iter().enumerate() {
            let key = CountyKey::new(
                states[i].as_deref().unwrap_or_default(),
                counties[i].as_deref().unwrap_or_default(),
            );
            if !study_area.contains_county(&key) {
                report.filtered_by_county += 1;
                continue
            }

            // NaN fails the comparison too.
            if !land[i].is_some_and(|acres| acres > 0.0) {
                report.filtered_by_land_area += 1;
                continue
            }

            let (shape, was_invalid) = repair_with_status(geom);
            report.repaired(was_invalid);

            let clipped = repair_multipolygon(study_area.clip(&shape));
            if clipped.0.is_empty() {
                report.clipped_out.push(GeoId::new(ids[i].as_deref().unwrap_or_default()));
                continue
            }

            rows.push(i as IdxSize);
            shapes.push(clipped);
        }

        let columns = config.output_columns();
        let data = features.data()
            .select(columns.iter().map(String::as_str))?
            .take(&IdxCa::from_vec("rows".into(), rows))?;

        info!(
            input = features.len(),
            kept = shapes.len(),
            by_county = report.filtered_by_county,
            by_land_area = report.filtered_by_land_area,
            clipped_out = report.clipped_out.len(),
            "filtered block groups to study area"
        );

        Self::new(&config.id_column, data, shapes, study_area.frame())
    }
}
