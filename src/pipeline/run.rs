use anyhow::{Context, Result};
use tracing::info;

use crate::{
    layer::Features, summary::Summary, AreaTypes, BlockGroups, BoundarySource, Partition,
    PipelineConfig, PopulationCenters, RunReport, StudyArea,
};

/// The four input layers of a run.
pub struct Inputs<'a> {
    pub boundaries: &'a dyn BoundarySource,
    /// Smart Location Database block groups.
    pub block_groups: &'a Features,
    pub population_centers: &'a Features,
    /// NCES EDGE locale polygons.
    pub area_types: &'a Features,
}

/// Everything a run produces; each subset is independently addressable.
#[derive(Debug, Clone)]
pub struct Output {
    pub study_area: StudyArea,
    /// Block groups of the study area with income categories, before differencing.
    pub study_block_groups: BlockGroups,
    /// Population centers clipped to the study block groups.
    pub population_centers: PopulationCenters,
    pub outside: BlockGroups,
    pub intersecting: BlockGroups,
    /// Partially outside block groups with locales attached.
    pub partially_outside: BlockGroups,
    pub summary: Summary,
    pub report: RunReport,
}

/// Run the whole pipeline: study area, filtering, income categories, differencing,
/// area types, summary.
pub fn run(config: &PipelineConfig, inputs: Inputs<'_>) -> Result<Output> {
    let mut report = RunReport::default();

    info!(state = %config.state, counties = ?config.counties, frame = %config.frame, "loading study area");
    let study_area = StudyArea::load(inputs.boundaries, config, &mut report)
        .context("Failed to load study area")?;

    let study_block_groups = BlockGroups::filter_to_study_area(inputs.block_groups, &study_area, config, &mut report)
        .context("Failed to filter block groups")?
        .assign_income_categories(config, &mut report)
        .context("Failed to assign income categories")?;

    let population_centers = PopulationCenters::prepare(
        inputs.population_centers,
        &study_block_groups.geometries().union(),
        study_block_groups.frame(),
        &mut report,
    ).context("Failed to prepare population centers")?;

    let Partition { outside, intersecting, partially_outside } = study_block_groups
        .split_by_population_centers(&population_centers, &mut report)
        .context("Failed to difference block groups against population centers")?;

    let area_types = AreaTypes::prepare(inputs.area_types, &config.locale_column, partially_outside.frame(), &mut report)
        .context("Failed to prepare area types")?;
    let partially_outside = partially_outside.classify_area_types(&area_types, &mut report)
        .context("Failed to classify area types")?;

    let summary = Summary::compute(&partially_outside, config)
        .context("Failed to compute summary statistics")?;

    info!(
        study = study_block_groups.len(),
        outside = outside.len(),
        intersecting = intersecting.len(),
        partially_outside = partially_outside.len(),
        repaired = report.repaired_geometries,
        "run finished"
    );

    Ok(Output {
        study_area,
        study_block_groups,
        population_centers,
        outside,
        intersecting,
        partially_outside,
        summary,
        report,
    })
}
