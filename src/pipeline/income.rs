use anyhow::Result;
use polars::prelude::*;
use tracing::info;

use crate::{layer::columns, BlockGroups, PipelineConfig, RunReport, WageCategory};

/// Median of the present, non-NaN values; `None` if there are none.
pub(crate) fn median(values: &[Option<f64>]) -> Option<f64> {
    let present = values.iter()
        .flatten()
        .copied()
        .filter(|v| !v.is_nan())
        .collect::<Vec<_>>();
    Float64Chunked::from_vec("values".into(), present).median()
}

impl BlockGroups {
    /// Label every block group above or below the median low-wage share, where it lives
    /// (home) and where it works (work), plus the combined "<home>_<work>" label.
    /// Medians are taken over the whole working set.
    pub fn assign_income_categories(self, config: &PipelineConfig, report: &mut RunReport) -> Result<Self> {
        let home = self.f64_values(&config.home_wage_column)?;
        let work = self.f64_values(&config.work_wage_column)?;

        let home_median = median(&home);
        let work_median = median(&work);
        report.home_wage_median = home_median;
        report.work_wage_median = work_median;
        info!(?home_median, ?work_median, "assigning low-wage categories");

        let home = home.into_iter().map(|v| WageCategory::classify(v, home_median)).collect::<Vec<_>>();
        let work = work.into_iter().map(|v| WageCategory::classify(v, work_median)).collect::<Vec<_>>();
        let combined = home.iter().zip(&work)
            .map(|(&h, &w)| WageCategory::combined(h, w))
            .collect::<Vec<_>>();

        self.with_column(Column::new(columns::HOME_WAGE_CATEGORY.into(), home.iter().map(|c| c.as_str()).collect::<Vec<_>>()))?
            .with_column(Column::new(columns::WORK_WAGE_CATEGORY.into(), work.iter().map(|c| c.as_str()).collect::<Vec<_>>()))?
            .with_column(Column::new(columns::COMBINED_WAGE_CATEGORY.into(), combined))
    }
}
