use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use polars::prelude::*;

use crate::{layer::columns, BlockGroups, PipelineConfig};

/// Descriptive statistics of one wage-share column within one combined category.
#[derive(Debug, Clone, PartialEq)]
pub struct WageStats {
    pub column: String,
    pub category: String,
    /// Number of present values.
    pub n: usize,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
    pub mean: Option<f64>,
    /// Sample standard deviation (ddof = 1).
    pub sd: Option<f64>,
    pub median: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl WageStats {
    fn compute(column: &str, category: &str, values: Vec<f64>) -> Result<Self> {
        let ca = Float64Chunked::from_vec(column.into(), values);
        Ok(Self {
            column: column.to_string(),
            category: category.to_string(),
            n: ca.len(),
            q1: ca.quantile(0.25, QuantileMethod::Linear)?,
            q3: ca.quantile(0.75, QuantileMethod::Linear)?,
            mean: ca.mean(),
            sd: ca.std(1),
            median: ca.median(),
            min: ca.min(),
            max: ca.max(),
        })
    }

    /// "median [min, max]" with two decimals.
    pub fn median_range(&self) -> String {
        format!("{} [{}, {}]", fixed2(self.median), fixed2(self.min), fixed2(self.max))
    }
}

fn fixed2(value: Option<f64>) -> String {
    value.map_or_else(|| "nan".to_string(), |v| format!("{v:.2}"))
}

fn plain(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}

/// Summary tables for the partially outside block groups.
#[derive(Debug, Clone)]
pub struct Summary {
    /// Combined wage categories present, sorted.
    pub categories: Vec<String>,
    /// Per wage column, then per category.
    pub wage: Vec<WageStats>,
    /// Locale by combined category; cells read "count (pct%)" with percentages per category.
    pub locales: DataFrame,
}

impl Summary {
    pub fn compute(groups: &BlockGroups, config: &PipelineConfig) -> Result<Self> {
        let categories = groups.str_values(columns::COMBINED_WAGE_CATEGORY)?;
        let present = categories.iter().flatten().cloned().collect::<BTreeSet<_>>();

        let mut wage = Vec::new();
        for column in [&config.home_wage_column, &config.work_wage_column] {
            let values = groups.f64_values(column)?;
            let mut by_category = present.iter()
                .map(|c| (c.as_str(), Vec::new()))
                .collect::<BTreeMap<_, _>>();
            for (category, value) in categories.iter().zip(values) {
                if let (Some(category), Some(value)) = (category, value) {
                    if !value.is_nan() {
                        by_category.entry(category.as_str()).or_default().push(value);
                    }
                }
            }
            for (category, values) in by_category {
                wage.push(WageStats::compute(column, category, values)?);
            }
        }

        let locales = crosstab(&groups.str_values(columns::LOCALE)?, &categories)?;

        Ok(Self { categories: present.into_iter().collect(), wage, locales })
    }

    /// Statistics of `column` for `category`.
    pub fn stats(&self, column: &str, category: &str) -> Option<&WageStats> {
        self.wage.iter().find(|s| s.column == column && s.category == category)
    }

    /// Everything as one text table: a section and a statistic per row, a column per category.
    pub fn to_frame(&self) -> Result<DataFrame> {
        const STATISTICS: [&str; 6] = ["N", "Q1", "Q3", "Mean", "SD", "Median [Min, Max]"];

        let mut sections = Vec::new();
        let mut statistics = Vec::new();
        let mut cells = vec![Vec::new(); self.categories.len()];

        let mut wage_columns = Vec::new();
        for stats in &self.wage {
            if !wage_columns.contains(&stats.column) { wage_columns.push(stats.column.clone()) }
        }

        for column in &wage_columns {
            for statistic in STATISTICS {
                sections.push(column.clone());
                statistics.push(statistic.to_string());
                for (category, cells) in self.categories.iter().zip(cells.iter_mut()) {
                    cells.push(self.stats(column, category).map(|s| match statistic {
                        "N" => s.n.to_string(),
                        "Q1" => plain(s.q1),
                        "Q3" => plain(s.q3),
                        "Mean" => plain(s.mean),
                        "SD" => plain(s.sd),
                        _ => s.median_range(),
                    }));
                }
            }
        }

        let labels = self.locales.column(columns::LOCALE)?.str()?
            .into_iter()
            .map(|locale| locale.unwrap_or_default().to_string())
            .collect::<Vec<_>>();
        for (row, locale) in labels.into_iter().enumerate() {
            sections.push(columns::LOCALE.to_string());
            statistics.push(locale);
            for (category, cells) in self.categories.iter().zip(cells.iter_mut()) {
                let cell = match self.locales.column(category) {
                    Ok(column) => column.str()?.get(row).map(str::to_string),
                    Err(_) => None,
                };
                cells.push(cell);
            }
        }

        let mut frame = vec![
            Column::new("section".into(), sections),
            Column::new("statistic".into(), statistics),
        ];
        for (category, cells) in self.categories.iter().zip(cells) {
            frame.push(Column::new(category.as_str().into(), cells));
        }
        Ok(DataFrame::new(frame)?)
    }
}

/// Count rows per (locale, category), rendering each cell as "count (pct%)".
/// Rows missing either label are left out, and so is a category with no labelled rows.
fn crosstab(locales: &[Option<String>], categories: &[Option<String>]) -> Result<DataFrame> {
    let mut counts: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    let mut totals: BTreeMap<&str, usize> = BTreeMap::new();
    for (locale, category) in locales.iter().zip(categories) {
        if let (Some(locale), Some(category)) = (locale, category) {
            *counts.entry(locale.as_str()).or_default().entry(category.as_str()).or_default() += 1;
            *totals.entry(category.as_str()).or_default() += 1;
        }
    }

    let mut frame = vec![Column::new(columns::LOCALE.into(), counts.keys().copied().collect::<Vec<_>>())];
    for (&category, &total) in &totals {
        let cells = counts.values()
            .map(|row| {
                let count = row.get(category).copied().unwrap_or(0);
                format!("{count} ({:.1}%)", count as f64 / total as f64 * 100.0)
            })
            .collect::<Vec<_>>();
        frame.push(Column::new(category.into(), cells));
    }

    Ok(DataFrame::new(frame)?)
}
