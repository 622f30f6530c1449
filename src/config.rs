use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::Frame;

/// Smart Location Database columns carried through to the output.
const SLD_SELECTED_COLUMNS: &[&str] = &[
    "GEOID10", "CSA_Name", "CBSA_Name", "Ac_Land", "Ac_Unpr", "Ac_Water", "TotPop", "CountHU",
    "HH", "P_WrkAge", "White", "Male", "Residents", "Drivers", "Vehicles", "GasPrice", "Pct_AO0",
    "R_LowWageWk", "R_MedWageWk", "R_HiWageWk", "R_PCTLOWWAGE", "E_LowWageWk", "E_MedWageWk",
    "E_HiWageWk", "E_PctLowWage", "D3A", "D3AAO", "D3AMM", "D3APO", "D3B", "D3BAO", "D3BMM3",
    "D3BMM4", "D3BPO3", "D3BPO4", "D4A", "D4B025", "D4B050", "D4C", "D4D", "D4E", "D5AR", "D5AE",
    "D5BR", "D5BE",
];

/// Everything a run needs that is not input data.
/// Any field missing from a JSON config falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Canonical frame every geometric operation runs in (EPSG code).
    pub frame: Frame,
    /// State handed to the boundary source.
    pub state: String,
    /// County names making up the study area.
    pub counties: Vec<String>,

    /// Block group identifier column.
    pub id_column: String,
    pub state_column: String,
    pub county_column: String,
    /// Land area; rows with a non-positive value are dropped.
    pub land_area_column: String,
    /// Share of resident workers earning low wages.
    pub home_wage_column: String,
    /// Share of employees earning low wages.
    pub work_wage_column: String,
    /// Numeric locale code on the area-type layer.
    pub locale_column: String,

    /// Attribute columns kept on block groups after filtering.
    pub selected_columns: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            frame: Frame::UTM_10N,
            state: String::new(),
            counties: Vec::new(),
            id_column: "GEOID10".to_string(),
            state_column: "STATEFP".to_string(),
            county_column: "COUNTYFP".to_string(),
            land_area_column: "Ac_Land".to_string(),
            home_wage_column: "R_PCTLOWWAGE".to_string(),
            work_wage_column: "E_PctLowWage".to_string(),
            locale_column: "LOCALE".to_string(),
            selected_columns: SLD_SELECTED_COLUMNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PipelineConfig {
    /// Parse a config from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse pipeline config")
    }

    /// Read a config from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read pipeline config {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("Invalid pipeline config {}", path.display()))
    }

    /// Columns of the filtered block-group table: the identifier first, then the
    /// selected columns in order, without duplicates or a `geometry` entry. The two wage
    /// columns are appended when not selected, since income categories are derived from them.
    pub(crate) fn output_columns(&self) -> Vec<String> {
        let mut columns = vec![self.id_column.clone()];
        for column in self.selected_columns.iter().chain([&self.home_wage_column, &self.work_wage_column]) {
            if column != "geometry" && !columns.contains(column) {
                columns.push(column.clone());
            }
        }
        columns
    }

    /// Columns the raw block-group table must provide.
    pub(crate) fn required_block_group_columns(&self) -> Vec<String> {
        let mut columns = self.output_columns();
        for column in [
            &self.state_column,
            &self.county_column,
            &self.land_area_column,
            &self.home_wage_column,
            &self.work_wage_column,
        ] {
            if !columns.contains(column) {
                columns.push(column.clone());
            }
        }
        columns
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_follow_the_smart_location_database() {
        let config = PipelineConfig::default();
        assert_eq!(config.frame, Frame::epsg(32610));
        assert_eq!(config.id_column, "GEOID10");
        assert_eq!(config.selected_columns.len(), 45);
        assert!(config.selected_columns.iter().any(|c| c == "R_PCTLOWWAGE"));
    }

    #[test]
    fn output_columns_put_id_first_without_duplicates() {
        let config = PipelineConfig {
            selected_columns: vec!["TotPop".into(), "GEOID10".into(), "geometry".into(), "TotPop".into()],
            ..PipelineConfig::default()
        };
        assert_eq!(config.output_columns(), vec!["GEOID10", "TotPop", "R_PCTLOWWAGE", "E_PctLowWage"]);
    }

    #[test]
    fn required_columns_include_filter_keys() {
        let config = PipelineConfig {
            selected_columns: vec!["R_PCTLOWWAGE".into()],
            ..PipelineConfig::default()
        };
        assert_eq!(
            config.required_block_group_columns(),
            vec!["GEOID10", "R_PCTLOWWAGE", "E_PctLowWage", "STATEFP", "COUNTYFP", "Ac_Land"],
        );
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = PipelineConfig::from_json_str(
            r#"{ "frame": 26910, "state": "WA", "counties": ["King", "Pierce"] }"#
        ).unwrap();
        assert_eq!(config.frame, Frame::epsg(26910));
        assert_eq!(config.counties, vec!["King", "Pierce"]);
        assert_eq!(config.land_area_column, "Ac_Land");
    }

    #[test]
    fn reads_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "state": "OR", "locale_column": "LOCALE_CD" }}"#).unwrap();

        let config = PipelineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.state, "OR");
        assert_eq!(config.locale_column, "LOCALE_CD");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(PipelineConfig::from_json_str("{ frame: }").is_err());
    }
}
