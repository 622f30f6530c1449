use anyhow::Result;
use polars::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};

/// Categories of a point of interest, as embedded JSON in POI extracts:
/// `{"primary": "restaurant", "alternate": ["bar", "cafe"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoiCategories {
    pub primary: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub alternate: Vec<String>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl PoiCategories {
    /// Decode one value. Missing or malformed input gives the empty default, never an error.
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|text| serde_json::from_str(text).ok()).unwrap_or_default()
    }

    /// Decode a whole column; non-string columns decode to defaults.
    pub fn from_column(data: &DataFrame, column: &str) -> Result<Vec<Self>> {
        let values = data.column(column)?;
        Ok(match values.str() {
            Ok(values) => values.into_iter().map(Self::parse).collect(),
            Err(_) => vec![Self::default(); values.len()],
        })
    }

    /// The primary category followed by the alternates.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.primary.iter().chain(&self.alternate).map(String::as_str)
    }
}
