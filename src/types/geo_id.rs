use std::{fmt, sync::Arc};

use serde::{Serialize, Serializer};

/// Stable key for a block group.
/// Keeps the original GEOID text (with leading zeros) but avoids repeated owned Strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeoId(Arc<str>); // e.g., "530330001001"

impl GeoId {
    pub fn new(id: &str) -> Self { Self(Arc::from(id.trim())) }

    #[inline] pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for GeoId {
    fn from(id: &str) -> Self { Self::new(id) }
}

impl Serialize for GeoId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl fmt::Display for GeoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// State + county FIPS pair, e.g. ("53", "033") for King County, WA.
/// Numeric inputs lose their leading zeros, so both parts are re-padded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountyKey {
    state: Arc<str>,
    county: Arc<str>,
}

impl CountyKey {
    pub fn new(state: &str, county: &str) -> Self {
        /// Left-pad all-digit codes to `width`; anything else is kept as written.
        fn pad(code: &str, width: usize) -> Arc<str> {
            let code = code.trim();
            if !code.is_empty() && code.len() < width && code.bytes().all(|b| b.is_ascii_digit()) {
                Arc::from(format!("{code:0>width$}"))
            } else {
                Arc::from(code)
            }
        }

        Self { state: pad(state, 2), county: pad(county, 3) }
    }

    #[inline] pub fn state(&self) -> &str { &self.state }

    #[inline] pub fn county(&self) -> &str { &self.county }
}

impl fmt::Display for CountyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.state, self.county)
    }
}
