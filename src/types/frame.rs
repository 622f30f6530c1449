use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Error;

/// A coordinate reference frame, identified by its EPSG code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frame(u32);

impl Frame {
    /// NAD83 lon/lat, used by TIGER/Line boundaries.
    pub const NAD83: Frame = Frame(4269);
    /// WGS84 lon/lat.
    pub const WGS84: Frame = Frame(4326);
    /// WGS84 / UTM zone 10N, covering western Washington.
    pub const UTM_10N: Frame = Frame(32610);

    #[inline] pub const fn epsg(code: u32) -> Self { Self(code) }

    #[inline] pub fn code(&self) -> u32 { self.0 }

    /// Geographic frames take and return degrees; everything else is planar meters.
    #[inline]
    pub fn is_geographic(&self) -> bool {
        matches!(self.0, 4269 | 4326 | 4937 | 4979)
    }

    /// PROJ.4 definition for this frame.
    /// - WGS84 UTM: 326zz (north) / 327zz (south)
    /// - NAD83 UTM: 269zz (zones 1–23)
    pub(crate) fn proj4(&self) -> Result<String, Error> {
        let proj = match self.0 {
            4269 | 4937 => "+proj=longlat +datum=NAD83 +no_defs +type=crs".to_string(),
            4326 | 4979 => "+proj=longlat +datum=WGS84 +no_defs +type=crs".to_string(),
            3857 => "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs +type=crs".to_string(),
            5070 => "+proj=aea +lat_0=23 +lon_0=-96 +lat_1=29.5 +lat_2=45.5 +x_0=0 +y_0=0 +datum=NAD83 +units=m +no_defs +type=crs".to_string(),
            code @ 32601..=32660 => {
                format!("+proj=utm +zone={} +datum=WGS84 +units=m +no_defs +type=crs", code - 32600)
            }
            code @ 32701..=32760 => {
                format!("+proj=utm +zone={} +south +datum=WGS84 +units=m +no_defs +type=crs", code - 32700)
            }
            code @ 26901..=26923 => {
                format!("+proj=utm +zone={} +datum=NAD83 +units=m +no_defs +type=crs", code - 26900)
            }
            code => return Err(Error::UnsupportedFrame(code)),
        };
        Ok(proj)
    }
}

impl Default for Frame {
    fn default() -> Self { Self::UTM_10N }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}
