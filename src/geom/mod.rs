mod algorithm;
mod bbox;
mod geom;

use bbox::BoundingBox;
pub use geom::Geometries;
pub(crate) use geom::union_all;
pub(crate) use algorithm::{align_frame, repair_with_status};
pub use algorithm::{repair, repair_multipolygon};
