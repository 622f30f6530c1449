mod nearest;
mod overlay;
mod proj;
mod repair;

pub(crate) use proj::align_frame;
pub use repair::{repair, repair_multipolygon};
pub(crate) use repair::repair_with_status;
