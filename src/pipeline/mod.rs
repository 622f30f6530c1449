mod area_type;
mod difference;
mod filter;
mod income;
mod report;
mod run;
mod study_area;

pub use area_type::AreaTypes;
pub use difference::{Partition, PopulationCenters};
pub use report::RunReport;
pub use run::{run, Inputs, Output};
pub use study_area::{Boundary, BoundarySource, StaticBoundaries, StudyArea};
