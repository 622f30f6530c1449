#![doc = "RuralGap public API: census block groups outside population centers, by locale and low-wage share"]
mod config;
mod error;
mod geom;
mod layer;
mod pipeline;
mod poi;
mod summary;
mod types;

#[doc(inline)]
pub use config::PipelineConfig;

#[doc(inline)]
pub use error::Error;

#[doc(inline)]
pub use geom::{repair, repair_multipolygon, Geometries};

#[doc(inline)]
pub use layer::{columns, BlockGroups, Features};

#[doc(inline)]
pub use pipeline::{
    run, AreaTypes, Boundary, BoundarySource, Inputs, Output, Partition, PopulationCenters,
    RunReport, StaticBoundaries, StudyArea,
};

#[doc(inline)]
pub use poi::PoiCategories;

#[doc(inline)]
pub use summary::{Summary, WageStats};

#[doc(inline)]
pub use types::{CountyKey, Frame, GeoId, Locale, WageCategory};
