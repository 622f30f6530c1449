use thiserror::Error as ThisError;

/// Fatal conditions for a run. Everything recoverable (invalid or degenerate geometry, unresolved
/// locales) goes into the [`RunReport`](crate::RunReport) instead.
#[derive(Debug, ThisError)]
pub enum Error {
    /// An input layer lacks a column the pipeline needs.
    #[error("{layer}: missing expected column `{column}`")]
    SchemaMismatch { layer: String, column: String },

    /// The identifier column has a repeated or missing value.
    #[error("{layer}: identifier `{id}` is duplicated or missing")]
    DuplicateId { layer: String, id: String },

    /// Attribute rows and geometries are not row-aligned.
    #[error("{layer}: {rows} attribute rows but {geoms} geometries")]
    RowCountMismatch { layer: String, rows: usize, geoms: usize },

    #[error("unsupported reference frame EPSG:{0}")]
    UnsupportedFrame(u32),

    #[error("failed to reproject from EPSG:{from} to EPSG:{to}: {reason}")]
    Reprojection { from: u32, to: u32, reason: String },

    /// None of the requested counties exist in the boundary source.
    #[error("study area is empty: none of {requested:?} found for state {state}")]
    EmptyStudyArea { state: String, requested: Vec<String> },

    /// Boundaries from more than one region ended up in one study area.
    #[error("study area mixes region codes {0} and {1}")]
    MixedRegion(String, String),
}

impl Error {
    pub(crate) fn missing_column(layer: &str, column: &str) -> Self {
        Self::SchemaMismatch { layer: layer.to_string(), column: column.to_string() }
    }
}
