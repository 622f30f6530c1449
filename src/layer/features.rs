use anyhow::{ensure, Result};
use geo::Geometry;
use polars::prelude::*;

use crate::{Error, Frame};

/// A raw input layer: an attribute table and its geometries, row-aligned, in one frame.
/// This is the hand-off point from whatever reads the source files.
#[derive(Debug, Clone)]
pub struct Features {
    frame: Frame,
    data: DataFrame,
    geoms: Vec<Geometry<f64>>,
}

impl Features {
    /// Pair an attribute table with its geometries (row `i` describes `geoms[i]`).
    pub fn new(frame: Frame, data: DataFrame, geoms: Vec<Geometry<f64>>) -> Result<Self> {
        ensure!(
            data.height() == geoms.len(),
            Error::RowCountMismatch { layer: "features".into(), rows: data.height(), geoms: geoms.len() }
        );
        Ok(Self { frame, data, geoms })
    }

    /// A layer with geometry only; the table holds just a row number.
    pub fn from_geometries(frame: Frame, geoms: Vec<Geometry<f64>>) -> Result<Self> {
        let rows = (0..geoms.len() as u32).collect::<Vec<_>>();
        let data = DataFrame::new(vec![Column::new("row".into(), rows)])?;
        Self::new(frame, data, geoms)
    }

    #[inline] pub fn frame(&self) -> Frame { self.frame }

    #[inline] pub fn data(&self) -> &DataFrame { &self.data }

    #[inline] pub fn geoms(&self) -> &[Geometry<f64>] { &self.geoms }

    #[inline] pub fn len(&self) -> usize { self.geoms.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.geoms.is_empty() }

    /// Fail with a schema error naming the first column `layer` lacks.
    pub(crate) fn require_columns<S: AsRef<str>>(&self, layer: &str, columns: &[S]) -> Result<()> {
        for column in columns {
            let column = column.as_ref();
            if self.data.column(column).is_err() {
                return Err(Error::missing_column(layer, column).into());
            }
        }
        Ok(())
    }

    /// Values of a column as strings (numbers are formatted, nulls stay `None`).
    pub(crate) fn str_values(&self, layer: &str, column: &str) -> Result<Vec<Option<String>>> {
        let values = self.data.column(column)
            .map_err(|_| Error::missing_column(layer, column))?
            .cast(&DataType::String)?;
        Ok(values.str()?.into_iter().map(|v| v.map(str::to_string)).collect())
    }

    /// Values of a numeric column as f64 (unparseable entries become `None`).
    pub(crate) fn f64_values(&self, layer: &str, column: &str) -> Result<Vec<Option<f64>>> {
        let values = self.data.column(column)
            .map_err(|_| Error::missing_column(layer, column))?
            .cast(&DataType::Float64)?;
        Ok(values.f64()?.into_iter().collect())
    }
}
