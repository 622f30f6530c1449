use ahash::AHashMap;
use anyhow::{anyhow, ensure, Context, Result};
use geo::MultiPolygon;
use polars::prelude::*;

use crate::{Error, Frame, GeoId, Geometries};

/// Scratch column used to restore row order after a join.
const ROW_ORDER: &str = "__row_order";

/// A working set of block groups: one attribute row and one geometry per identifier.
///
/// `data` rows, `geo_ids` and geometries are row-aligned, and the identifier column in
/// `data` always matches `geo_ids`. Derived columns are attached by identifier-keyed joins
/// (see [`BlockGroups::merge_by_id`]), never by position in some other table.
#[derive(Debug, Clone)]
pub struct BlockGroups {
    id_column: String,
    geo_ids: Vec<GeoId>,
    index: AHashMap<GeoId, u32>, // Map between geo_ids and row indices.
    data: DataFrame,
    geoms: Geometries,
}

impl BlockGroups {
    /// Build a layer, checking that identifiers are present and unique and that
    /// the table and geometries line up.
    pub(crate) fn new(
        id_column: &str,
        data: DataFrame,
        geoms: Vec<MultiPolygon<f64>>,
        frame: Frame,
    ) -> Result<Self> {
        ensure!(
            data.height() == geoms.len(),
            Error::RowCountMismatch { layer: "block groups".into(), rows: data.height(), geoms: geoms.len() }
        );

        let ids = data.column(id_column)
            .map_err(|_| Error::missing_column("block groups", id_column))?
            .cast(&DataType::String)?;

        let geo_ids = ids.str()?.into_iter()
            .map(|id| id
                .map(GeoId::new)
                .ok_or_else(|| Error::DuplicateId { layer: "block groups".into(), id: "<null>".into() }))
            .collect::<Result<Vec<_>, _>>()?;

        let mut index = AHashMap::with_capacity(geo_ids.len());
        for (i, geo_id) in geo_ids.iter().enumerate() {
            if index.insert(geo_id.clone(), i as u32).is_some() {
                return Err(Error::DuplicateId { layer: "block groups".into(), id: geo_id.to_string() }.into());
            }
        }

        // Keep the identifier column as text so joins line up regardless of the source dtype.
        let mut data = data;
        data.with_column(ids.with_name(id_column.into()))?;

        Ok(Self {
            id_column: id_column.to_string(),
            geo_ids,
            index,
            data,
            geoms: Geometries::new(geoms, frame),
        })
    }

    /// Get the number of block groups.
    #[inline] pub fn len(&self) -> usize { self.geo_ids.len() }

    /// Check if there are no block groups.
    #[inline] pub fn is_empty(&self) -> bool { self.geo_ids.is_empty() }

    /// Name of the identifier column.
    #[inline] pub fn id_column(&self) -> &str { &self.id_column }

    #[inline] pub fn geo_ids(&self) -> &[GeoId] { &self.geo_ids }

    /// Attribute table, one row per block group.
    #[inline] pub fn data(&self) -> &DataFrame { &self.data }

    #[inline] pub fn geometries(&self) -> &Geometries { &self.geoms }

    #[inline] pub fn frame(&self) -> Frame { self.geoms.frame() }

    /// Row index of a block group.
    #[inline] pub fn row(&self, geo_id: &GeoId) -> Option<usize> {
        self.index.get(geo_id).map(|&i| i as usize)
    }

    #[inline] pub fn contains(&self, geo_id: &GeoId) -> bool { self.index.contains_key(geo_id) }

    /// Geometry of a block group.
    pub fn geometry(&self, geo_id: &GeoId) -> Option<&MultiPolygon<f64>> {
        self.row(geo_id).map(|i| self.geoms.shape(i))
    }

    /// Values of a numeric column as f64.
    pub fn f64_values(&self, column: &str) -> Result<Vec<Option<f64>>> {
        let values = self.data.column(column)
            .map_err(|_| Error::missing_column("block groups", column))?
            .cast(&DataType::Float64)?;
        Ok(values.f64()?.into_iter().collect())
    }

    /// Values of a column as strings.
    pub fn str_values(&self, column: &str) -> Result<Vec<Option<String>>> {
        let values = self.data.column(column)
            .map_err(|_| Error::missing_column("block groups", column))?
            .cast(&DataType::String)?;
        Ok(values.str()?.into_iter().map(|v| v.map(str::to_string)).collect())
    }

    /// One block group's value in a column, as a string.
    pub fn str_value(&self, geo_id: &GeoId, column: &str) -> Result<Option<String>> {
        let row = self.row(geo_id).ok_or_else(|| anyhow!("unknown block group {geo_id}"))?;
        Ok(self.str_values(column)?.swap_remove(row))
    }

    /// Keep only the given rows, in the given order.
    pub(crate) fn select_rows(&self, rows: &[u32]) -> Result<Self> {
        let idx = IdxCa::from_vec("idx".into(), rows.iter().map(|&r| r as IdxSize).collect());
        let data = self.data.take(&idx)?;
        let geoms = rows.iter().map(|&r| self.geoms.shape(r as usize).clone()).collect();
        Self::new(&self.id_column, data, geoms, self.frame())
    }

    /// Replace every geometry, keeping attributes and identifiers.
    pub(crate) fn with_geometries(self, geoms: Vec<MultiPolygon<f64>>) -> Result<Self> {
        ensure!(
            geoms.len() == self.len(),
            Error::RowCountMismatch { layer: "block groups".into(), rows: self.len(), geoms: geoms.len() }
        );
        let frame = self.frame();
        Ok(Self { geoms: Geometries::new(geoms, frame), ..self })
    }

    /// Add (or overwrite) a column computed row-by-row from this same table.
    pub(crate) fn with_column(mut self, column: Column) -> Result<Self> {
        ensure!(column.len() == self.len(), "column {} has {} values for {} rows", column.name(), column.len(), self.len());
        self.data.with_column(column)?;
        Ok(self)
    }

    /// Left-join `df` onto the table by identifier, preserving row order.
    /// `df` must carry the identifier column; rows it lacks get nulls. Existing columns
    /// that `df` also carries are replaced.
    pub(crate) fn merge_by_id(mut self, df: DataFrame) -> Result<Self> {
        let id_column = self.id_column.clone();

        // Assert id_col exists and can be compared as a string
        let ids = df.column(&id_column)
            .with_context(|| format!("merge_by_id: missing id column {id_column:?}"))?
            .cast(&DataType::String)?;
        let mut df = df;
        df.with_column(ids)?;

        for name in df.get_column_names_owned() {
            if name.as_str() != id_column && self.data.column(name.as_str()).is_ok() {
                self.data = self.data.drop(name.as_str())?;
            }
        }

        let height = self.data.height();
        self.data = self.data
            .with_row_index(ROW_ORDER.into(), None)?
            .left_join(&df, [id_column.as_str()], [id_column.as_str()])?
            .sort([ROW_ORDER], SortMultipleOptions::default())?
            .drop(ROW_ORDER)?;

        ensure!(
            self.data.height() == height,
            "merge_by_id: joined table has {} rows, expected {} (duplicate identifiers in the right table?)",
            self.data.height(), height
        );

        Ok(self)
    }
}
