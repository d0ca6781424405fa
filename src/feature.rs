use crate::error::{GpkgError, Result};
use crate::geometry::gpkg_geometry_to_wkb;
use crate::ogc_sql::sql_select_all;
use crate::projection::{CompiledProjection, ProjectionRegistry, reproject_geometry};
use crate::types::{FeatureTable, Value};
use geo_traits::to_geo::ToGeoGeometry;
use geo_types::Geometry;
use rusqlite::Connection;
use wkb::reader::Wkb;

/// A single feature: a decoded, reprojected geometry plus the row's
/// remaining columns as ordered properties.
#[derive(Clone, Debug)]
pub struct Feature {
    pub geometry: Geometry<f64>,
    pub properties: Vec<(String, Value)>,
}

impl Feature {
    /// Look up a property value by column name.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(property, _)| property == name)
            .map(|(_, value)| value)
    }
}

/// All features of one table, tagged with the table's original spatial
/// reference in `EPSG:<id>` form.
#[derive(Clone, Debug)]
pub struct FeatureCollection {
    pub orig_projection: String,
    pub features: Vec<Feature>,
}

struct RawRow {
    geometry: Option<Vec<u8>>,
    properties: Vec<(String, Value)>,
}

/// Read every row of a feature table, strip and decode each geometry cell,
/// and reproject into the display projection.
///
/// One bad row aborts the whole table; there is no per-feature tolerance.
pub(crate) fn materialize_table(
    conn: &Connection,
    table: &FeatureTable,
    registry: &ProjectionRegistry,
    display: &CompiledProjection,
) -> Result<FeatureCollection> {
    let srs = table.srs();
    let source = registry
        .compile(&srs)?
        .ok_or_else(|| GpkgError::UnknownSourceProjection {
            table_name: table.table_name.clone(),
            crs: srs.clone(),
        })?;

    let sql = sql_select_all(&table.table_name);
    let mut stmt = conn.prepare(&sql)?;
    let column_names: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    let geometry_idx = column_names
        .iter()
        .position(|name| *name == table.geometry_column)
        .ok_or_else(|| GpkgError::MissingGeometryColumn {
            table_name: table.table_name.clone(),
            column: table.geometry_column.clone(),
        })?;

    let rows = stmt
        .query_map([], |row| {
            let mut geometry = None;
            let mut properties = Vec::with_capacity(column_names.len() - 1);

            for (idx, name) in column_names.iter().enumerate() {
                let value_ref = row.get_ref(idx)?;
                let value = Value::from(value_ref);
                if idx == geometry_idx {
                    match value {
                        Value::Blob(bytes) => geometry = Some(bytes),
                        Value::Null => geometry = None,
                        _ => {
                            return Err(rusqlite::Error::InvalidColumnType(
                                idx,
                                name.clone(),
                                value_ref.data_type(),
                            ));
                        }
                    }
                } else {
                    properties.push((name.clone(), value));
                }
            }

            Ok(RawRow {
                geometry,
                properties,
            })
        })?
        .collect::<rusqlite::Result<Vec<RawRow>>>()?;

    let mut features = Vec::with_capacity(rows.len());
    for row in rows {
        let cell = row.geometry.ok_or_else(|| GpkgError::NullGeometry {
            table_name: table.table_name.clone(),
        })?;
        let geometry = decode_geometry(&cell, &table.table_name)?;
        let geometry = reproject_geometry(&geometry, &source, display)?;
        features.push(Feature {
            geometry,
            properties: row.properties,
        });
    }

    log::debug!(
        "materialized {} features from table '{}' ({srs})",
        features.len(),
        table.table_name,
    );

    Ok(FeatureCollection {
        orig_projection: srs,
        features,
    })
}

fn decode_geometry(cell: &[u8], table_name: &str) -> Result<Geometry<f64>> {
    let payload = gpkg_geometry_to_wkb(cell)?;
    let wkb = Wkb::try_new(payload)?;
    wkb.try_to_geometry()
        .ok_or_else(|| GpkgError::UnsupportedGeometryType {
            table_name: table_name.to_string(),
        })
}
