use crate::error::{GpkgError, Result};
use crate::ogc_sql::{SQL_FEATURE_TABLES, SQL_HAS_LAYER_STYLES, SQL_LAYER_STYLES};
use crate::types::FeatureTable;
use rusqlite::Connection;
use std::collections::BTreeMap;

/// Enumerate the vector feature tables declared in the GeoPackage catalog.
///
/// Order is not significant; table names are unique because
/// `gpkg_contents.table_name` is the catalog's primary key.
pub(crate) fn feature_tables(conn: &Connection) -> Result<Vec<FeatureTable>> {
    let run = || -> rusqlite::Result<Vec<FeatureTable>> {
        let mut stmt = conn.prepare(SQL_FEATURE_TABLES)?;
        let tables = stmt
            .query_map([], |row| {
                Ok(FeatureTable {
                    table_name: row.get(0)?,
                    geometry_column: row.get(1)?,
                    srs_id: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<FeatureTable>>>()?;
        Ok(tables)
    };

    run().map_err(GpkgError::Catalog)
}

/// Read the `layer_styles` table into a layer-name to SLD mapping.
///
/// The table is optional; when it is absent the mapping is empty.
pub(crate) fn layer_styles(conn: &Connection) -> Result<BTreeMap<String, String>> {
    let run = || -> rusqlite::Result<BTreeMap<String, String>> {
        let mut stmt = conn.prepare(SQL_HAS_LAYER_STYLES)?;
        let mut rows = stmt.query([])?;
        if rows.next()?.is_none() {
            return Ok(BTreeMap::new());
        }

        let mut stmt = conn.prepare(SQL_LAYER_STYLES)?;
        let mut styles = BTreeMap::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let layer_name: String = row.get(0)?;
            let style_xml: String = row.get(1)?;
            styles.insert(layer_name, style_xml);
        }
        Ok(styles)
    };

    run().map_err(GpkgError::Catalog)
}
