// cf. https://www.geopackage.org/spec140/index.html#table_definition_sql

// gpkg_contents lists all geospatial contents in the package;
// gpkg_geometry_columns identifies geometry columns for vector feature
// tables. Joining the two on table_name and filtering on data_type gives
// every vector layer together with its geometry column and SRS.
pub(crate) const SQL_FEATURE_TABLES: &str = "
SELECT c.table_name, g.column_name, g.srs_id
FROM gpkg_contents AS c
JOIN gpkg_geometry_columns AS g ON g.table_name = c.table_name
WHERE c.data_type = 'features'
";

// layer_styles is not part of the GeoPackage core; it is the QGIS/OGR
// convention for shipping SLD symbology alongside the data.
pub(crate) const SQL_HAS_LAYER_STYLES: &str =
    "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'layer_styles' LIMIT 1";

pub(crate) const SQL_LAYER_STYLES: &str = "SELECT f_table_name, styleSLD FROM layer_styles";

pub(crate) fn sql_select_all(table_name: &str) -> String {
    format!(r#"SELECT * FROM "{table_name}""#)
}
