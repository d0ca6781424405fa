use rusqlite::types::ValueRef;

/// Owned dynamic value for a single feature property, mirroring SQLite's
/// type system (null, integer, real, text, blob).
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(value) => Self::Integer(value),
            ValueRef::Real(value) => Self::Real(value),
            ValueRef::Text(value) => Self::Text(String::from_utf8_lossy(value).into_owned()),
            ValueRef::Blob(value) => Self::Blob(value.to_vec()),
        }
    }
}

#[derive(Clone, Debug)]
/// One vector feature table discovered in the GeoPackage catalog.
pub struct FeatureTable {
    pub table_name: String,
    pub geometry_column: String,
    pub srs_id: i64,
}

impl FeatureTable {
    /// The table's spatial reference in `EPSG:<id>` form.
    pub fn srs(&self) -> String {
        format!("EPSG:{}", self.srs_id)
    }
}
