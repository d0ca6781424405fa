//! Fixture GeoPackages for tests, written through plain rusqlite so the
//! reader is exercised against real SQLite files.

use crate::error::Result;
use geo_traits::GeometryTrait;
use geo_types::{LineString, Point};
use rusqlite::{Connection, OpenFlags};
use tempfile::NamedTempFile;

const SQL_FIXTURE_CATALOG: &str = "
CREATE TABLE gpkg_contents (
  table_name TEXT NOT NULL PRIMARY KEY,
  data_type TEXT NOT NULL,
  identifier TEXT UNIQUE,
  srs_id INTEGER
);
CREATE TABLE gpkg_geometry_columns (
  table_name TEXT NOT NULL,
  column_name TEXT NOT NULL,
  geometry_type_name TEXT NOT NULL,
  srs_id INTEGER NOT NULL,
  z TINYINT NOT NULL,
  m TINYINT NOT NULL
);
";

const SQL_FIXTURE_LAYER_STYLES: &str = "
CREATE TABLE layer_styles (
  id INTEGER PRIMARY KEY,
  f_table_name TEXT,
  styleQML TEXT,
  styleSLD TEXT
);
";

pub(crate) struct Fixture {
    file: NamedTempFile,
}

impl Fixture {
    /// A GeoPackage with a `roads` layer (EPSG:4326, two linestrings), a
    /// `buildings` layer (EPSG:27700, one point with a 32-byte envelope in
    /// its geometry cells), and a non-feature catalog row that must be
    /// filtered out.
    pub(crate) fn two_tables(with_styles: bool) -> Result<Self> {
        let file = NamedTempFile::new()?;
        let conn = Connection::open(file.path())?;
        conn.execute_batch(SQL_FIXTURE_CATALOG)?;

        conn.execute_batch(
            "CREATE TABLE roads (fid INTEGER PRIMARY KEY, geom BLOB, name TEXT);
             CREATE TABLE buildings (fid INTEGER PRIMARY KEY, geom BLOB, height REAL);",
        )?;
        conn.execute_batch(
            "INSERT INTO gpkg_contents (table_name, data_type, identifier, srs_id)
             VALUES ('roads', 'features', 'roads', 4326),
                    ('buildings', 'features', 'buildings', 27700),
                    ('basemap', 'tiles', 'basemap', 3857);
             INSERT INTO gpkg_geometry_columns
             VALUES ('roads', 'geom', 'LINESTRING', 4326, 0, 0),
                    ('buildings', 'geom', 'POINT', 27700, 0, 0);",
        )?;

        let road = LineString::from(Self::road_coords());
        conn.execute(
            "INSERT INTO roads (geom, name) VALUES (?1, 'high street')",
            [geometry_cell(&road, 4326)?],
        )?;
        let side_road = LineString::from(vec![(0.5, 50.5), (0.6, 50.6)]);
        conn.execute(
            "INSERT INTO roads (geom, name) VALUES (?1, 'side street')",
            [geometry_cell(&side_road, 4326)?],
        )?;

        let (x, y) = Self::building_coord();
        conn.execute(
            "INSERT INTO buildings (geom, height) VALUES (?1, 12.5)",
            [geometry_cell_with_envelope(&Point::new(x, y), 27700, (x, x, y, y))?],
        )?;

        if with_styles {
            conn.execute_batch(SQL_FIXTURE_LAYER_STYLES)?;
            conn.execute(
                "INSERT INTO layer_styles (f_table_name, styleQML, styleSLD)
                 VALUES ('roads', '<qml/>', '<sld/>')",
                [],
            )?;
        }

        Ok(Self { file })
    }

    /// A `roads` fixture whose second row has a NULL geometry cell.
    pub(crate) fn with_null_geometry() -> Result<Self> {
        let file = NamedTempFile::new()?;
        let conn = Connection::open(file.path())?;
        conn.execute_batch(SQL_FIXTURE_CATALOG)?;
        conn.execute_batch("CREATE TABLE roads (fid INTEGER PRIMARY KEY, geom BLOB, name TEXT)")?;
        conn.execute_batch(
            "INSERT INTO gpkg_contents (table_name, data_type, identifier, srs_id)
             VALUES ('roads', 'features', 'roads', 4326);
             INSERT INTO gpkg_geometry_columns
             VALUES ('roads', 'geom', 'LINESTRING', 4326, 0, 0);",
        )?;

        let road = LineString::from(Self::road_coords());
        conn.execute(
            "INSERT INTO roads (geom, name) VALUES (?1, 'high street')",
            [geometry_cell(&road, 4326)?],
        )?;
        conn.execute("INSERT INTO roads (geom, name) VALUES (NULL, 'ghost road')", [])?;

        Ok(Self { file })
    }

    /// A valid SQLite file that is not a GeoPackage at all.
    pub(crate) fn plain_sqlite() -> Result<Self> {
        let file = NamedTempFile::new()?;
        let conn = Connection::open(file.path())?;
        conn.execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT)")?;
        Ok(Self { file })
    }

    pub(crate) fn connection(&self) -> Result<Connection> {
        let conn =
            Connection::open_with_flags(self.file.path(), OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(conn)
    }

    pub(crate) fn bytes(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(self.file.path())?)
    }

    pub(crate) fn path(&self) -> &std::path::Path {
        self.file.path()
    }

    pub(crate) fn road_coords() -> Vec<(f64, f64)> {
        vec![(0.0, 51.0), (0.25, 51.25), (0.5, 51.5)]
    }

    pub(crate) fn building_coord() -> (f64, f64) {
        (530_000.0, 180_000.0)
    }
}

// cf. https://www.geopackage.org/spec140/index.html#gpb_format
fn geometry_cell<G: GeometryTrait<T = f64>>(geometry: &G, srs_id: u32) -> Result<Vec<u8>> {
    let mut wkb = Vec::new();
    wkb::writer::write_geometry(&mut wkb, geometry, &Default::default())?;

    let mut cell = Vec::with_capacity(wkb.len() + 8);
    cell.extend_from_slice(&[
        0x47, // magic
        0x50, // magic
        0x00, // version
        0x01, // flags: little endian srs_id, no envelope
    ]);
    cell.extend_from_slice(&srs_id.to_le_bytes());
    cell.extend_from_slice(&wkb);
    Ok(cell)
}

fn geometry_cell_with_envelope<G: GeometryTrait<T = f64>>(
    geometry: &G,
    srs_id: u32,
    (minx, maxx, miny, maxy): (f64, f64, f64, f64),
) -> Result<Vec<u8>> {
    let mut wkb = Vec::new();
    wkb::writer::write_geometry(&mut wkb, geometry, &Default::default())?;

    let mut cell = Vec::with_capacity(wkb.len() + 40);
    cell.extend_from_slice(&[
        0x47, // magic
        0x50, // magic
        0x00, // version
        0x03, // flags: little endian srs_id, [minx, maxx, miny, maxy] envelope
    ]);
    cell.extend_from_slice(&srs_id.to_le_bytes());
    for bound in [minx, maxx, miny, maxy] {
        cell.extend_from_slice(&bound.to_le_bytes());
    }
    cell.extend_from_slice(&wkb);
    Ok(cell)
}
