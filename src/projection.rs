use crate::error::Result;
use geo_types::{
    Coord, Geometry, GeometryCollection, Line, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon, Rect, Triangle,
};
use proj4rs::proj::Proj;
use proj4rs::transform::transform;
use std::collections::BTreeMap;

/// Registry of spatial reference definitions, keyed by `EPSG:<id>` code.
///
/// A handful of common definitions are built in; anything else must be
/// registered with a proj4 string before a GeoPackage referring to it can
/// be loaded.
#[derive(Clone, Debug)]
pub struct ProjectionRegistry {
    defs: BTreeMap<String, String>,
}

impl ProjectionRegistry {
    /// Registry preloaded with EPSG:4326, EPSG:3857 and EPSG:27700.
    pub fn with_defaults() -> Self {
        let mut registry = Self {
            defs: BTreeMap::new(),
        };
        registry.register("EPSG:4326", "+proj=longlat +datum=WGS84 +no_defs");
        registry.register(
            "EPSG:3857",
            "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 \
             +units=m +nadgrids=@null +no_defs",
        );
        registry.register(
            "EPSG:27700",
            "+proj=tmerc +lat_0=49 +lon_0=-2 +k=0.9996012717 +x_0=400000 +y_0=-100000 \
             +ellps=airy +towgs84=446.448,-125.157,542.06,0.15,0.247,0.842,-20.489 \
             +units=m +no_defs",
        );
        registry
    }

    /// Register (or replace) a proj4 definition for a spatial reference code.
    pub fn register<C: Into<String>, D: Into<String>>(&mut self, code: C, proj_string: D) {
        self.defs.insert(code.into(), proj_string.into());
    }

    /// Whether a definition exists for the given code.
    pub fn contains(&self, code: &str) -> bool {
        self.defs.contains_key(code)
    }

    /// Compile the definition for a code, or `None` if it is unregistered.
    pub(crate) fn compile(&self, code: &str) -> Result<Option<CompiledProjection>> {
        let Some(proj_string) = self.defs.get(code) else {
            return Ok(None);
        };
        let proj = Proj::from_proj_string(proj_string)?;
        Ok(Some(CompiledProjection {
            code: code.to_string(),
            geographic: is_geographic(proj_string),
            proj,
        }))
    }
}

impl Default for ProjectionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// proj4rs works in radians for geographic CRS, so the registry needs to
// know which definitions carry degree coordinates.
fn is_geographic(proj_string: &str) -> bool {
    ["+proj=longlat", "+proj=latlong", "+proj=lonlat", "+proj=latlon"]
        .iter()
        .any(|name| proj_string.contains(name))
}

/// A spatial reference definition compiled for transforming coordinates.
pub(crate) struct CompiledProjection {
    pub(crate) code: String,
    pub(crate) geographic: bool,
    pub(crate) proj: Proj,
}

impl CompiledProjection {
    fn project_coord(&self, coord: Coord<f64>, dst: &Self) -> Result<Coord<f64>> {
        let mut point = (coord.x, coord.y, 0.0_f64);
        if self.geographic {
            point.0 = point.0.to_radians();
            point.1 = point.1.to_radians();
        }
        transform(&self.proj, &dst.proj, &mut point)?;
        if dst.geographic {
            point.0 = point.0.to_degrees();
            point.1 = point.1.to_degrees();
        }
        Ok(Coord {
            x: point.0,
            y: point.1,
        })
    }

    fn project_line_string(&self, line: &LineString<f64>, dst: &Self) -> Result<LineString<f64>> {
        let coords = line
            .coords()
            .map(|coord| self.project_coord(*coord, dst))
            .collect::<Result<Vec<_>>>()?;
        Ok(LineString::from(coords))
    }

    fn project_polygon(&self, polygon: &Polygon<f64>, dst: &Self) -> Result<Polygon<f64>> {
        let exterior = self.project_line_string(polygon.exterior(), dst)?;
        let interiors = polygon
            .interiors()
            .iter()
            .map(|ring| self.project_line_string(ring, dst))
            .collect::<Result<Vec<_>>>()?;
        Ok(Polygon::new(exterior, interiors))
    }
}

/// Reproject a geometry from `src` to `dst`, returning a new geometry.
///
/// When source and destination are the same code this is the identity and
/// the coordinates are returned bit-for-bit unchanged.
pub(crate) fn reproject_geometry(
    geometry: &Geometry<f64>,
    src: &CompiledProjection,
    dst: &CompiledProjection,
) -> Result<Geometry<f64>> {
    if src.code == dst.code {
        return Ok(geometry.clone());
    }

    let projected = match geometry {
        Geometry::Point(point) => Geometry::Point(Point(src.project_coord(point.0, dst)?)),
        Geometry::Line(line) => Geometry::Line(Line::new(
            src.project_coord(line.start, dst)?,
            src.project_coord(line.end, dst)?,
        )),
        Geometry::LineString(line) => Geometry::LineString(src.project_line_string(line, dst)?),
        Geometry::Polygon(polygon) => Geometry::Polygon(src.project_polygon(polygon, dst)?),
        Geometry::MultiPoint(points) => Geometry::MultiPoint(MultiPoint(
            points
                .iter()
                .map(|point| Ok(Point(src.project_coord(point.0, dst)?)))
                .collect::<Result<Vec<_>>>()?,
        )),
        Geometry::MultiLineString(lines) => Geometry::MultiLineString(MultiLineString(
            lines
                .iter()
                .map(|line| src.project_line_string(line, dst))
                .collect::<Result<Vec<_>>>()?,
        )),
        Geometry::MultiPolygon(polygons) => Geometry::MultiPolygon(MultiPolygon(
            polygons
                .iter()
                .map(|polygon| src.project_polygon(polygon, dst))
                .collect::<Result<Vec<_>>>()?,
        )),
        Geometry::GeometryCollection(collection) => {
            Geometry::GeometryCollection(GeometryCollection(
                collection
                    .iter()
                    .map(|geometry| reproject_geometry(geometry, src, dst))
                    .collect::<Result<Vec<_>>>()?,
            ))
        }
        Geometry::Rect(rect) => Geometry::Rect(Rect::new(
            src.project_coord(rect.min(), dst)?,
            src.project_coord(rect.max(), dst)?,
        )),
        Geometry::Triangle(triangle) => Geometry::Triangle(Triangle(
            src.project_coord(triangle.0, dst)?,
            src.project_coord(triangle.1, dst)?,
            src.project_coord(triangle.2, dst)?,
        )),
    };

    Ok(projected)
}
