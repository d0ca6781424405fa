//! Load OGC GeoPackage vector layers into map-ready feature collections.
//!
//! ## Overview
//!
//! - `GpkgLoader` is the entry point: it owns the engine-readiness state
//!   and the projection registry for one or more loads.
//! - `GpkgSource` describes where the GeoPackage bytes come from: a URL,
//!   a local file path, or an in-memory buffer.
//! - `LoadResult` pairs the feature collections (keyed by table name) with
//!   the optional `layer_styles` SLD mapping (keyed by layer name).
//! - `FeatureCollection` holds decoded, reprojected `geo-types` geometries
//!   plus each row's remaining columns as [`Value`] properties, tagged with
//!   the table's original spatial reference.
//!
//! A load walks the GeoPackage catalog (`gpkg_contents` joined with
//! `gpkg_geometry_columns`), strips the GeoPackage binary header and
//! envelope from every geometry cell, decodes the WKB payload, and
//! reprojects the coordinates from each table's declared spatial reference
//! into the requested display projection.
//!
//! ## Short usage
//!
//! ```no_run
//! use gpkg_map_loader::{GpkgLoader, GpkgSource};
//!
//! let mut loader = GpkgLoader::new();
//! loader.init_engine();
//!
//! let source: GpkgSource = "https://example.com/data.gpkg".parse()?;
//! let result = loader.load(&source, "EPSG:3857")?;
//!
//! for (table_name, collection) in &result.tables {
//!     println!(
//!         "{table_name}: {} features (source {})",
//!         collection.features.len(),
//!         collection.orig_projection
//!     );
//! }
//! for (layer_name, sld) in &result.styles {
//!     println!("style for {layer_name}: {} bytes", sld.len());
//! }
//! # Ok::<(), gpkg_map_loader::GpkgError>(())
//! ```
//!
//! ## Projections
//!
//! EPSG:4326, EPSG:3857 and EPSG:27700 are registered out of the box. A
//! GeoPackage referring to any other spatial reference needs a proj4
//! definition registered first; a table whose reference stays unknown
//! fails the load rather than being silently skipped:
//!
//! ```no_run
//! use gpkg_map_loader::GpkgLoader;
//!
//! let mut loader = GpkgLoader::new();
//! loader.projections_mut().register(
//!     "EPSG:2154",
//!     "+proj=lcc +lat_1=49 +lat_2=44 +lat_0=46.5 +lon_0=3 +x_0=700000 +y_0=6600000 \
//!      +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs",
//! );
//! ```
//!
//! ## Errors
//!
//! Every failure aborts the whole in-flight load and surfaces as a
//! [`GpkgError`]; there is no internal retry and no per-feature tolerance.
//! The one deferred case is engine initialization: `init_engine` logs a
//! failure and stores it, and the next `load` reports it as
//! [`GpkgError::EngineLoadFailed`].

mod catalog;
mod error;
mod feature;
mod geometry;
mod loader;
mod ogc_sql;
mod projection;
mod source;
mod types;

#[cfg(test)]
mod test_util;

pub use error::{GpkgError, Result};
pub use feature::{Feature, FeatureCollection};
pub use geometry::gpkg_geometry_to_wkb;
pub use loader::{GpkgLoader, LoadResult, sqlite_version};
pub use projection::ProjectionRegistry;
pub use source::GpkgSource;
pub use types::Value;
