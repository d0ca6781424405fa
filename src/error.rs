use std::error::Error;
use std::fmt;

/// Crate error type for GeoPackage loading.
#[derive(Debug)]
pub enum GpkgError {
    /// Wraps errors returned by `rusqlite` while reading feature rows.
    Sql(rusqlite::Error),
    /// Catalog queries failed; the file is malformed or not a GeoPackage.
    Catalog(rusqlite::Error),
    /// Wraps errors returned by the `wkb` crate.
    Wkb(wkb::error::WkbError),
    /// Wraps errors returned by `proj4rs` during coordinate transforms.
    Projection(proj4rs::errors::Error),
    /// Wraps I/O errors from reading local files or staging fetched bytes.
    Io(std::io::Error),
    /// The source descriptor is not a fetchable URL or a local file.
    InvalidSource(String),
    /// Network fetch failed or returned a non-success status.
    SourceUnreachable {
        url: String,
        status: Option<u16>,
        detail: String,
    },
    /// A load was attempted before `init_engine` was called.
    EngineNotInitialized,
    /// Engine initialization itself failed; surfaced on the next load.
    EngineLoadFailed(String),
    /// The requested display projection is not registered.
    UnknownDisplayProjection {
        crs: String,
    },
    /// A feature table declares a spatial reference that is not registered.
    UnknownSourceProjection {
        table_name: String,
        crs: String,
    },
    /// Invalid GeoPackage geometry flags byte.
    InvalidGeometryFlags(u8),
    /// GeoPackage geometry cell is too short for the fixed header.
    InvalidGeometryLength {
        len: usize,
        minimum: usize,
    },
    /// GeoPackage geometry cell is too short for the declared envelope.
    InvalidGeometryEnvelope {
        len: usize,
        required: usize,
    },
    /// The WKB payload decoded to a geometry the crate cannot represent.
    UnsupportedGeometryType {
        table_name: String,
    },
    /// A feature table row has a `NULL` geometry value.
    NullGeometry {
        table_name: String,
    },
    /// The catalog names a geometry column that the table does not have.
    MissingGeometryColumn {
        table_name: String,
        column: String,
    },
}

impl fmt::Display for GpkgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sql(err) => write!(f, "{err}"),
            Self::Catalog(err) => write!(f, "catalog extraction failed: {err}"),
            Self::Wkb(err) => write!(f, "{err}"),
            Self::Projection(err) => write!(f, "projection error: {err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::InvalidSource(source) => write!(f, "invalid GeoPackage source: {source}"),
            Self::SourceUnreachable {
                url,
                status,
                detail,
            } => match status {
                Some(status) => write!(f, "failed to fetch {url}: HTTP status {status}"),
                None => write!(f, "failed to fetch {url}: {detail}"),
            },
            Self::EngineNotInitialized => {
                write!(f, "sqlite engine not initialized; call init_engine first")
            }
            Self::EngineLoadFailed(detail) => {
                write!(f, "sqlite engine initialization failed: {detail}")
            }
            Self::UnknownDisplayProjection { crs } => {
                write!(f, "display projection {crs} is not registered")
            }
            Self::UnknownSourceProjection { table_name, crs } => {
                write!(
                    f,
                    "source projection {crs} of table '{table_name}' is not registered"
                )
            }
            Self::InvalidGeometryFlags(flags) => {
                write!(f, "invalid gpkg geometry flags: {flags:#04x}")
            }
            Self::InvalidGeometryLength { len, minimum } => {
                write!(
                    f,
                    "invalid gpkg geometry length: got {len} bytes, expected at least {minimum}"
                )
            }
            Self::InvalidGeometryEnvelope { len, required } => {
                write!(
                    f,
                    "invalid gpkg geometry envelope length: got {len} bytes, required {required}"
                )
            }
            Self::UnsupportedGeometryType { table_name } => {
                write!(f, "unsupported geometry type in table '{table_name}'")
            }
            Self::NullGeometry { table_name } => {
                write!(f, "table '{table_name}' has a feature with null geometry")
            }
            Self::MissingGeometryColumn { table_name, column } => {
                write!(
                    f,
                    "geometry column '{column}' not found in table '{table_name}'"
                )
            }
        }
    }
}

impl Error for GpkgError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sql(err) | Self::Catalog(err) => Some(err),
            Self::Wkb(err) => Some(err),
            Self::Projection(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for GpkgError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Sql(err)
    }
}

impl From<wkb::error::WkbError> for GpkgError {
    fn from(err: wkb::error::WkbError) -> Self {
        Self::Wkb(err)
    }
}

impl From<proj4rs::errors::Error> for GpkgError {
    fn from(err: proj4rs::errors::Error) -> Self {
        Self::Projection(err)
    }
}

impl From<std::io::Error> for GpkgError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, GpkgError>;
