use crate::catalog;
use crate::error::{GpkgError, Result};
use crate::feature::{FeatureCollection, materialize_table};
use crate::projection::ProjectionRegistry;
use crate::source::GpkgSource;
use rusqlite::{Connection, OpenFlags};
use std::collections::BTreeMap;
use std::io::Write;
use tempfile::NamedTempFile;

/// Version of the embedded SQLite engine.
pub fn sqlite_version() -> &'static str {
    rusqlite::version()
}

#[derive(Clone, Debug)]
enum EngineState {
    Uninitialized,
    Failed(String),
    Ready,
}

/// Everything one load produces: feature collections keyed by table name,
/// and SLD style XML keyed by layer name.
#[derive(Clone, Debug)]
pub struct LoadResult {
    pub tables: BTreeMap<String, FeatureCollection>,
    pub styles: BTreeMap<String, String>,
}

/// Loader context owning the engine-readiness state and the projection
/// registry.
///
/// `init_engine` must be called once before the first load. Each call to
/// [`GpkgLoader::load`] is independent: a failed load leaves the context
/// untouched and may simply be retried.
#[derive(Debug)]
pub struct GpkgLoader {
    engine: EngineState,
    projections: ProjectionRegistry,
}

impl GpkgLoader {
    pub fn new() -> Self {
        Self {
            engine: EngineState::Uninitialized,
            projections: ProjectionRegistry::with_defaults(),
        }
    }

    /// Initialize the embedded SQLite engine.
    ///
    /// An initialization failure is logged but not returned; it surfaces as
    /// [`GpkgError::EngineLoadFailed`] on the next load attempt. Calling
    /// this again re-probes the engine and replaces the stored state.
    pub fn init_engine(&mut self) {
        match probe_engine() {
            Ok(()) => {
                log::debug!("sqlite engine ready (sqlite {})", sqlite_version());
                self.engine = EngineState::Ready;
            }
            Err(err) => {
                log::warn!("sqlite engine initialization failed: {err}");
                self.engine = EngineState::Failed(err.to_string());
            }
        }
    }

    /// Whether the engine probe has run and succeeded.
    pub fn engine_ready(&self) -> bool {
        matches!(self.engine, EngineState::Ready)
    }

    pub fn projections(&self) -> &ProjectionRegistry {
        &self.projections
    }

    pub fn projections_mut(&mut self) -> &mut ProjectionRegistry {
        &mut self.projections
    }

    /// Load a GeoPackage and return its feature collections reprojected
    /// into `display_projection`, together with any `layer_styles` content.
    ///
    /// Fails before any fetch side effect when the engine was never
    /// initialized or the display projection is unregistered. An engine
    /// initialization failure takes priority over a fetch failure.
    pub fn load(&self, source: &GpkgSource, display_projection: &str) -> Result<LoadResult> {
        if matches!(self.engine, EngineState::Uninitialized) {
            return Err(GpkgError::EngineNotInitialized);
        }

        let display = self
            .projections
            .compile(display_projection)?
            .ok_or_else(|| GpkgError::UnknownDisplayProjection {
                crs: display_projection.to_string(),
            })?;

        // A failed engine pre-load was only logged at init time; report it
        // here, ahead of any fetch outcome.
        if let EngineState::Failed(detail) = &self.engine {
            return Err(GpkgError::EngineLoadFailed(detail.clone()));
        }

        let bytes = source.fetch_bytes()?;
        log::debug!("fetched GeoPackage, {} bytes", bytes.len());

        // The staging file must outlive the connection reading from it.
        let (_staging, conn) = open_database(&bytes)?;

        let mut tables = BTreeMap::new();
        for table in catalog::feature_tables(&conn)? {
            let collection = materialize_table(&conn, &table, &self.projections, &display)?;
            tables.insert(table.table_name, collection);
        }
        let styles = catalog::layer_styles(&conn)?;

        Ok(LoadResult { tables, styles })
    }
}

#[cfg(test)]
impl GpkgLoader {
    // Engine probes against the bundled SQLite cannot be made to fail from
    // a test, so the failed state gets seeded directly.
    pub(crate) fn with_failed_engine(detail: &str) -> Self {
        Self {
            engine: EngineState::Failed(detail.to_string()),
            projections: ProjectionRegistry::with_defaults(),
        }
    }
}

impl Default for GpkgLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn probe_engine() -> Result<()> {
    let conn = Connection::open_in_memory()?;
    conn.query_row("SELECT sqlite_version()", [], |row| row.get::<_, String>(0))?;
    Ok(())
}

// Stage the byte buffer into a private temporary file and open it with
// SQLite in read-only mode.
fn open_database(bytes: &[u8]) -> Result<(NamedTempFile, Connection)> {
    let mut staging = NamedTempFile::new()?;
    staging.write_all(bytes)?;
    let conn = Connection::open_with_flags(staging.path(), OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(GpkgError::Catalog)?;
    Ok((staging, conn))
}
