use crate::error::{GpkgError, Result};

// magic[2] + version[1] + flags[1] + srs_id[4]
const HEADER_LEN: usize = 8;

/// Strip the GeoPackage binary header and envelope to access the raw WKB
/// payload of one geometry cell.
///
/// The returned slice borrows from the cell; no copy is made. The payload
/// itself is not validated here, and the srs_id embedded in the header is
/// ignored because the catalog already names the table's spatial reference.
// cf. https://www.geopackage.org/spec140/index.html#gpb_format
pub fn gpkg_geometry_to_wkb(cell: &[u8]) -> Result<&[u8]> {
    if cell.len() < HEADER_LEN {
        return Err(GpkgError::InvalidGeometryLength {
            len: cell.len(),
            minimum: HEADER_LEN,
        });
    }

    let flags = cell[3];
    let envelope_size: usize = match (flags >> 1) & 0b111 {
        0 => 0,      // no envelope
        1 => 32,     // [minx, maxx, miny, maxy]
        2 | 3 => 48, // above plus [minz, maxz] or [minm, maxm]
        4 => 64,     // above plus both z and m ranges
        _ => return Err(GpkgError::InvalidGeometryFlags(flags)),
    };

    let offset = HEADER_LEN + envelope_size;
    if cell.len() < offset {
        return Err(GpkgError::InvalidGeometryEnvelope {
            len: cell.len(),
            required: offset,
        });
    }

    Ok(&cell[offset..])
}
