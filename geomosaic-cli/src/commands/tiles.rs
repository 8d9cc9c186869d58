//! Tiles command - list the tiles covering an area without downloading.

use std::io::{self, Write};

use geomosaic::coord::BoundingBox;
use geomosaic::tile::covering_extent;

use crate::error::CliError;

/// Run the tiles command.
pub fn run(bbox: BoundingBox, zoom: u8, limit: u64) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, bbox, zoom, limit)
}

/// Writes the tile list and grid summary for an area.
///
/// Tiles are listed only when there are at most `limit` of them; the
/// summary is always written.
pub fn write_report<W: Write>(
    out: &mut W,
    bbox: BoundingBox,
    zoom: u8,
    limit: u64,
) -> Result<(), CliError> {
    let extent = covering_extent(&bbox, zoom)?;
    let count = extent.tile_count();
    let (width, height) = extent.pixel_size();

    if count <= limit {
        for tile in extent.tiles(zoom) {
            writeln!(out, "{}", tile)?;
        }
    } else {
        writeln!(
            out,
            "{} tiles exceed the listing limit of {} (use --limit to raise it)",
            count, limit
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Area:   {}", bbox)?;
    writeln!(
        out,
        "Extent: x {}..={}, y {}..={} at zoom {}",
        extent.min_x, extent.max_x, extent.min_y, extent.max_y, zoom
    )?;
    writeln!(
        out,
        "Tiles:  {} ({}×{} grid)",
        count,
        extent.columns(),
        extent.rows()
    )?;
    writeln!(out, "Size:   {}×{} px", width, height)?;

    Ok(())
}
