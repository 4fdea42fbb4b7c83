//! Thin adapter over the H3 hexagonal hierarchical grid.
//!
//! The engine only needs four operations: point→cell, cell→parent,
//! cell→center, and cell→k-ring disk. Everything takes and returns
//! `h3o::CellIndex`; cell ids on the wire are the H3 hex string form.

use h3o::{CellIndex, LatLng, Resolution};

/// Resolution of report-cell aggregates (~174m edge length).
pub const REPORT_CELL_RES: Resolution = Resolution::Nine;

/// Resolution hotspot groups are merged at (~461m edge length).
pub const HOTSPOT_PARENT_RES: Resolution = Resolution::Eight;

/// Resolution cameras are bucketed and candidates are scored at.
pub const SCORING_RES: Resolution = Resolution::Nine;

/// Cell containing a point at the given resolution.
/// Returns None for non-finite or out-of-range coordinates.
pub fn cell_at(lat: f64, lon: f64, res: Resolution) -> Option<CellIndex> {
    LatLng::new(lat, lon).ok().map(|ll| ll.to_cell(res))
}

/// Ancestor cell at a coarser resolution.
pub fn parent(cell: CellIndex, res: Resolution) -> Option<CellIndex> {
    cell.parent(res)
}

/// Center of a cell as (lat, lon) degrees.
pub fn center(cell: CellIndex) -> (f64, f64) {
    let ll = LatLng::from(cell);
    (ll.lat(), ll.lng())
}

/// The cell plus its k rings of neighbors.
pub fn disk(cell: CellIndex, k: u32) -> Vec<CellIndex> {
    cell.grid_disk::<Vec<_>>(k)
}

/// Parse a cell id from its hex string form.
pub fn parse_cell(s: &str) -> Option<CellIndex> {
    s.parse::<CellIndex>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_at_rejects_bad_coords() {
        assert!(cell_at(f64::NAN, 0.0, REPORT_CELL_RES).is_none());
        assert!(cell_at(91.0, 0.0, REPORT_CELL_RES).is_none());
        assert!(cell_at(44.97, -93.26, REPORT_CELL_RES).is_some());
    }

    #[test]
    fn parent_is_coarser_and_contains_child() {
        let cell = cell_at(44.9778, -93.265, REPORT_CELL_RES).unwrap();
        let p = parent(cell, HOTSPOT_PARENT_RES).unwrap();
        assert_eq!(p.resolution(), HOTSPOT_PARENT_RES);
        // Nearby points in the same fine cell share the parent
        let (clat, clon) = center(cell);
        let again = cell_at(clat, clon, REPORT_CELL_RES).unwrap();
        assert_eq!(parent(again, HOTSPOT_PARENT_RES).unwrap(), p);
    }

    #[test]
    fn disk_one_ring_has_seven_cells() {
        let cell = cell_at(44.9778, -93.265, SCORING_RES).unwrap();
        let ring = disk(cell, 1);
        assert_eq!(ring.len(), 7, "hexagon + 6 neighbors");
        assert!(ring.contains(&cell));
    }

    #[test]
    fn cell_id_round_trips_through_string() {
        let cell = cell_at(40.7128, -74.006, REPORT_CELL_RES).unwrap();
        let s = cell.to_string();
        assert_eq!(parse_cell(&s), Some(cell));
        assert_eq!(parse_cell("not-a-cell"), None);
    }
}
