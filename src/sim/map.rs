/// Tile map and the solidity oracle.
///
/// The map is a row-major grid of raw tile ids. Rows may be ragged and the
/// grid may be smaller than the playable area: any coordinate that falls
/// outside an authored cell is open space, never an error. All collision
/// queries funnel through `SolidityView::is_solid`, which is pure and cheap
/// enough to be called hundreds of times per frame by the sweeps.

use tracing::warn;

use crate::domain::tile::{TileId, TileKind, TileSet, TILE_H, TILE_W};

pub struct TileMap {
    rows: Vec<Vec<TileId>>,
}

impl TileMap {
    pub fn new(rows: Vec<Vec<TileId>>) -> Self {
        TileMap { rows }
    }

    /// Build from raw id bytes; test helper.
    #[allow(dead_code)]
    pub fn from_ids(rows: &[&[u8]]) -> Self {
        TileMap {
            rows: rows
                .iter()
                .map(|r| r.iter().map(|&b| TileId(b)).collect())
                .collect(),
        }
    }

    /// Tile id at (row, col), or None where no cell was authored.
    pub fn tile_at(&self, row: usize, col: usize) -> Option<TileId> {
        self.rows.get(row)?.get(col).copied()
    }

    /// (rows, widest row) in tiles.
    pub fn dimensions(&self) -> (usize, usize) {
        let rows = self.rows.len();
        let cols = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        (rows, cols)
    }

    /// Authored extent in pixels, for camera clamping.
    pub fn pixel_size(&self) -> (f32, f32) {
        let (rows, cols) = self.dimensions();
        (cols as f32 * TILE_W, rows as f32 * TILE_H)
    }
}

/// The solidity oracle: borrows the map and the catalog for the duration
/// of one frame's queries.
#[derive(Clone, Copy)]
pub struct SolidityView<'a> {
    pub map: &'a TileMap,
    pub tiles: &'a TileSet,
}

impl SolidityView<'_> {
    /// Is the world pixel (x, y) inside solid geometry?
    pub fn is_solid(&self, x: f32, y: f32) -> bool {
        let row = (y / TILE_H).floor();
        let col = (x / TILE_W).floor();
        // floor keeps negative coordinates negative instead of truncating
        // them into row/col 0.
        if row < 0.0 || col < 0.0 {
            return false;
        }

        let Some(id) = self.map.tile_at(row as usize, col as usize) else {
            return false;
        };
        let Some(def) = self.tiles.get(id) else {
            warn!(id = id.0, "tile id has no catalog entry, treating as open");
            return false;
        };

        match def.kind {
            TileKind::Open => false,
            TileKind::Solid => true,
            TileKind::Slope(dir) => {
                // Defensive clamp into the predicate's domain; float edge
                // cases must not hand the predicate an out-of-range pixel.
                let local_x = (x - col * TILE_W).clamp(0.0, TILE_W);
                let local_y = (y - row * TILE_H).clamp(0.0, TILE_H);
                dir.solid_at(local_x, local_y)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Legend for test maps: b'0' etc. would be level-file syntax; here the
    // grids hold raw ids directly.
    const OPEN: u8 = 0;
    const WALL: u8 = 1;
    const SLOPE_R: u8 = 2;

    fn view<'a>(map: &'a TileMap, tiles: &'a TileSet) -> SolidityView<'a> {
        SolidityView { map, tiles }
    }

    #[test]
    fn solid_tile_is_solid_at_every_pixel() {
        let tiles = TileSet::standard();
        let map = TileMap::from_ids(&[&[WALL]]);
        let v = view(&map, &tiles);
        for &(x, y) in &[(0.0, 0.0), (31.9, 0.0), (0.0, 31.9), (16.0, 16.0)] {
            assert!(v.is_solid(x, y), "({x},{y})");
        }
    }

    #[test]
    fn open_tile_is_never_solid() {
        let tiles = TileSet::standard();
        let map = TileMap::from_ids(&[&[OPEN]]);
        let v = view(&map, &tiles);
        assert!(!v.is_solid(0.0, 0.0));
        assert!(!v.is_solid(31.9, 31.9));
    }

    #[test]
    fn out_of_range_is_open_space() {
        let tiles = TileSet::standard();
        let map = TileMap::from_ids(&[&[WALL]]);
        let v = view(&map, &tiles);
        assert!(!v.is_solid(100.0, 0.0)); // past the row's last cell
        assert!(!v.is_solid(0.0, 100.0)); // below the last row
        assert!(!v.is_solid(-1.0, 0.0)); // left of the map
        assert!(!v.is_solid(0.0, -0.5)); // above the map
    }

    #[test]
    fn ragged_rows_are_open_past_their_end() {
        let tiles = TileSet::standard();
        let map = TileMap::from_ids(&[&[WALL, WALL, WALL], &[WALL]]);
        let v = view(&map, &tiles);
        assert!(v.is_solid(80.0, 10.0)); // row 0, col 2
        assert!(!v.is_solid(80.0, 42.0)); // row 1 has no col 2
        assert_eq!(map.dimensions(), (2, 3));
    }

    #[test]
    fn slope_tile_follows_its_predicate() {
        let tiles = TileSet::standard();
        // Slope in the second column so world coords exercise the
        // local-coordinate math.
        let map = TileMap::from_ids(&[&[OPEN, SLOPE_R]]);
        let v = view(&map, &tiles);
        // FloorRight: solid where local_y > TILE_W - local_x.
        assert!(v.is_solid(32.0 + 31.0, 2.0));
        assert!(!v.is_solid(32.0 + 1.0, 2.0));
        assert!(v.is_solid(32.0 + 20.0, 13.0));
        assert!(!v.is_solid(32.0 + 20.0, 12.0));
    }

    #[test]
    fn uncataloged_id_is_open() {
        let tiles = TileSet::standard();
        let map = TileMap::from_ids(&[&[7]]);
        let v = view(&map, &tiles);
        assert!(!v.is_solid(10.0, 10.0));
    }

    #[test]
    fn pixel_size_uses_widest_row() {
        let map = TileMap::from_ids(&[&[OPEN, OPEN], &[OPEN, OPEN, OPEN, OPEN]]);
        assert_eq!(map.pixel_size(), (128.0, 64.0));
    }
}
