/// Tile identifiers, solidity classes, and the tile catalog.
/// Solidity semantics are centralized here; the map only stores ids.

/// Tile size in pixels. Tiles are square; the slope predicates rely on it.
pub const TILE_W: f32 = 32.0;
pub const TILE_H: f32 = 32.0;

/// A raw tile identifier as authored in level data.
/// The grid may contain ids the catalog does not define; those are treated
/// as open space by the solidity oracle and flagged as a diagnostic.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TileId(pub u8);

/// Orientation of a 45° slope tile.
///
/// `Floor*` slopes rise toward the named side and are walkable;
/// `Ceiling*` slopes hang from the tile top.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SlopeDir {
    FloorRight,
    FloorLeft,
    CeilingRight,
    CeilingLeft,
}

impl SlopeDir {
    /// Per-pixel solidity over local tile coordinates in [0, TILE_W) x
    /// [0, TILE_H). Pure and total; callers clamp into range first.
    pub fn solid_at(self, x: f32, y: f32) -> bool {
        match self {
            SlopeDir::FloorRight => y > TILE_W - x,
            SlopeDir::FloorLeft => y > x,
            SlopeDir::CeilingRight => y < x,
            SlopeDir::CeilingLeft => y < TILE_W - x,
        }
    }
}

/// Solidity class of a tile: fully open, fully solid, or sloped with a
/// per-pixel predicate. Dispatch is explicit — no optional methods.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TileKind {
    Open,
    Solid,
    Slope(SlopeDir),
}

/// Catalog entry for one tile id. The glyph pair is what the renderer
/// draws for this tile (one game tile = two terminal columns).
#[derive(Clone, Copy, Debug)]
pub struct TileDef {
    pub kind: TileKind,
    pub glyph: [char; 2],
}

/// The tile catalog: id → definition.
/// Ids are small (one digit in level data), so a flat array suffices.
pub struct TileSet {
    defs: [Option<TileDef>; 256],
}

impl TileSet {
    /// The standard catalog used by every level:
    ///   0 open, 1 wall, 2 floor slope rising right, 3 floor slope rising
    ///   left, 4 ceiling slope descending right, 5 ceiling slope
    ///   descending left.
    pub fn standard() -> Self {
        let mut defs = [None; 256];
        defs[0] = Some(TileDef { kind: TileKind::Open, glyph: [' ', ' '] });
        defs[1] = Some(TileDef { kind: TileKind::Solid, glyph: ['█', '█'] });
        defs[2] = Some(TileDef {
            kind: TileKind::Slope(SlopeDir::FloorRight),
            glyph: ['▄', '█'],
        });
        defs[3] = Some(TileDef {
            kind: TileKind::Slope(SlopeDir::FloorLeft),
            glyph: ['█', '▄'],
        });
        defs[4] = Some(TileDef {
            kind: TileKind::Slope(SlopeDir::CeilingRight),
            glyph: ['▀', '█'],
        });
        defs[5] = Some(TileDef {
            kind: TileKind::Slope(SlopeDir::CeilingLeft),
            glyph: ['█', '▀'],
        });
        TileSet { defs }
    }

    pub fn get(&self, id: TileId) -> Option<&TileDef> {
        self.defs[id.0 as usize].as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_right_boundary_matches_predicate() {
        let s = SlopeDir::FloorRight;
        // Solid exactly where y > TILE_W - x.
        assert!(s.solid_at(31.0, 2.0));
        assert!(s.solid_at(20.0, 13.0));
        assert!(!s.solid_at(20.0, 12.0)); // y == TILE_W - x: not solid
        assert!(!s.solid_at(0.0, 31.0));
        assert!(s.solid_at(2.0, 31.0));
    }

    #[test]
    fn floor_left_boundary_matches_predicate() {
        let s = SlopeDir::FloorLeft;
        assert!(s.solid_at(0.0, 1.0));
        assert!(s.solid_at(10.0, 11.0));
        assert!(!s.solid_at(10.0, 10.0)); // diagonal itself is open
        assert!(!s.solid_at(31.0, 30.0));
    }

    #[test]
    fn ceiling_slopes_disjoint_from_floor_slopes() {
        for &(x, y) in &[(0.0, 0.0), (5.0, 20.0), (20.0, 5.0), (31.0, 31.0)] {
            let ceil = SlopeDir::CeilingRight.solid_at(x, y);
            let floor = SlopeDir::FloorLeft.solid_at(x, y);
            assert!(!(ceil && floor), "({x},{y}) solid in both");
        }
        assert!(SlopeDir::CeilingRight.solid_at(20.0, 5.0));
        assert!(SlopeDir::CeilingLeft.solid_at(5.0, 5.0));
        assert!(!SlopeDir::CeilingLeft.solid_at(30.0, 5.0));
    }

    #[test]
    fn standard_catalog_covers_authored_ids() {
        let set = TileSet::standard();
        assert_eq!(set.get(TileId(0)).unwrap().kind, TileKind::Open);
        assert_eq!(set.get(TileId(1)).unwrap().kind, TileKind::Solid);
        assert_eq!(
            set.get(TileId(2)).unwrap().kind,
            TileKind::Slope(SlopeDir::FloorRight)
        );
        assert_eq!(
            set.get(TileId(5)).unwrap().kind,
            TileKind::Slope(SlopeDir::CeilingLeft)
        );
        assert!(set.get(TileId(7)).is_none());
    }
}
