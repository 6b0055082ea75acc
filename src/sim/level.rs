/// Level loading.
///
/// ## Sources (priority order):
///   1. `levels/` directory (individual `.txt` files, sorted by name)
///   2. Built-in embedded level
///
/// ## Level format (`.txt`):
///   Line 1: `# Level Name`
///   Remaining lines: one map row each, characters:
///     '0'..'9' = raw tile id (0 open, 1 wall, 2-5 slopes; other digits
///                load but resolve as open space and are flagged)
///     'P'      = hero spawn (centered in that cell; tile becomes open)
///     ' '      = open space (same as '0')
///
/// Rows may be ragged; anything outside an authored cell is open space.
/// A malformed row or a missing spawn is a load error — bad level data
/// fails fast here, never inside the frame loop.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::config::GameConfig;
use crate::domain::tile::{TileId, TILE_H, TILE_W};
use crate::domain::vector::Vec2;
use crate::sim::map::TileMap;
use crate::sim::world::{Phase, WorldState};

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level has no map rows")]
    Empty,
    #[error("level has no 'P' spawn marker")]
    MissingSpawn,
    #[error("row {row}, col {col}: invalid tile character {ch:?}")]
    BadTile { row: usize, col: usize, ch: char },
}

/// Parsed level data, ready to install into a WorldState.
#[derive(Debug)]
pub struct LevelDef {
    pub name: String,
    pub rows: Vec<Vec<TileId>>,
    pub spawn: Vec2,
}

// ══════════════════════════════════════════════════════════════
// Parsing
// ══════════════════════════════════════════════════════════════

pub fn parse_level(text: &str) -> Result<LevelDef, LevelError> {
    let mut name = String::from("Unnamed");
    let mut rows: Vec<Vec<TileId>> = Vec::new();
    let mut spawn: Option<Vec2> = None;

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if let Some(title) = line.strip_prefix('#') {
            if rows.is_empty() {
                name = title.trim().to_string();
            }
            continue;
        }
        // Blank lines before the grid are padding; inside the grid they
        // are authored open rows.
        if line.is_empty() && rows.is_empty() {
            continue;
        }

        let y = rows.len();
        let mut row = Vec::with_capacity(line.len());
        for (x, ch) in line.chars().enumerate() {
            match ch {
                '0'..='9' => row.push(TileId(ch as u8 - b'0')),
                ' ' => row.push(TileId(0)),
                'P' => {
                    spawn = Some(Vec2::new(
                        x as f32 * TILE_W + TILE_W / 2.0,
                        y as f32 * TILE_H + TILE_H / 2.0,
                    ));
                    row.push(TileId(0));
                }
                other => {
                    return Err(LevelError::BadTile { row: y, col: x, ch: other })
                }
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(LevelError::Empty);
    }
    let spawn = spawn.ok_or(LevelError::MissingSpawn)?;

    // Digits outside the standard catalog load fine but deserve a flag —
    // the oracle will treat them as open space at query time.
    let tiles = crate::domain::tile::TileSet::standard();
    let mut flagged: Vec<u8> = vec![];
    for row in &rows {
        for id in row {
            if tiles.get(*id).is_none() && !flagged.contains(&id.0) {
                flagged.push(id.0);
            }
        }
    }
    for id in flagged {
        warn!(id, level = %name, "tile id has no catalog entry");
    }

    Ok(LevelDef { name, rows, spawn })
}

// ══════════════════════════════════════════════════════════════
// Loading into the world
// ══════════════════════════════════════════════════════════════

/// Install a level into the world state and start playing.
pub fn load_level(world: &mut WorldState, def: &LevelDef) {
    world.map = TileMap::new(def.rows.clone());
    world.level_name = def.name.clone();
    world.hero_spawn = def.spawn;
    world.tick = 0;
    world.paused = false;
    world.respawn_hero();
    world.phase = Phase::Playing;
    world.set_message(&def.name, 80);
}

/// All available levels: files from the levels directory first (sorted),
/// then the embedded fallback if nothing loaded.
pub fn level_defs(config: &GameConfig) -> Vec<LevelDef> {
    let mut defs = load_from_directory(&config.levels_dir);
    if defs.is_empty() {
        defs.push(embedded_level());
    }
    defs
}

fn load_from_directory(dir: &Path) -> Vec<LevelDef> {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return vec![],
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().map_or(false, |x| x == "txt"))
        .collect();
    paths.sort();

    let mut defs = vec![];
    for path in paths {
        let text = match std::fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) => {
                warn!(path = %path.display(), "could not read level: {e}");
                continue;
            }
        };
        match parse_level(&text) {
            Ok(def) => defs.push(def),
            Err(e) => {
                warn!(path = %path.display(), "skipping level: {e}");
            }
        }
    }
    defs
}

/// The built-in sandbox: a walled arena with a slope ramp up to a ledge
/// and a ceiling overhang to bump against.
fn embedded_level() -> LevelDef {
    let text = "\
# Sandbox
1111111111111111111111111
1000000000000000000000001
1000000000000000000000001
1000000000000000000000001
1000000000000000000000001
1000000000000005000000001
1000000000000000000000001
1000000P00000000000000001
1000000000000000000000001
1000000000002110000000001
1000000000021111000000211
1111111111111111111111111";
    parse_level(text).expect("embedded level must parse")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tile::TileId;

    #[test]
    fn parses_name_grid_and_spawn() {
        let def = parse_level("# Test Pit\n111\n1P1\n111").unwrap();
        assert_eq!(def.name, "Test Pit");
        assert_eq!(def.rows.len(), 3);
        assert_eq!(def.rows[1], vec![TileId(1), TileId(0), TileId(1)]);
        // Spawn centered in cell (1, 1).
        assert_eq!(def.spawn, Vec2::new(48.0, 48.0));
    }

    #[test]
    fn space_and_zero_are_both_open() {
        let def = parse_level("#x\nP 0\n111").unwrap();
        assert_eq!(def.rows[0], vec![TileId(0), TileId(0), TileId(0)]);
    }

    #[test]
    fn ragged_rows_survive_parsing() {
        let def = parse_level("#x\nP1111\n11\n1").unwrap();
        assert_eq!(def.rows[0].len(), 5);
        assert_eq!(def.rows[1].len(), 2);
        assert_eq!(def.rows[2].len(), 1);
    }

    #[test]
    fn bad_character_fails_fast() {
        match parse_level("#x\nP?1") {
            Err(LevelError::BadTile { row: 0, col: 1, ch: '?' }) => {}
            other => panic!("expected BadTile, got {other:?}"),
        }
    }

    #[test]
    fn missing_spawn_fails_fast() {
        assert!(matches!(parse_level("#x\n111"), Err(LevelError::MissingSpawn)));
        assert!(matches!(parse_level("# only a title"), Err(LevelError::Empty)));
    }

    #[test]
    fn uncataloged_digits_still_load() {
        let def = parse_level("#x\nP7").unwrap();
        assert_eq!(def.rows[0][1], TileId(7));
    }

    #[test]
    fn embedded_level_is_valid() {
        let def = embedded_level();
        assert_eq!(def.name, "Sandbox");
        assert!(def.rows.len() >= 8);
        // Spawn sits inside the arena walls.
        assert!(def.spawn.x > TILE_W && def.spawn.y > TILE_H);
    }
}
