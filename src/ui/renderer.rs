/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (a grid of Cells)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// ## Pixel → cell mapping
///
/// The simulation is in world pixels; a terminal cell covers
/// `PX_PER_COL` x `PX_PER_ROW` pixels, so one 32x32 tile is two columns
/// wide and one row tall. The renderer reports the resulting viewport
/// size (in pixels) back to the camera every frame.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::tile::{TileId, TILE_H, TILE_W};
use crate::sim::world::{Phase, WorldState};

/// World pixels per terminal column / row.
const PX_PER_COL: f32 = TILE_W / 2.0;
const PX_PER_ROW: f32 = TILE_H;

/// Vertical layout: HUD on top, message line at the bottom.
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" cells, also used for
    /// Clear, so inter-row gap pixels match on VTE-based terminals.
    const BASE_BG: Color = Color::Rgb { r: 18, g: 18, b: 28 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer; differs from any
    /// real cell so every position gets diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color) -> Self {
        Cell { ch, fg, bg: Cell::BASE_BG }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell::new(ch, fg));
            cx += 1;
        }
    }

    fn put_centered(&mut self, y: usize, s: &str, fg: Color) {
        let x = (self.width.saturating_sub(s.chars().count())) / 2;
        self.put_str(x, y, s, fg);
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;
        self.sync_size();
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    fn sync_size(&mut self) {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let (tw, th) = (tw as usize, th as usize);
        if tw != self.term_w || th != self.term_h {
            self.term_w = tw;
            self.term_h = th;
            self.front.resize(tw, th);
            self.back.resize(tw, th);
            // Force a full repaint.
            self.back.cells.fill(Cell::INVALID);
        }
    }

    pub fn render(&mut self, world: &mut WorldState) -> io::Result<()> {
        self.sync_size();
        self.front.clear();

        // Report viewport size (in world pixels) back to the camera.
        let map_rows = self.term_h.saturating_sub(MAP_ROW + 1);
        world.camera.view_w = self.term_w as f32 * PX_PER_COL;
        world.camera.view_h = map_rows as f32 * PX_PER_ROW;

        match world.phase {
            Phase::Title => self.compose_title(world),
            Phase::Playing => self.compose_playing(world),
        }

        self.flush_diff()
    }

    // ── Screens ──

    fn compose_title(&mut self, world: &WorldState) {
        let fb = &mut self.front;
        let mid = fb.height / 2;
        fb.put_centered(mid.saturating_sub(4), "S L O P E W A L K E R", Color::Yellow);
        fb.put_centered(
            mid.saturating_sub(2),
            "a tiny platformer with a rotatable hitbox",
            Color::Grey,
        );
        fb.put_centered(mid + 1, "[Enter] Start      [Q] Quit", Color::White);
        fb.put_centered(
            mid + 3,
            "Move: ← → / A D    Jump: ↑ / W / Space",
            Color::Grey,
        );
        fb.put_centered(
            mid + 4,
            "Tilt: [ ]  Reset: 0    Pause: P    Restart: R    Debug: G",
            Color::Grey,
        );
        if !world.message.is_empty() {
            fb.put_centered(fb.height.saturating_sub(2), &world.message, Color::Cyan);
        }
    }

    fn compose_playing(&mut self, world: &WorldState) {
        self.compose_hud(world);
        self.compose_map(world);
        self.compose_hero(world);
        if world.debug_points {
            self.compose_debug_points(world);
        }

        let fb = &mut self.front;
        if world.paused {
            fb.put_centered(fb.height / 2, "  PAUSED — [P] resume  ", Color::Yellow);
        }
        if !world.message.is_empty() {
            fb.put_centered(fb.height.saturating_sub(1), &world.message, Color::Cyan);
        }
    }

    fn compose_hud(&mut self, world: &WorldState) {
        let hero = &world.hero;
        let mut hud = format!(
            "{}  walk {:+.1}  fall {:+.1}  tilt {:+.0}°  {}",
            world.level_name,
            hero.walk_speed,
            hero.fall_speed,
            hero.heading_deg,
            if hero.airborne { "airborne" } else { "grounded" },
        );
        if world.debug_points {
            hud.push_str(&format!(
                "  ({:.0},{:.0}) t={}",
                hero.pos.x, hero.pos.y, world.tick
            ));
        }
        self.front.put_str(1, HUD_ROW, &hud, Color::Cyan);
    }

    /// Map a world pixel to a terminal cell, relative to the camera.
    fn cell_of(&self, world: &WorldState, x: f32, y: f32) -> Option<(usize, usize)> {
        let cx = ((x - world.camera.x) / PX_PER_COL).floor();
        let cy = ((y - world.camera.y) / PX_PER_ROW).floor();
        let map_rows = self.term_h.saturating_sub(MAP_ROW + 1);
        if cx < 0.0 || cy < 0.0 || cx >= self.term_w as f32 || cy >= map_rows as f32 {
            return None;
        }
        Some((cx as usize, MAP_ROW + cy as usize))
    }

    fn compose_map(&mut self, world: &WorldState) {
        let (rows, cols) = world.map.dimensions();
        for row in 0..rows {
            for col in 0..cols {
                let Some(id) = world.map.tile_at(row, col) else { continue };
                if id == TileId(0) {
                    continue;
                }
                let glyph = match world.tiles.get(id) {
                    Some(def) => def.glyph,
                    // Uncataloged id: visibly marked, not invisible.
                    None => ['?', '?'],
                };
                let x = col as f32 * TILE_W;
                let y = row as f32 * TILE_H;
                if let Some((cx, cy)) = self.cell_of(world, x, y) {
                    self.front.set(cx, cy, Cell::new(glyph[0], Color::DarkGrey));
                    self.front.set(cx + 1, cy, Cell::new(glyph[1], Color::DarkGrey));
                }
            }
        }
    }

    fn compose_hero(&mut self, world: &WorldState) {
        let hero = &world.hero;
        if let Some((cx, cy)) = self.cell_of(world, hero.pos.x, hero.pos.y) {
            self.front.set(cx, cy, Cell::new('@', Color::Yellow));
        }
    }

    fn compose_debug_points(&mut self, world: &WorldState) {
        let hero = &world.hero;
        for p in hero.frame.points() {
            let world_p = hero.pos + p;
            if let Some((cx, cy)) = self.cell_of(world, world_p.x, world_p.y) {
                self.front.set(cx, cy, Cell::new('·', Color::Red));
            }
        }
    }

    // ── Diff flush ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.cells[y * self.front.width + x];
                if cell == self.back.cells[y * self.back.width + x] {
                    continue;
                }
                queue!(self.writer, MoveTo(x as u16, y as u16))?;
                if last_fg != Some(cell.fg) {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = Some(cell.fg);
                }
                if last_bg != Some(cell.bg) {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = Some(cell.bg);
                }
                queue!(self.writer, Print(cell.ch))?;
            }
        }
        self.writer.flush()?;

        std::mem::swap(&mut self.front.cells, &mut self.back.cells);
        Ok(())
    }
}
