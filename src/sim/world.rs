/// WorldState: the complete snapshot of a running session.
///
/// ## Coordinates
///
/// The simulation lives in world pixel space. The renderer owns the
/// pixel → terminal-cell mapping; the camera here is a pixel-space
/// viewport whose size the renderer reports back each frame.
///
/// ## Camera
///
/// Dead-zone follow: the hero moves freely inside the inner 60% of the
/// viewport and only drags the camera near the edges. Maps smaller than
/// the viewport are centered.

use crate::config::PhysicsConfig;
use crate::domain::hero::Hero;
use crate::domain::tile::TileSet;
use crate::domain::vector::Vec2;
use crate::sim::map::{SolidityView, TileMap};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Title,
    Playing,
}

/// A pixel-space viewport into the world.
/// `(x, y)` is the world coordinate of the top-left visible pixel
/// (negative when a small map is centered).
#[derive(Clone, Debug)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub view_w: f32,
    pub view_h: f32,
}

impl Camera {
    pub fn new() -> Self {
        Camera { x: 0.0, y: 0.0, view_w: 0.0, view_h: 0.0 }
    }

    /// Follow a target within the given world pixel bounds.
    pub fn follow(&mut self, target: Vec2, world_w: f32, world_h: f32) {
        if self.view_w <= 0.0 || self.view_h <= 0.0 {
            return;
        }

        if world_w <= self.view_w {
            self.x = -(self.view_w - world_w) / 2.0;
        } else {
            let margin = self.view_w / 5.0;
            if target.x < self.x + margin {
                self.x = target.x - margin;
            } else if target.x > self.x + self.view_w - margin {
                self.x = target.x - self.view_w + margin;
            }
            self.x = self.x.clamp(0.0, world_w - self.view_w);
        }

        if world_h <= self.view_h {
            self.y = -(self.view_h - world_h) / 2.0;
        } else {
            let margin = self.view_h / 5.0;
            if target.y < self.y + margin {
                self.y = target.y - margin;
            } else if target.y > self.y + self.view_h - margin {
                self.y = target.y - self.view_h + margin;
            }
            self.y = self.y.clamp(0.0, world_h - self.view_h);
        }
    }

    /// Snap directly to center on a position (level load / restart).
    pub fn center_on(&mut self, target: Vec2, world_w: f32, world_h: f32) {
        if self.view_w <= 0.0 || self.view_h <= 0.0 {
            return;
        }
        if world_w <= self.view_w {
            self.x = -(self.view_w - world_w) / 2.0;
        } else {
            self.x = (target.x - self.view_w / 2.0).clamp(0.0, world_w - self.view_w);
        }
        if world_h <= self.view_h {
            self.y = -(self.view_h - world_h) / 2.0;
        } else {
            self.y = (target.y - self.view_h / 2.0).clamp(0.0, world_h - self.view_h);
        }
    }
}

pub struct WorldState {
    // ── Static level data ──
    pub map: TileMap,
    pub tiles: TileSet,
    pub level_name: String,
    pub hero_spawn: Vec2,

    // ── The actor ──
    pub hero: Hero,

    // ── Physics constants (from config) ──
    pub phys: PhysicsConfig,

    // ── Meta ──
    pub phase: Phase,
    pub tick: u64,
    pub paused: bool,
    /// Draw the rotated reference points over the hero.
    pub debug_points: bool,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,

    // ── Camera / viewport ──
    pub camera: Camera,
}

impl WorldState {
    pub fn new(phys: PhysicsConfig) -> Self {
        WorldState {
            map: TileMap::new(vec![]),
            tiles: TileSet::standard(),
            level_name: String::new(),
            hero_spawn: Vec2::ZERO,
            hero: Hero::new(0.0, 0.0),
            phys,
            phase: Phase::Title,
            tick: 0,
            paused: false,
            debug_points: false,
            message: String::new(),
            message_timer: 0,
            camera: Camera::new(),
        }
    }

    /// Solidity oracle over this world's map and catalog.
    /// The step function splits the borrows itself; this is for callers
    /// that hold the world as a whole.
    #[allow(dead_code)]
    pub fn solidity(&self) -> SolidityView<'_> {
        SolidityView { map: &self.map, tiles: &self.tiles }
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    /// Put the hero back at the spawn point with a fresh pose.
    pub fn respawn_hero(&mut self) {
        self.hero = Hero::new(self.hero_spawn.x, self.hero_spawn.y);
        let (w, h) = self.map.pixel_size();
        self.camera.center_on(self.hero_spawn, w, h);
    }
}
