/// The step function: advances the world by one frame.
///
/// Processing order (one frame):
///   1. Walk acceleration / idle deceleration
///   2. Horizontal sweep (slope climb, then wall stop)
///   3. Jump impulse
///   4. Gravity (+ one-sided terminal clamp)
///   5. Vertical sweep (floor landing / ceiling stop)
///
/// ## Sweeps
///
/// Both sweeps move in unit (1-pixel) increments along the hero's local
/// axes and re-probe the tile map after every increment. Velocities can
/// exceed one pixel per frame, and testing only the final position would
/// tunnel through thin geometry. The step count is
/// `ceil(|speed| * dt_coef)`, so even a sub-pixel speed produces one probe
/// step. A hit on any step — including step 0 — retreats one unit, which
/// guarantees the hero never ends a frame embedded in solid geometry.
///
/// Horizontal and vertical are swept separately: slope climbing is a
/// horizontal-only rule, floors and ceilings are vertical-only.

use crate::domain::hero::{FrameInput, Hero};
use crate::domain::hitbox::HERO_SPAN;
use crate::domain::vector::Vec2;
use crate::config::PhysicsConfig;
use crate::sim::map::SolidityView;
use super::event::StepEvent;
use super::world::{Phase, WorldState};

/// Height of the slope-climb probe window, in pixels above the leading
/// bottom corner. Tuned in the original; see also the snap below.
const CLIMB_PROBE: u32 = 4;

/// A wall bump below this impact speed is the per-frame re-contact of a
/// hero held against a wall (speed is rezeroed every frame, so it never
/// ramps past one acceleration step). Only faster hits produce an event.
const BUMP_EVENT_SPEED: f32 = 1.0;

pub fn advance(world: &mut WorldState, input: FrameInput, dt_coef: f32) -> Vec<StepEvent> {
    if world.phase != Phase::Playing {
        return vec![];
    }

    let mut events: Vec<StepEvent> = Vec::new();
    world.tick += 1;

    if world.message_timer > 0 {
        world.message_timer -= 1;
        if world.message_timer == 0 {
            world.message.clear();
        }
    }

    // Split the borrows: the oracle reads map + catalog while the hero
    // is mutated.
    let WorldState { ref map, ref tiles, ref mut hero, ref phys, .. } = *world;
    let solid = SolidityView { map, tiles };

    hero.apply_walk_input(input, phys);
    resolve_horizontal(hero, solid, dt_coef, &mut events);

    if hero.apply_jump(input.jump, phys) {
        events.push(StepEvent::Jumped);
    }
    hero.apply_gravity(phys);
    resolve_vertical(hero, solid, phys, dt_coef, &mut events);

    events
}

/// Unit steps for one sweep: `ceil(|speed| * dt_coef)`.
fn sweep_steps(speed: f32, dt_coef: f32) -> u32 {
    let magnitude = speed.abs() * dt_coef;
    if !magnitude.is_finite() {
        return 0;
    }
    magnitude.ceil() as u32
}

// ══════════════════════════════════════════════════════════════
// Horizontal sweep: slope climb, then wall stop
// ══════════════════════════════════════════════════════════════

fn resolve_horizontal(
    hero: &mut Hero,
    solid: SolidityView<'_>,
    dt_coef: f32,
    events: &mut Vec<StepEvent>,
) {
    let steps = sweep_steps(hero.walk_speed, dt_coef);
    if steps == 0 {
        return;
    }
    let moving_right = hero.walk_speed > 0.0;
    let dir = if moving_right { 1.0 } else { -1.0 };
    let impact_speed = hero.walk_speed.abs();
    let f = hero.frame;

    // Leading edge = side of travel; trailing top point joins the
    // clear-path check for the climb rule.
    let (lead_top, lead_mid, lead_low, lead_bottom, trail_top) = if moving_right {
        (f.top_right, f.mid_right, f.low_right, f.bottom_right, f.top_left)
    } else {
        (f.top_left, f.mid_left, f.low_left, f.bottom_left, f.top_right)
    };

    for _ in 0..steps {
        hero.pos += f.right * dir;

        // Slope climb: the five clear points (leading top corner with 3
        // units of headroom, top-center, trailing top corner, leading mid
        // and low) must all be open while something solid sits within the
        // probe window above the leading bottom corner.
        let clear_above = {
            let open = |off: Vec2, extra: Vec2| {
                let p = hero.pos + off + extra;
                !solid.is_solid(p.x, p.y)
            };
            open(lead_top, f.up() * 3.0)
                && open(f.top_center, Vec2::ZERO)
                && open(trail_top, Vec2::ZERO)
                && open(lead_mid, Vec2::ZERO)
                && open(lead_low, Vec2::ZERO)
        };
        if clear_above {
            for j in 0..CLIMB_PROBE {
                let p = hero.pos + lead_bottom + f.up() * j as f32;
                if solid.is_solid(p.x, p.y) {
                    // Snap the full window height, as the original tuning
                    // does regardless of where in the window the hit was.
                    hero.pos += f.up() * CLIMB_PROBE as f32;
                    events.push(StepEvent::StepClimbed);
                    break;
                }
            }
        }

        // Wall stop on the three leading-edge points (post-climb pose).
        let blocked = {
            let at = |off: Vec2| {
                let p = hero.pos + off;
                solid.is_solid(p.x, p.y)
            };
            at(lead_top) || at(lead_mid) || at(lead_low)
        };
        if blocked {
            hero.walk_speed = 0.0;
            hero.pos -= f.right * dir;
            if impact_speed >= BUMP_EVENT_SPEED {
                events.push(StepEvent::WallBumped);
            }
            break;
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Vertical sweep: floor landing / ceiling stop
// ══════════════════════════════════════════════════════════════

fn resolve_vertical(
    hero: &mut Hero,
    solid: SolidityView<'_>,
    phys: &PhysicsConfig,
    dt_coef: f32,
    events: &mut Vec<StepEvent>,
) {
    let steps = sweep_steps(hero.fall_speed, dt_coef);
    if steps == 0 {
        return;
    }
    let falling = hero.fall_speed > 0.0;
    let dir = if falling { 1.0 } else { -1.0 };
    let entry_speed = hero.fall_speed;
    let f = hero.frame;

    'sweep: for _ in 0..steps {
        hero.pos += f.down * dir;

        if falling {
            // Probe the whole bottom edge, one point per pixel of width.
            for j in 0..HERO_SPAN {
                let p = hero.pos + f.bottom_left + f.right * j as f32;
                if solid.is_solid(p.x, p.y) {
                    hero.fall_speed = 0.0;
                    hero.pos -= f.down;
                    // A grounded hero re-contacts the floor every frame
                    // with exactly one gravity tick of speed; anything
                    // faster is a real landing.
                    if hero.airborne || entry_speed > phys.gravity {
                        events.push(StepEvent::Landed);
                    }
                    hero.airborne = false;
                    break 'sweep;
                }
            }
        } else {
            let hit = {
                let at = |off: Vec2| {
                    let p = hero.pos + off;
                    solid.is_solid(p.x, p.y)
                };
                at(f.top_left) || at(f.top_center) || at(f.top_right)
            };
            if hit {
                hero.fall_speed = 0.0;
                hero.pos += f.down;
                events.push(StepEvent::CeilingBumped);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tile::TileId;
    use crate::sim::map::TileMap;

    fn phys() -> PhysicsConfig {
        PhysicsConfig {
            max_walk_speed: 3.0,
            walk_acceleration: 0.3,
            idle_deceleration: 1.0,
            jump_impulse: -14.0,
            gravity: 1.0,
            max_fall_speed: 6.0,
        }
    }

    /// Build a playing world from an ASCII grid.
    /// ' ' open, '#' wall, '/' floor slope rising right, '\' rising left.
    fn world_from(rows: &[&str], spawn_x: f32, spawn_y: f32) -> WorldState {
        let grid = rows
            .iter()
            .map(|row| {
                row.chars()
                    .map(|ch| {
                        TileId(match ch {
                            '#' => 1,
                            '/' => 2,
                            '\\' => 3,
                            _ => 0,
                        })
                    })
                    .collect()
            })
            .collect();
        let mut w = WorldState::new(phys());
        w.map = TileMap::new(grid);
        w.hero = crate::domain::hero::Hero::new(spawn_x, spawn_y);
        w.phase = Phase::Playing;
        w
    }

    const IDLE: FrameInput = FrameInput { left: false, right: false, jump: false };
    const RIGHT: FrameInput = FrameInput { left: false, right: true, jump: false };
    const JUMP: FrameInput = FrameInput { left: false, right: false, jump: true };

    /// 8-column world: open space above a solid floor in row 6
    /// (floor surface at y = 192).
    fn floor_world(spawn_x: f32, spawn_y: f32) -> WorldState {
        world_from(
            &[
                "        ",
                "        ",
                "        ",
                "        ",
                "        ",
                "        ",
                "########",
            ],
            spawn_x,
            spawn_y,
        )
    }

    fn run(w: &mut WorldState, input: FrameInput, frames: u32) -> Vec<StepEvent> {
        let mut all = vec![];
        for _ in 0..frames {
            all.extend(advance(w, input, 1.0));
        }
        all
    }

    #[test]
    fn falls_onto_floor_and_rests_at_surface() {
        let mut w = floor_world(100.0, 100.0);
        assert!(w.hero.airborne);
        let events = run(&mut w, IDLE, 60);

        assert!(!w.hero.airborne);
        assert_eq!(w.hero.fall_speed, 0.0);
        // Floor surface at 192, half hitbox height 14: rests within one
        // sub-step unit of 178.
        assert!((w.hero.pos.y - 178.0).abs() <= 1.0, "y = {}", w.hero.pos.y);
        assert!(events.contains(&StepEvent::Landed));

        // No bottom-edge point inside the floor.
        let sol = w.solidity();
        for j in 0..HERO_SPAN {
            let p = w.hero.pos + w.hero.frame.bottom_left + w.hero.frame.right * j as f32;
            assert!(!sol.is_solid(p.x, p.y));
        }
    }

    #[test]
    fn free_fall_keeps_velocity_and_completes_all_steps() {
        let mut w = world_from(&["        "], 100.0, 50.0);
        run(&mut w, IDLE, 10);
        // Terminal velocity reached, nothing to hit: constant descent.
        assert_eq!(w.hero.fall_speed, 6.0);
        let y0 = w.hero.pos.y;
        advance(&mut w, IDLE, 1.0);
        assert_eq!(w.hero.pos.y - y0, 6.0);
        assert_eq!(w.hero.fall_speed, 6.0);
    }

    #[test]
    fn immediate_floor_hit_still_retreats_one_unit() {
        let mut w = floor_world(100.0, 177.0); // resting pose, bottom at 191
        w.hero.airborne = false;
        w.hero.fall_speed = 6.0; // pretend a stale velocity
        advance(&mut w, IDLE, 1.0);
        // First sub-step enters the floor; hero is pushed back out.
        assert_eq!(w.hero.pos.y, 177.0);
        assert_eq!(w.hero.fall_speed, 0.0);
    }

    #[test]
    fn walks_right_until_speed_saturates() {
        let mut w = floor_world(60.0, 177.0);
        w.hero.airborne = false;
        let mut xs = vec![w.hero.pos.x];
        for _ in 0..30 {
            advance(&mut w, RIGHT, 1.0);
            xs.push(w.hero.pos.x);
        }
        // x strictly increases every frame.
        for pair in xs.windows(2) {
            assert!(pair[1] > pair[0], "{} -> {}", pair[0], pair[1]);
        }
        assert_eq!(w.hero.walk_speed, 3.0);
        // Saturated: constant displacement per frame.
        let x0 = w.hero.pos.x;
        advance(&mut w, RIGHT, 1.0);
        let dx = w.hero.pos.x - x0;
        advance(&mut w, RIGHT, 1.0);
        assert_eq!(w.hero.pos.x - x0 - dx, dx);
    }

    #[test]
    fn delta_time_coefficient_scales_displacement() {
        let mut w = floor_world(60.0, 177.0);
        w.hero.airborne = false;
        run(&mut w, RIGHT, 20); // saturate at 3 px/frame
        let x0 = w.hero.pos.x;
        advance(&mut w, RIGHT, 2.0);
        assert_eq!(w.hero.pos.x - x0, 6.0);
    }

    #[test]
    fn stops_against_wall_with_no_leading_point_solid() {
        // Wall column at col 5 (x 160..191).
        let mut w = world_from(
            &[
                "        ",
                "        ",
                "        ",
                "        ",
                "     #  ",
                "     #  ",
                "########",
            ],
            100.0,
            177.0,
        );
        w.hero.airborne = false;
        let events = run(&mut w, RIGHT, 40);

        assert_eq!(w.hero.walk_speed, 0.0);
        assert!(events.contains(&StepEvent::WallBumped));
        // Right edge parked just short of the wall face at x = 160.
        assert!(w.hero.pos.x + 11.0 < 160.0);
        assert!(w.hero.pos.x + 11.0 >= 157.0, "x = {}", w.hero.pos.x);

        let sol = w.solidity();
        let f = w.hero.frame;
        for off in [f.top_right, f.mid_right, f.low_right] {
            let p = w.hero.pos + off;
            assert!(!sol.is_solid(p.x, p.y));
        }
    }

    #[test]
    fn climbs_a_rising_slope_instead_of_halting() {
        // Slope tile at row 5, cols 6-7: surface rises to the right from
        // the floor at y = 192.
        let mut w = world_from(
            &[
                "        ",
                "        ",
                "        ",
                "        ",
                "        ",
                "      /#",
                "########",
            ],
            140.0,
            177.0,
        );
        w.hero.airborne = false;
        let y0 = w.hero.pos.y;
        let events = run(&mut w, RIGHT, 30);

        assert!(events.contains(&StepEvent::StepClimbed));
        // The hero gained height and kept moving — no wall stop at the
        // slope's foot.
        assert!(w.hero.pos.y < y0 - 8.0, "y = {}", w.hero.pos.y);
        assert!(w.hero.pos.x > 160.0, "x = {}", w.hero.pos.x);
    }

    #[test]
    fn jump_rises_then_lands_back() {
        let mut w = floor_world(100.0, 177.0);
        w.hero.airborne = false;
        let events = advance(&mut w, JUMP, 1.0);
        assert!(events.contains(&StepEvent::Jumped));
        assert!(w.hero.airborne);
        assert!(w.hero.pos.y < 177.0);
        assert!(w.hero.fall_speed < 0.0);

        let events = run(&mut w, IDLE, 60);
        assert!(events.contains(&StepEvent::Landed));
        assert!(!w.hero.airborne);
        assert!((w.hero.pos.y - 177.0).abs() <= 1.0);
    }

    #[test]
    fn ceiling_stops_a_rising_jump() {
        // Ceiling row 3 (bottom face at y = 127), floor row 6.
        let mut w = world_from(
            &[
                "        ",
                "        ",
                "        ",
                "########",
                "        ",
                "        ",
                "########",
            ],
            100.0,
            177.0,
        );
        w.hero.airborne = false;

        let mut all = vec![];
        all.extend(advance(&mut w, JUMP, 1.0));
        all.extend(run(&mut w, IDLE, 5));
        assert!(all.contains(&StepEvent::CeilingBumped));
        // Head stays below the ceiling face.
        assert!(w.hero.pos.y - 14.0 >= 128.0, "y = {}", w.hero.pos.y);
        // Rise was cancelled; gravity takes over.
        assert!(w.hero.fall_speed >= 0.0);
    }

    #[test]
    fn grounded_idle_emits_no_landing_spam() {
        let mut w = floor_world(100.0, 177.0);
        w.hero.airborne = false;
        w.hero.fall_speed = 0.0;
        let events = run(&mut w, IDLE, 10);
        assert!(!events.contains(&StepEvent::Landed));
        assert!(!events.contains(&StepEvent::WallBumped));
    }
}
