/// The hero: the single simulated actor.
///
/// Owns pose (position, heading) and velocity state. The kinematics update
/// rules live here as methods; the collision sweeps that consume the
/// resulting velocities live in `sim::step`.

use tracing::warn;

use crate::config::PhysicsConfig;
use crate::domain::hitbox::HitboxFrame;
use crate::domain::vector::{deg_to_rad, Vec2};

/// One frame's worth of movement commands, already reduced to booleans
/// by the input layer.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

#[derive(Clone, Debug)]
pub struct Hero {
    /// World position of the hitbox center, in pixels.
    pub pos: Vec2,
    /// Heading in degrees as set by the caller.
    pub heading_deg: f32,
    /// Heading in radians (derived; 0 = upright).
    pub angle: f32,
    /// Reference points rotated to the current heading.
    pub frame: HitboxFrame,

    /// Signed horizontal speed along local-right, pixels per nominal frame.
    pub walk_speed: f32,
    /// Signed vertical speed along local-down; positive = falling.
    pub fall_speed: f32,
    /// Set by jumping, cleared by landing. Walking off a ledge does NOT
    /// set this flag — that matches the original tuning and allows a jump
    /// started from a ledge fall.
    pub airborne: bool,
}

impl Hero {
    pub fn new(x: f32, y: f32) -> Self {
        Hero {
            pos: Vec2::new(x, y),
            heading_deg: 0.0,
            angle: 0.0,
            frame: HitboxFrame::upright(),
            walk_speed: 0.0,
            fall_speed: 0.0,
            airborne: true,
        }
    }

    /// Set the heading. Degrees at the boundary, radians inside; the
    /// rotated frame is recomputed here so it can never go stale.
    pub fn set_heading_deg(&mut self, deg: f32) {
        self.heading_deg = deg;
        self.angle = deg_to_rad(deg);
        self.frame = HitboxFrame::rotated(self.angle);
    }

    // ── Kinematics update rules ──

    /// Apply walk acceleration / idle deceleration for this frame.
    pub fn apply_walk_input(&mut self, input: FrameInput, phys: &PhysicsConfig) {
        if input.left && !input.right {
            self.walk_speed -= phys.walk_acceleration;
        } else if input.right && !input.left {
            self.walk_speed += phys.walk_acceleration;
        } else if self.walk_speed.abs() < 1.0 {
            // Snap-to-zero threshold: avoids asymptotic creep while idle.
            self.walk_speed = 0.0;
        } else {
            // Decelerate toward zero, clamped so one step never crosses it.
            let step = phys.idle_deceleration.min(self.walk_speed.abs());
            self.walk_speed -= step * self.walk_speed.signum();
        }

        // Guard before the clamp: a clamp would hide an overflow instead
        // of surfacing it.
        if !self.walk_speed.is_finite() {
            warn!(
                walk_speed = self.walk_speed,
                "non-finite walk speed, resetting to zero"
            );
            self.walk_speed = 0.0;
        }

        self.walk_speed = self
            .walk_speed
            .clamp(-phys.max_walk_speed, phys.max_walk_speed);
    }

    /// Apply the jump impulse if grounded. Returns true when a jump
    /// actually started.
    pub fn apply_jump(&mut self, jump: bool, phys: &PhysicsConfig) -> bool {
        if jump && !self.airborne {
            self.airborne = true;
            self.fall_speed += phys.jump_impulse;
            return true;
        }
        false
    }

    /// Apply gravity. The terminal-velocity clamp is one-sided: only
    /// falling is limited, the rise from a jump impulse is not.
    pub fn apply_gravity(&mut self, phys: &PhysicsConfig) {
        self.fall_speed += phys.gravity;

        if !self.fall_speed.is_finite() {
            warn!(
                fall_speed = self.fall_speed,
                "non-finite fall speed, resetting to zero"
            );
            self.fall_speed = 0.0;
        }

        if self.fall_speed > phys.max_fall_speed {
            self.fall_speed = phys.max_fall_speed;
        }
    }
}
