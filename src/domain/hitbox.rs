/// Hero hitbox geometry.
///
/// The hero sprite is 32x32 but the hitbox is 22x28, centered on the hero's
/// position. A fixed set of named points around the hitbox drives all
/// collision probes:
///
/// ```text
///                 TC
///    TL *---------*---------* TR
///       |                   |
///       |                   |
///       |                   |
///       |                   |
///    ML *         *         * MR      <- hitbox center (hero position)
///       |                   |
///       |                   |
///    LL *                   * LR
///       |                   |
///    BL *---*-----*-----*---* BR
///          BIL    BC   BIR
/// ```
///
/// Points are authored in the unrotated local frame (x right, y down,
/// origin at the center) and only ever reach the world through
/// `HitboxFrame::rotated`, which keeps the whole set rigidly attached to
/// the hero at any heading.

use super::vector::Vec2;

/// Hitbox extent in pixels.
pub const HERO_W: f32 = 22.0;
pub const HERO_H: f32 = 28.0;

/// Bottom-edge probe count: one probe per pixel of hitbox width.
pub const HERO_SPAN: u32 = HERO_W as u32;

const HALF_W: f32 = HERO_W / 2.0;
const HALF_H: f32 = HERO_H / 2.0;

// Local-frame offsets of the named points.
const TOP_LEFT: Vec2 = Vec2::new(-HALF_W, -HALF_H);
const TOP_CENTER: Vec2 = Vec2::new(0.0, -HALF_H);
const TOP_RIGHT: Vec2 = Vec2::new(HALF_W, -HALF_H);
const MID_LEFT: Vec2 = Vec2::new(-HALF_W, 0.0);
const MID_RIGHT: Vec2 = Vec2::new(HALF_W, 0.0);
const LOW_LEFT: Vec2 = Vec2::new(-HALF_W, 8.0);
const LOW_RIGHT: Vec2 = Vec2::new(HALF_W, 8.0);
const BOTTOM_LEFT: Vec2 = Vec2::new(-HALF_W, HALF_H);
const BOTTOM_CENTER: Vec2 = Vec2::new(0.0, HALF_H);
const BOTTOM_RIGHT: Vec2 = Vec2::new(HALF_W, HALF_H);
const BOTTOM_INNER_LEFT: Vec2 = Vec2::new(-7.0, HALF_H);
const BOTTOM_INNER_RIGHT: Vec2 = Vec2::new(7.0, HALF_H);

/// The reference point set expressed in world-relative offsets for one
/// specific heading. Recomputed whenever the heading changes.
#[derive(Clone, Copy, Debug)]
pub struct HitboxFrame {
    /// Unit "local-right" in world space.
    pub right: Vec2,
    /// Unit "local-down" in world space.
    pub down: Vec2,

    pub top_left: Vec2,
    pub top_center: Vec2,
    pub top_right: Vec2,
    pub mid_left: Vec2,
    pub mid_right: Vec2,
    pub low_left: Vec2,
    pub low_right: Vec2,
    pub bottom_left: Vec2,
    pub bottom_center: Vec2,
    pub bottom_right: Vec2,
    pub bottom_inner_left: Vec2,
    pub bottom_inner_right: Vec2,
}

impl HitboxFrame {
    /// Rotate the point set to the given heading (radians).
    ///
    /// Only the two base vectors go through the rotation matrix; every
    /// named point is then rebuilt as `a * right + b * down`. The change
    /// of basis keeps opposite points exactly antipodal even when sin/cos
    /// carry rounding error.
    pub fn rotated(angle: f32) -> Self {
        let right = Vec2::new(1.0, 0.0).rotated(angle);
        let down = Vec2::new(0.0, 1.0).rotated(angle);
        let place = |p: Vec2| right * p.x + down * p.y;

        HitboxFrame {
            right,
            down,
            top_left: place(TOP_LEFT),
            top_center: place(TOP_CENTER),
            top_right: place(TOP_RIGHT),
            mid_left: place(MID_LEFT),
            mid_right: place(MID_RIGHT),
            low_left: place(LOW_LEFT),
            low_right: place(LOW_RIGHT),
            bottom_left: place(BOTTOM_LEFT),
            bottom_center: place(BOTTOM_CENTER),
            bottom_right: place(BOTTOM_RIGHT),
            bottom_inner_left: place(BOTTOM_INNER_LEFT),
            bottom_inner_right: place(BOTTOM_INNER_RIGHT),
        }
    }

    pub fn upright() -> Self {
        Self::rotated(0.0)
    }

    /// Unit "local-up" in world space.
    pub fn up(&self) -> Vec2 {
        -self.down
    }

    /// All named points, for the debug overlay.
    pub fn points(&self) -> [Vec2; 12] {
        [
            self.top_left,
            self.top_center,
            self.top_right,
            self.mid_left,
            self.mid_right,
            self.low_left,
            self.low_right,
            self.bottom_left,
            self.bottom_center,
            self.bottom_right,
            self.bottom_inner_left,
            self.bottom_inner_right,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2, eps: f32) -> bool {
        (a.x - b.x).abs() < eps && (a.y - b.y).abs() < eps
    }

    #[test]
    fn upright_reproduces_local_offsets() {
        let f = HitboxFrame::upright();
        assert!(close(f.right, Vec2::new(1.0, 0.0), 1e-9));
        assert!(close(f.down, Vec2::new(0.0, 1.0), 1e-9));
        assert!(close(f.top_left, TOP_LEFT, 1e-9));
        assert!(close(f.bottom_right, BOTTOM_RIGHT, 1e-9));
        assert!(close(f.bottom_inner_left, BOTTOM_INNER_LEFT, 1e-9));
        assert!(close(f.mid_right, MID_RIGHT, 1e-9));
    }

    #[test]
    fn opposite_points_stay_antipodal() {
        for deg in [13.0_f32, 45.0, 90.0, 137.5, 251.0] {
            let f = HitboxFrame::rotated(deg.to_radians());
            assert!(close(f.top_left, -f.bottom_right, 1e-4), "deg={deg}");
            assert!(close(f.top_right, -f.bottom_left, 1e-4), "deg={deg}");
            assert!(close(f.mid_left, -f.mid_right, 1e-4), "deg={deg}");
        }
    }

    #[test]
    fn quarter_turn_swaps_axes() {
        let f = HitboxFrame::rotated(std::f32::consts::FRAC_PI_2);
        // Heading 90°: local-right now points down the screen.
        assert!(close(f.right, Vec2::new(0.0, 1.0), 1e-6));
        assert!(close(f.down, Vec2::new(-1.0, 0.0), 1e-6));
        // Top-center (0,-14) ends up 14 px to the screen-right.
        assert!(close(f.top_center, Vec2::new(14.0, 0.0), 1e-4));
    }

    #[test]
    fn base_vectors_stay_orthonormal() {
        for deg in [0.0_f32, 30.0, 60.0, 120.0, 300.0] {
            let f = HitboxFrame::rotated(deg.to_radians());
            let dot = f.right.x * f.down.x + f.right.y * f.down.y;
            let len_r = (f.right.x.powi(2) + f.right.y.powi(2)).sqrt();
            let len_d = (f.down.x.powi(2) + f.down.y.powi(2)).sqrt();
            assert!(dot.abs() < 1e-5, "deg={deg}");
            assert!((len_r - 1.0).abs() < 1e-5, "deg={deg}");
            assert!((len_d - 1.0).abs() < 1e-5, "deg={deg}");
        }
    }
}
