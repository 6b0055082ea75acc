/// Minimal 2D vector math for the pixel-space simulation.
///
/// Everything here is plain f32 world/local coordinates, x right, y down
/// (screen convention). Rotation follows the standard 2D rotation matrix,
/// so positive angles turn clockwise in screen space.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    /// Rotate by `angle` radians.
    pub fn rotated(self, angle: f32) -> Vec2 {
        let (sin, cos) = angle.sin_cos();
        Vec2 {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }
}

/// Headings are authored in degrees; the simulation works in radians.
/// This is the one place the conversion happens.
pub fn deg_to_rad(deg: f32) -> f32 {
    deg * std::f32::consts::PI / 180.0
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2, eps: f32) -> bool {
        (a.x - b.x).abs() < eps && (a.y - b.y).abs() < eps
    }

    #[test]
    fn rotation_by_zero_is_identity() {
        let v = Vec2::new(3.5, -7.25);
        let r = v.rotated(0.0);
        assert!((r.x - v.x).abs() < 1e-9);
        assert!((r.y - v.y).abs() < 1e-9);
    }

    #[test]
    fn quarter_turn() {
        // x right, y down: +90° sends (1,0) to (0,1)
        let r = Vec2::new(1.0, 0.0).rotated(std::f32::consts::FRAC_PI_2);
        assert!(close(r, Vec2::new(0.0, 1.0), 1e-6));
    }

    #[test]
    fn rotation_composes() {
        let v = Vec2::new(2.0, 5.0);
        for &(a, b) in &[(0.3f32, 0.4f32), (1.1, -0.7), (-2.0, 2.0)] {
            let two_step = v.rotated(a).rotated(b);
            let one_step = v.rotated(a + b);
            assert!(close(two_step, one_step, 1e-4), "a={a} b={b}");
        }
    }

    #[test]
    fn degree_conversion() {
        assert!((deg_to_rad(180.0) - std::f32::consts::PI).abs() < 1e-6);
        assert!((deg_to_rad(-45.0) + std::f32::consts::FRAC_PI_4).abs() < 1e-6);
        assert_eq!(deg_to_rad(0.0), 0.0);
    }
}
