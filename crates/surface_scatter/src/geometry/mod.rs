//! Geometric primitives shared by the projection and session layers.
use glam::{Quat, Vec3};

pub mod frame;

/// Local axis of a placed instance that is aligned with the surface normal.
pub const INSTANCE_UP: Vec3 = Vec3::Y;

/// A half-line defined by an origin and a direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction for rays produced by this crate; queries must not rely on it.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Point along the ray at parameter `t`.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Angle between two directions in degrees, in `[0, 180]`.
#[inline]
pub fn slope_degrees(a: Vec3, b: Vec3) -> f32 {
    a.angle_between(b).to_degrees()
}

/// Rotation that maps [`INSTANCE_UP`] onto `normal`, applied after a spin of
/// `jitter` radians about the instance's own up axis.
pub fn align_to_normal(normal: Vec3, jitter: f32) -> Quat {
    let align = match normal.try_normalize() {
        Some(n) => Quat::from_rotation_arc(INSTANCE_UP, n),
        None => Quat::IDENTITY,
    };
    align * Quat::from_rotation_y(jitter)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn ray_at_walks_along_direction() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        assert_eq!(ray.at(2.0), Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn slope_between_perpendicular_axes_is_ninety() {
        assert!((slope_degrees(Vec3::Y, Vec3::X) - 90.0).abs() < 1e-4);
        assert!(slope_degrees(Vec3::Y, Vec3::Y).abs() < 1e-4);
    }

    #[test]
    fn align_maps_instance_up_onto_normal() {
        let normal = Vec3::new(1.0, 1.0, 0.0).normalize();
        let rotation = align_to_normal(normal, 1.3);
        let up = rotation * INSTANCE_UP;
        assert!((up - normal).length() < 1e-5);
    }

    #[test]
    fn jitter_spins_about_up_on_flat_ground() {
        let rotation = align_to_normal(Vec3::Y, FRAC_PI_2);
        let forward = rotation * Vec3::Z;
        assert!((forward - Vec3::X).length() < 1e-5);
    }
}
