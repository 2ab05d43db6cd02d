//! Local orthonormal frames anchored on a surface point.
//!
//! A [`TangentFrame`] expresses brush-local 2D coordinates as 3D world points and
//! downward projection rays. Its `up` axis is the surface normal at the anchor,
//! `forward` is perpendicular to both `up` and a caller-supplied reference vector,
//! and `left` completes the basis.
use glam::{Vec2, Vec3};

use crate::error::{Error, Result};
use crate::geometry::Ray;

/// Squared sine of the smallest angle accepted between `up` and the reference vector.
///
/// Below roughly 1e-3 rad the f32 cross product loses too many digits to give a
/// usable `forward`.
const PARALLEL_EPSILON: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TangentFrame {
    pub origin: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub left: Vec3,
}

impl TangentFrame {
    /// Builds a frame from a surface normal and a reference direction.
    ///
    /// Fails with [`Error::GeometryDegenerate`] when `surface_up` has no direction or
    /// `reference` is parallel to it; callers retry with another reference.
    pub fn from_up(origin: Vec3, surface_up: Vec3, reference: Vec3) -> Result<Self> {
        let degenerate = || Error::GeometryDegenerate {
            up: surface_up,
            reference,
        };

        let up = surface_up.try_normalize().ok_or_else(degenerate)?;
        let reference_dir = reference.try_normalize().ok_or_else(degenerate)?;
        let cross = up.cross(reference_dir);
        if cross.length_squared() <= PARALLEL_EPSILON {
            return Err(degenerate());
        }

        // Re-project onto the plane of `up` to drop the rounding left in `cross`.
        let forward = (cross - up * up.dot(cross)).normalize();
        let left = up.cross(forward);
        Ok(Self {
            origin,
            forward,
            up,
            left,
        })
    }

    /// Tries each reference in order and returns the first non-degenerate frame.
    pub fn from_up_with_fallbacks(
        origin: Vec3,
        surface_up: Vec3,
        references: &[Vec3],
    ) -> Result<Self> {
        let mut last = Error::GeometryDegenerate {
            up: surface_up,
            reference: Vec3::ZERO,
        };
        for &reference in references {
            match Self::from_up(origin, surface_up, reference) {
                Ok(frame) => return Ok(frame),
                Err(err) => last = err,
            }
        }
        Err(last)
    }

    /// Maps a point of the frame's forward/left plane, lifted by `height` along `up`.
    #[inline]
    pub fn to_world(&self, point: Vec2, height: f32) -> Vec3 {
        self.origin + self.forward * point.x + self.up * height + self.left * point.y
    }

    /// Maps frame-local `(forward, up, left)` coordinates to world space.
    #[inline]
    pub fn to_world_3d(&self, local: Vec3) -> Vec3 {
        self.origin + self.forward * local.x + self.up * local.y + self.left * local.z
    }

    /// Inverse of [`TangentFrame::to_world_3d`].
    #[inline]
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        let d = world - self.origin;
        Vec3::new(d.dot(self.forward), d.dot(self.up), d.dot(self.left))
    }

    /// Forward/left coordinates of `world`, dropping the height along `up`.
    #[inline]
    pub fn to_local_2d(&self, world: Vec3) -> Vec2 {
        let local = self.to_local(world);
        Vec2::new(local.x, local.z)
    }

    /// Ray starting `elevation` above `point` and pointing down the frame.
    pub fn projection_ray(&self, point: Vec2, elevation: f32) -> Ray {
        Ray::new(self.to_world(point, elevation), -self.up)
    }
}
