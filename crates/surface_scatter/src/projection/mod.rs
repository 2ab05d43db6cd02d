//! Projection of brush samples onto surfaces through a [`SpatialQuery`].
//!
//! Each sample becomes a downward ray from above the brush plane. A hit is accepted only
//! when its surface category passes an explicit bitwise test against the brush mask, even
//! though the query was already asked to filter by that mask.
use std::f32::consts::TAU;

use glam::{Quat, Vec2, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::brush::BrushConfig;
use crate::geometry::frame::TangentFrame;
use crate::geometry::{align_to_normal, slope_degrees, Ray};
use crate::sampling::samples::PlacementSample;

pub mod surfaces;

/// Offset along the surface normal applied to projected outline points.
pub const OUTLINE_LIFT: f32 = 0.01;

/// Bitset of surface categories (layers `0..32`).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceMask(pub u32);

impl SurfaceMask {
    pub const ALL: SurfaceMask = SurfaceMask(u32::MAX);
    pub const NONE: SurfaceMask = SurfaceMask(0);

    pub fn from_layers(layers: &[u8]) -> Self {
        Self(
            layers
                .iter()
                .filter(|&&l| l < 32)
                .fold(0, |bits, &l| bits | (1 << l)),
        )
    }

    /// Whether the mask includes `category`. Categories outside `0..32` never match.
    #[inline]
    pub fn contains(self, category: u8) -> bool {
        category < 32 && (self.0 & (1u32 << category)) != 0
    }

    pub fn with_layer(self, category: u8) -> Self {
        Self(self.0 | Self::from_layers(&[category]).0)
    }
}

impl Default for SurfaceMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Result of a successful ray query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
    pub point: Vec3,
    pub normal: Vec3,
    /// Distance from the ray origin to `point`.
    pub distance: f32,
    /// Category (layer index) of the hit surface.
    pub category: u8,
}

/// Ray queries against the scene's surfaces.
///
/// Implementations should honour `mask` and `max_distance`, but callers re-check the
/// category of every hit.
pub trait SpatialQuery {
    fn raycast(&mut self, ray: &Ray, max_distance: f32, mask: SurfaceMask) -> Option<SurfaceHit>;
}

impl<Q: SpatialQuery + ?Sized> SpatialQuery for &mut Q {
    fn raycast(&mut self, ray: &Ray, max_distance: f32, mask: SurfaceMask) -> Option<SurfaceHit> {
        (**self).raycast(ray, max_distance, mask)
    }
}

impl<Q: SpatialQuery + ?Sized> SpatialQuery for Box<Q> {
    fn raycast(&mut self, ray: &Ray, max_distance: f32, mask: SurfaceMask) -> Option<SurfaceHit> {
        (**self).raycast(ray, max_distance, mask)
    }
}

/// Where a sample landed on the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfacePlacement {
    pub position: Vec3,
    pub normal: Vec3,
    /// Orientation of an instance placed here: aligned to `normal`, then jittered.
    pub rotation: Quat,
    /// Angle between the brush up axis and `normal`.
    pub slope_degrees: f32,
    pub category: u8,
}

impl SurfacePlacement {
    /// Blend factor from flat (0) to vertical (1) used to tint previews.
    pub fn slope_tint(&self) -> f32 {
        (self.slope_degrees / 90.0).clamp(0.0, 1.0)
    }

    /// Whether previews should flag this placement as steep.
    pub fn is_display_steep(&self, threshold_degrees: f32) -> bool {
        self.slope_degrees > threshold_degrees
    }
}

/// Per-sample outcome of one layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementResult {
    /// Index of the sample this result was projected from.
    pub sample_index: usize,
    /// Surface placement, absent on a miss or a category mismatch.
    pub surface: Option<SurfacePlacement>,
    /// Valid and within the commit slope threshold.
    pub commit_eligible: bool,
}

impl PlacementResult {
    pub fn invalid(sample_index: usize) -> Self {
        Self {
            sample_index,
            surface: None,
            commit_eligible: false,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.surface.is_some()
    }

    pub fn position(&self) -> Option<Vec3> {
        self.surface.map(|s| s.position)
    }

    pub fn normal(&self) -> Option<Vec3> {
        self.surface.map(|s| s.normal)
    }
}

/// Projects samples and the brush outline through a tangent frame.
pub struct SurfaceProjector;

impl SurfaceProjector {
    /// Projects one sample onto the surface below the brush.
    pub fn project<Q: SpatialQuery + ?Sized>(
        frame: &TangentFrame,
        sample: &PlacementSample,
        sample_index: usize,
        brush: &BrushConfig,
        query: &mut Q,
    ) -> PlacementResult {
        let ray = frame.projection_ray(sample.disc * brush.radius, brush.ray_elevation_height);
        let Some(hit) = cast_masked(query, &ray, brush.max_projection_distance(), brush) else {
            return PlacementResult::invalid(sample_index);
        };

        let slope = slope_degrees(frame.up, hit.normal);
        PlacementResult {
            sample_index,
            surface: Some(SurfacePlacement {
                position: hit.point,
                normal: hit.normal,
                rotation: align_to_normal(hit.normal, sample.orientation_jitter),
                slope_degrees: slope,
                category: hit.category,
            }),
            commit_eligible: slope <= brush.max_slope_degrees,
        }
    }

    /// Projects every sample, keeping sample order.
    pub fn project_all<Q: SpatialQuery + ?Sized>(
        frame: &TangentFrame,
        samples: &[PlacementSample],
        brush: &BrushConfig,
        query: &mut Q,
    ) -> Vec<PlacementResult> {
        samples
            .iter()
            .enumerate()
            .map(|(i, s)| Self::project(frame, s, i, brush, query))
            .collect()
    }

    /// Projects the footprint circle as a closed loop of `segments + 1` points.
    ///
    /// Points that miss the surface fall back to the flat brush plane.
    pub fn project_outline<Q: SpatialQuery + ?Sized>(
        frame: &TangentFrame,
        brush: &BrushConfig,
        query: &mut Q,
        segments: usize,
    ) -> Vec<Vec3> {
        if segments == 0 {
            return Vec::new();
        }

        let mut points = Vec::with_capacity(segments + 1);
        for i in 0..segments {
            let angle = i as f32 / segments as f32 * TAU;
            let local = Vec2::new(angle.cos(), angle.sin()) * brush.radius;
            let ray = frame.projection_ray(local, brush.ray_elevation_height);
            let point = match cast_masked(query, &ray, brush.max_projection_distance(), brush) {
                Some(hit) => hit.point + hit.normal * OUTLINE_LIFT,
                None => frame.to_world(local, 0.0),
            };
            points.push(point);
        }
        points.push(points[0]);
        points
    }
}

fn cast_masked<Q: SpatialQuery + ?Sized>(
    query: &mut Q,
    ray: &Ray,
    max_distance: f32,
    brush: &BrushConfig,
) -> Option<SurfaceHit> {
    query
        .raycast(ray, max_distance, brush.surface_mask)
        .filter(|hit| brush.surface_mask.contains(hit.category))
}
