//! Brush configuration and the asset sets a brush draws from.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::projection::SurfaceMask;

pub mod assets;
pub mod selection;

/// Smallest radius the brush can shrink to.
pub const MIN_RADIUS: f32 = 1e-3;

/// Brush settings owned by the host UI and read by the session each cycle.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct BrushConfig {
    /// Footprint radius in world units.
    pub radius: f32,
    /// Number of samples scattered inside the footprint.
    pub spawn_count: usize,
    /// Largest slope, relative to the brush up axis, that is committed.
    pub max_slope_degrees: f32,
    /// Slope above which previews are drawn as steep. Display only.
    pub display_slope_degrees: f32,
    /// Surface categories the brush projects onto.
    pub surface_mask: SurfaceMask,
    /// Height above the brush plane at which projection rays start.
    pub ray_elevation_height: f32,
    /// Distance below the brush plane still searched for a surface.
    pub projection_depth: f32,
    /// Number of segments of the projected footprint outline (0 disables it).
    pub outline_segments: usize,
    /// Relative radius change per scroll notch.
    pub scroll_step: f32,
    /// When false the brush is inactive and ignores input.
    pub show_brush: bool,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            radius: 2.0,
            spawn_count: 8,
            max_slope_degrees: 45.0,
            display_slope_degrees: 30.0,
            surface_mask: SurfaceMask::ALL,
            ray_elevation_height: 5.0,
            projection_depth: 5.0,
            outline_segments: 64,
            scroll_step: 0.05,
            show_brush: true,
        }
    }
}

impl BrushConfig {
    /// Creates a config with the given radius and spawn count and default thresholds.
    pub fn new(radius: f32, spawn_count: usize) -> Self {
        Self {
            radius,
            spawn_count,
            ..Default::default()
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_spawn_count(mut self, spawn_count: usize) -> Self {
        self.spawn_count = spawn_count;
        self
    }

    pub fn with_max_slope_degrees(mut self, degrees: f32) -> Self {
        self.max_slope_degrees = degrees;
        self
    }

    pub fn with_display_slope_degrees(mut self, degrees: f32) -> Self {
        self.display_slope_degrees = degrees;
        self
    }

    pub fn with_surface_mask(mut self, mask: SurfaceMask) -> Self {
        self.surface_mask = mask;
        self
    }

    pub fn with_ray_elevation_height(mut self, height: f32) -> Self {
        self.ray_elevation_height = height;
        self
    }

    pub fn with_projection_depth(mut self, depth: f32) -> Self {
        self.projection_depth = depth;
        self
    }

    pub fn with_outline_segments(mut self, segments: usize) -> Self {
        self.outline_segments = segments;
        self
    }

    pub fn with_scroll_step(mut self, step: f32) -> Self {
        self.scroll_step = step;
        self
    }

    pub fn with_show_brush(mut self, show: bool) -> Self {
        self.show_brush = show;
        self
    }

    /// Maximum distance travelled by a sample projection ray.
    #[inline]
    pub fn max_projection_distance(&self) -> f32 {
        self.ray_elevation_height + self.projection_depth
    }

    /// Returns a copy with radius and spawn count clamped into their valid ranges.
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();
        out.radius = if out.radius.is_finite() {
            out.radius.max(MIN_RADIUS)
        } else {
            MIN_RADIUS
        };
        out.spawn_count = out.spawn_count.max(1);
        out
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(Error::InvalidConfig("radius must be > 0".into()));
        }
        if self.spawn_count == 0 {
            return Err(Error::InvalidConfig("spawn_count must be >= 1".into()));
        }
        if !(0.0..=180.0).contains(&self.max_slope_degrees) {
            return Err(Error::InvalidConfig(
                "max_slope_degrees must be within [0, 180]".into(),
            ));
        }
        if !(0.0..=180.0).contains(&self.display_slope_degrees) {
            return Err(Error::InvalidConfig(
                "display_slope_degrees must be within [0, 180]".into(),
            ));
        }
        if !self.ray_elevation_height.is_finite() || self.ray_elevation_height < 0.0 {
            return Err(Error::InvalidConfig(
                "ray_elevation_height must be >= 0".into(),
            ));
        }
        if !self.projection_depth.is_finite() || self.projection_depth < 0.0 {
            return Err(Error::InvalidConfig("projection_depth must be >= 0".into()));
        }
        if !(0.0..1.0).contains(&self.scroll_step) {
            return Err(Error::InvalidConfig(
                "scroll_step must be within [0, 1)".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_brush_tool_defaults() {
        let config = BrushConfig::default();
        assert_eq!(config.radius, 2.0);
        assert_eq!(config.spawn_count, 8);
        assert_eq!(config.max_slope_degrees, 45.0);
        assert_eq!(config.display_slope_degrees, 30.0);
        assert_eq!(config.max_projection_distance(), 10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_sets_fields() {
        let config = BrushConfig::new(3.0, 4)
            .with_max_slope_degrees(20.0)
            .with_display_slope_degrees(10.0)
            .with_surface_mask(SurfaceMask::from_layers(&[2]))
            .with_ray_elevation_height(1.0)
            .with_projection_depth(2.0)
            .with_outline_segments(0)
            .with_show_brush(false);

        assert_eq!(config.radius, 3.0);
        assert_eq!(config.spawn_count, 4);
        assert_eq!(config.surface_mask, SurfaceMask(0b100));
        assert_eq!(config.max_projection_distance(), 3.0);
        assert_eq!(config.outline_segments, 0);
        assert!(!config.show_brush);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(BrushConfig::default().with_radius(0.0).validate().is_err());
        assert!(BrushConfig::default().with_radius(f32::NAN).validate().is_err());
        assert!(BrushConfig::default().with_spawn_count(0).validate().is_err());
        assert!(BrushConfig::default()
            .with_max_slope_degrees(-1.0)
            .validate()
            .is_err());
        assert!(BrushConfig::default()
            .with_projection_depth(-1.0)
            .validate()
            .is_err());
        assert!(BrushConfig::default().with_scroll_step(1.0).validate().is_err());
    }

    #[test]
    fn sanitized_clamps_radius_and_count() {
        let config = BrushConfig::new(-2.0, 0).sanitized();
        assert_eq!(config.radius, MIN_RADIUS);
        assert_eq!(config.spawn_count, 1);
        assert!(config.validate().is_ok());

        let untouched = BrushConfig::new(1.5, 3);
        assert_eq!(untouched.sanitized(), untouched);
    }
}
