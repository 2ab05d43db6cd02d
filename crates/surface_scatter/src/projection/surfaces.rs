//! Analytic [`SpatialQuery`] implementations.
//!
//! - [`PlaneSurface`]: an infinite plane.
//! - [`HeightfieldSurface`]: a bilinearly interpolated height grid, intersected by clipping
//!   the ray to the grid bounds, marching, then refining the crossing by bisection.
//!   Rays entering through a side wall see the edge heights extended outwards.
//! - [`SurfaceStack`]: nearest hit over several queries.
use glam::{Vec2, Vec3};

use crate::error::{Error, Result};
use crate::geometry::Ray;
use crate::projection::{SpatialQuery, SurfaceHit, SurfaceMask};

const PARALLEL_EPSILON: f32 = 1e-8;
const BISECTION_STEPS: usize = 24;

/// An infinite plane through `point` with unit `normal`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneSurface {
    pub point: Vec3,
    pub normal: Vec3,
    pub category: u8,
}

impl PlaneSurface {
    /// Creates a plane; a zero normal falls back to `+Y`.
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.try_normalize().unwrap_or(Vec3::Y),
            category: 0,
        }
    }

    /// Horizontal plane at height `y` facing `+Y`.
    pub fn horizontal(y: f32) -> Self {
        Self::new(Vec3::new(0.0, y, 0.0), Vec3::Y)
    }

    pub fn with_category(mut self, category: u8) -> Self {
        self.category = category;
        self
    }
}

impl SpatialQuery for PlaneSurface {
    fn raycast(&mut self, ray: &Ray, max_distance: f32, mask: SurfaceMask) -> Option<SurfaceHit> {
        if !mask.contains(self.category) {
            return None;
        }
        let dir = ray.direction.try_normalize()?;
        let denom = dir.dot(self.normal);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = (self.point - ray.origin).dot(self.normal) / denom;
        if t < 0.0 || t > max_distance {
            return None;
        }
        Some(SurfaceHit {
            point: ray.origin + dir * t,
            normal: self.normal,
            distance: t,
            category: self.category,
        })
    }
}

/// Height samples on a regular XZ grid.
///
/// Sample `(ix, iz)` sits at `origin.xz + (ix, iz) * cell_size` with height
/// `origin.y + heights[iz * columns + ix]`.
#[derive(Clone, Debug)]
pub struct HeightfieldSurface {
    origin: Vec3,
    cell_size: f32,
    columns: usize,
    rows: usize,
    heights: Vec<f32>,
    min_height: f32,
    max_height: f32,
    pub category: u8,
}

impl HeightfieldSurface {
    pub fn new(
        origin: Vec3,
        cell_size: f32,
        columns: usize,
        rows: usize,
        heights: Vec<f32>,
    ) -> Result<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(Error::InvalidConfig("heightfield cell_size must be > 0".into()));
        }
        if columns < 2 || rows < 2 {
            return Err(Error::InvalidConfig(
                "heightfield needs at least 2x2 samples".into(),
            ));
        }
        if heights.len() != columns * rows {
            return Err(Error::InvalidConfig(format!(
                "heightfield expects {} samples, got {}",
                columns * rows,
                heights.len()
            )));
        }
        if heights.iter().any(|h| !h.is_finite()) {
            return Err(Error::InvalidConfig("heightfield heights must be finite".into()));
        }

        let min_height = heights.iter().copied().fold(f32::INFINITY, f32::min);
        let max_height = heights.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        Ok(Self {
            origin,
            cell_size,
            columns,
            rows,
            heights,
            min_height,
            max_height,
            category: 0,
        })
    }

    /// Builds a heightfield by evaluating `height(x, z)` at every world-space sample.
    pub fn from_fn(
        origin: Vec3,
        cell_size: f32,
        columns: usize,
        rows: usize,
        height: impl Fn(f32, f32) -> f32,
    ) -> Result<Self> {
        let mut heights = Vec::with_capacity(columns * rows);
        for iz in 0..rows {
            for ix in 0..columns {
                let x = origin.x + ix as f32 * cell_size;
                let z = origin.z + iz as f32 * cell_size;
                heights.push(height(x, z));
            }
        }
        Self::new(origin, cell_size, columns, rows, heights)
    }

    pub fn with_category(mut self, category: u8) -> Self {
        self.category = category;
        self
    }

    /// World-space XZ extent covered by the samples.
    pub fn extent(&self) -> Vec2 {
        Vec2::new(
            (self.columns - 1) as f32 * self.cell_size,
            (self.rows - 1) as f32 * self.cell_size,
        )
    }

    fn contains_xz(&self, x: f32, z: f32) -> bool {
        let extent = self.extent();
        let lx = x - self.origin.x;
        let lz = z - self.origin.z;
        (0.0..=extent.x).contains(&lx) && (0.0..=extent.y).contains(&lz)
    }

    #[inline]
    fn sample(&self, ix: usize, iz: usize) -> f32 {
        self.heights[iz * self.columns + ix]
    }

    /// Bilinear height with coordinates clamped to the grid.
    fn height_clamped(&self, x: f32, z: f32) -> f32 {
        let gx = ((x - self.origin.x) / self.cell_size).clamp(0.0, (self.columns - 1) as f32);
        let gz = ((z - self.origin.z) / self.cell_size).clamp(0.0, (self.rows - 1) as f32);
        let ix = (gx.floor() as usize).min(self.columns - 2);
        let iz = (gz.floor() as usize).min(self.rows - 2);
        let fx = gx - ix as f32;
        let fz = gz - iz as f32;

        let h00 = self.sample(ix, iz);
        let h10 = self.sample(ix + 1, iz);
        let h01 = self.sample(ix, iz + 1);
        let h11 = self.sample(ix + 1, iz + 1);
        let top = h00 + (h10 - h00) * fx;
        let bottom = h01 + (h11 - h01) * fx;
        self.origin.y + top + (bottom - top) * fz
    }

    /// World height at `(x, z)`, or `None` outside the grid.
    pub fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        self.contains_xz(x, z).then(|| self.height_clamped(x, z))
    }

    /// Surface normal at `(x, z)` from central differences, or `None` outside the grid.
    pub fn normal_at(&self, x: f32, z: f32) -> Option<Vec3> {
        self.contains_xz(x, z).then(|| self.normal_clamped(x, z))
    }

    /// Parametric range of `origin + dir * t` inside the grid's bounding box, grown by a
    /// small margin so a flat grid still has thickness.
    fn clip(&self, origin: Vec3, dir: Vec3) -> Option<(f32, f32)> {
        let extent = self.extent();
        let margin = Vec3::splat(self.cell_size * 1e-3);
        let min = Vec3::new(self.origin.x, self.origin.y + self.min_height, self.origin.z) - margin;
        let max = Vec3::new(
            self.origin.x + extent.x,
            self.origin.y + self.max_height,
            self.origin.z + extent.y,
        ) + margin;

        let mut t_near = 0.0f32;
        let mut t_far = f32::INFINITY;
        for axis in 0..3 {
            let (o, d, lo, hi) = (origin[axis], dir[axis], min[axis], max[axis]);
            if d.abs() < PARALLEL_EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let t1 = (lo - o) / d;
            let t2 = (hi - o) / d;
            t_near = t_near.max(t1.min(t2));
            t_far = t_far.min(t1.max(t2));
        }
        (t_near <= t_far).then_some((t_near, t_far))
    }

    /// Signed height of `p` above the surface, with the grid edge extended outwards.
    fn clearance(&self, p: Vec3) -> f32 {
        p.y - self.height_clamped(p.x, p.z)
    }

    fn normal_clamped(&self, x: f32, z: f32) -> Vec3 {
        let e = self.cell_size * 0.5;
        let dx = (self.height_clamped(x + e, z) - self.height_clamped(x - e, z)) / (2.0 * e);
        let dz = (self.height_clamped(x, z + e) - self.height_clamped(x, z - e)) / (2.0 * e);
        Vec3::new(-dx, 1.0, -dz).normalize()
    }
}

impl SpatialQuery for HeightfieldSurface {
    fn raycast(&mut self, ray: &Ray, max_distance: f32, mask: SurfaceMask) -> Option<SurfaceHit> {
        if !mask.contains(self.category) {
            return None;
        }
        let dir = ray.direction.try_normalize()?;
        let (t_start, t_clip) = self.clip(ray.origin, dir)?;
        let t_end = t_clip.min(max_distance);
        if t_start > t_end {
            return None;
        }

        let step = self.cell_size * 0.25;
        let steps = ((t_end - t_start) / step).ceil().max(1.0) as usize;

        let mut prev: Option<(f32, f32)> = None;
        for i in 0..=steps {
            let t = (t_start + i as f32 * step).min(t_end);
            let d = self.clearance(ray.origin + dir * t);
            if let Some((t_prev, d_prev)) = prev {
                if d_prev > 0.0 && d <= 0.0 {
                    let t_hit = self.refine(ray.origin, dir, t_prev, t);
                    let point = ray.origin + dir * t_hit;
                    return Some(SurfaceHit {
                        point,
                        normal: self.normal_clamped(point.x, point.z),
                        distance: t_hit,
                        category: self.category,
                    });
                }
            }
            prev = Some((t, d));
        }
        None
    }
}

impl HeightfieldSurface {
    fn refine(&self, origin: Vec3, dir: Vec3, mut above: f32, mut below: f32) -> f32 {
        for _ in 0..BISECTION_STEPS {
            let mid = 0.5 * (above + below);
            if self.clearance(origin + dir * mid) > 0.0 {
                above = mid;
            } else {
                below = mid;
            }
        }
        0.5 * (above + below)
    }
}

/// Returns the nearest hit over several queries.
#[derive(Default)]
pub struct SurfaceStack {
    layers: Vec<Box<dyn SpatialQuery>>,
}

impl SurfaceStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<Q: SpatialQuery + 'static>(mut self, query: Q) -> Self {
        self.push(query);
        self
    }

    pub fn push<Q: SpatialQuery + 'static>(&mut self, query: Q) {
        self.layers.push(Box::new(query));
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl SpatialQuery for SurfaceStack {
    fn raycast(&mut self, ray: &Ray, max_distance: f32, mask: SurfaceMask) -> Option<SurfaceHit> {
        self.layers
            .iter_mut()
            .filter_map(|q| q.raycast(ray, max_distance, mask))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
