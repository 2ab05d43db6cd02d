use bevy::picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings, RayCastVisibility};
use bevy::prelude::*;
use surface_scatter::geometry::Ray;
use surface_scatter::projection::{SpatialQuery, SurfaceHit, SurfaceMask};

/// Surface layer of a mesh entity, matched against the brush's surface mask.
///
/// Meshes without this component are on layer 0.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SurfaceCategory(pub u8);

/// [`SpatialQuery`] over the meshes in the world, backed by [`MeshRayCast`].
pub struct MeshSurfaceQuery<'q, 'w, 's> {
    ray_cast: &'q mut MeshRayCast<'w, 's>,
    category_of: &'q dyn Fn(Entity) -> u8,
}

impl<'q, 'w, 's> MeshSurfaceQuery<'q, 'w, 's> {
    pub fn new(ray_cast: &'q mut MeshRayCast<'w, 's>, category_of: &'q dyn Fn(Entity) -> u8) -> Self {
        Self {
            ray_cast,
            category_of,
        }
    }
}

impl SpatialQuery for MeshSurfaceQuery<'_, '_, '_> {
    fn raycast(&mut self, ray: &Ray, max_distance: f32, mask: SurfaceMask) -> Option<SurfaceHit> {
        let direction = Dir3::new(ray.direction).ok()?;
        let category_of = self.category_of;
        let filter = |entity: Entity| mask.contains(category_of(entity));
        let settings = MeshRayCastSettings::default()
            .with_visibility(RayCastVisibility::Any)
            .with_filter(&filter)
            .always_early_exit();

        let (entity, hit) = self
            .ray_cast
            .cast_ray(Ray3d::new(ray.origin, direction), &settings)
            .first()?;
        if hit.distance > max_distance {
            return None;
        }
        Some(SurfaceHit {
            point: hit.point,
            normal: hit.normal,
            distance: hit.distance,
            category: category_of(*entity),
        })
    }
}

/// Converts a camera pick ray into a brush pointer input.
pub fn pointer_input(ray: Ray3d, view_up: Vec3) -> crate::ScatterBrushInput {
    crate::ScatterBrushInput(surface_scatter::session::InputEvent::PointerMoved {
        ray: Ray::new(ray.origin, *ray.direction),
        view_up,
    })
}
