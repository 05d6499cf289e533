//! Scene geometry picking via mesh ray casts

use bevy::picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings, RayCastVisibility};
use bevy::prelude::*;

/// A resolved pointer/scene intersection
#[derive(Debug, Clone)]
pub struct SceneHit {
    /// The mesh entity the ray struck
    pub entity: Entity,
    /// World-space hit position
    pub point: Vec3,
    /// World-space unit surface normal at the hit, when the mesh provides
    /// a usable one
    pub normal: Option<Vec3>,
    /// Distance from the ray origin
    pub distance: f32,
}

/// Cast a ray against scene meshes and return the nearest hit, skipping
/// entities the `filter` rejects. Markers and other input-capture helpers
/// are excluded at the cast so they never shadow real geometry behind them.
pub fn pick_scene(
    ray_cast: &mut MeshRayCast,
    ray: Ray3d,
    filter: impl Fn(Entity) -> bool,
) -> Option<SceneHit> {
    let settings = MeshRayCastSettings::default()
        .with_visibility(RayCastVisibility::Visible)
        .with_filter(&filter);

    let (entity, hit) = ray_cast.cast_ray(ray, &settings).first()?;
    Some(SceneHit {
        entity: *entity,
        point: hit.point,
        normal: hit.normal.try_normalize(),
        distance: hit.distance,
    })
}

/// Build the pointer ray for the current cursor position.
/// `None` when the cursor is outside the window or the projection is
/// degenerate.
pub fn pointer_ray(
    window: &Window,
    camera: &Camera,
    camera_transform: &GlobalTransform,
) -> Option<Ray3d> {
    let cursor_position = window.cursor_position()?;
    camera
        .viewport_to_world(camera_transform, cursor_position)
        .ok()
}
