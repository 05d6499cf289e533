//! World/local frame conversions for hit points and surface normals.
//!
//! Normals do not transform like positions: under non-uniform scale the
//! correct world direction comes from the inverse-transpose of the linear
//! part of the transform, not from the transform itself. Everything here
//! goes through `GlobalTransform` so nested hierarchies are already folded
//! in.

use bevy::prelude::*;

use crate::constants::placement::SURFACE_OFFSET;

/// Transform a mesh-local direction into a world-space unit normal using
/// the inverse-transpose of the transform's linear part. Returns `Vec3::ZERO`
/// for degenerate transforms.
pub fn normal_to_world(transform: &GlobalTransform, local_normal: Vec3) -> Vec3 {
    let linear = transform.affine().matrix3;
    (linear.inverse().transpose() * local_normal).normalize_or_zero()
}

/// Transform a world-space normal into the local frame of `transform`.
/// Inverse of [`normal_to_world`]: the inverse-transpose of the inverse
/// is just the transpose.
pub fn normal_to_local(transform: &GlobalTransform, world_normal: Vec3) -> Vec3 {
    let linear = transform.affine().matrix3;
    (linear.transpose() * world_normal).normalize_or_zero()
}

/// Transform a world-space position into the local frame of `transform`
pub fn point_to_local(transform: &GlobalTransform, world_point: Vec3) -> Vec3 {
    transform.affine().inverse().transform_point3(world_point)
}

/// Nudge a hit point along its surface normal so the stored position sits
/// just off the surface. Points without a normal are stored as hit.
pub fn apply_surface_offset(point: Vec3, normal: Option<Vec3>) -> Vec3 {
    match normal {
        Some(normal) => point + normal * SURFACE_OFFSET,
        None => point,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_uses_inverse_transpose_under_nonuniform_scale() {
        // Stretch x by 2. A surface normal leaning into x must lean LESS
        // in world space, which only the inverse-transpose produces.
        let transform = GlobalTransform::from(Transform::from_scale(Vec3::new(2.0, 1.0, 1.0)));
        let local = Vec3::new(1.0, 1.0, 0.0).normalize();

        let world = normal_to_world(&transform, local);
        let expected = Vec3::new(0.5, 1.0, 0.0).normalize();
        assert!(
            world.abs_diff_eq(expected, 1e-5),
            "got {world:?}, expected {expected:?}"
        );

        // The naive direction transform gives the wrong answer here
        let naive = (transform.affine().matrix3 * local).normalize();
        assert!(!world.abs_diff_eq(naive, 1e-3));
    }

    #[test]
    fn normal_matches_direct_transform_under_pure_rotation() {
        let transform = GlobalTransform::from(Transform::from_rotation(Quat::from_rotation_y(
            std::f32::consts::FRAC_PI_2,
        )));

        // Rotating +Z by 90 degrees about Y lands on +X
        let world = normal_to_world(&transform, Vec3::Z);
        assert!(world.abs_diff_eq(Vec3::X, 1e-5), "got {world:?}");
    }

    #[test]
    fn world_and_local_normals_round_trip() {
        let transform = GlobalTransform::from(
            Transform::from_scale(Vec3::new(2.0, 1.0, 0.5))
                .with_rotation(Quat::from_rotation_z(0.7)),
        );
        let local = Vec3::new(0.3, -0.8, 0.5).normalize();

        let world = normal_to_world(&transform, local);
        let back = normal_to_local(&transform, world);
        assert!(back.abs_diff_eq(local, 1e-4), "got {back:?}");
    }

    #[test]
    fn point_to_local_inverts_the_full_transform() {
        let transform = GlobalTransform::from(
            Transform::from_translation(Vec3::new(1.0, 2.0, -3.0))
                .with_rotation(Quat::from_rotation_y(1.1))
                .with_scale(Vec3::splat(2.0)),
        );
        let world = Vec3::new(4.0, -1.0, 0.5);

        let local = point_to_local(&transform, world);
        let forward = transform.affine().transform_point3(local);
        assert!(forward.abs_diff_eq(world, 1e-4));
    }

    #[test]
    fn surface_offset_applies_only_with_a_normal() {
        let hit = Vec3::new(1.0, 0.0, -2.0);

        let offset = apply_surface_offset(hit, Some(Vec3::Y));
        assert!(offset.abs_diff_eq(Vec3::new(1.0, 0.005, -2.0), 1e-6));

        let bare = apply_surface_offset(hit, None);
        assert_eq!(bare, hit);
    }
}
