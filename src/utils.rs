//! Shared utility functions for the studio

use bevy::prelude::*;
use bevy_egui::EguiContexts;

/// Check if keyboard input should be processed by studio systems.
///
/// Returns `false` (block input) when the egui UI wants keyboard input,
/// e.g. while a text field is focused.
///
/// # Example
/// ```ignore
/// fn my_input_handler(mut contexts: EguiContexts) {
///     if !should_process_input(&mut contexts) {
///         return;
///     }
///     // Handle input...
/// }
/// ```
pub fn should_process_input(contexts: &mut EguiContexts) -> bool {
    if let Ok(ctx) = contexts.ctx_mut() {
        if ctx.wants_keyboard_input() {
            return false;
        }
    }

    true
}

/// Check if the pointer is currently interacting with the egui UI.
/// Scene click handlers bail out when this returns `true` so panel clicks
/// never fall through into the 3D viewport.
pub fn pointer_over_ui(contexts: &mut EguiContexts) -> bool {
    if let Ok(ctx) = contexts.ctx_mut() {
        if ctx.wants_pointer_input() || ctx.is_pointer_over_area() {
            return true;
        }
    }

    false
}

/// Calculate a rotation quaternion that aligns the local Y axis with the given normal
pub fn rotation_from_normal(normal: Vec3) -> Quat {
    let up = Vec3::Y;

    if normal.dot(up).abs() > 0.999 {
        if normal.y > 0.0 {
            Quat::IDENTITY
        } else {
            Quat::from_rotation_x(std::f32::consts::PI)
        }
    } else {
        Quat::from_rotation_arc(up, normal)
    }
}

/// Shortest distance from a point to a ray (clamped to the forward half of
/// the ray, so points behind the origin measure to the origin itself)
pub fn point_to_ray_distance(point: Vec3, ray_origin: Vec3, ray_direction: Vec3) -> f32 {
    let to_point = point - ray_origin;
    let t = to_point.dot(ray_direction).max(0.0);
    let closest = ray_origin + ray_direction * t;
    point.distance(closest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_from_normal_aligns_y_axis() {
        let normal = Vec3::new(1.0, 0.0, 0.0);
        let rotated = rotation_from_normal(normal) * Vec3::Y;
        assert!(rotated.abs_diff_eq(normal, 1e-5));

        // Straight down flips rather than producing a degenerate arc
        let down = rotation_from_normal(Vec3::NEG_Y) * Vec3::Y;
        assert!(down.abs_diff_eq(Vec3::NEG_Y, 1e-5));
    }

    #[test]
    fn ray_distance_measures_perpendicular_offset() {
        let d = point_to_ray_distance(Vec3::new(0.0, 2.0, -5.0), Vec3::ZERO, Vec3::NEG_Z);
        assert!((d - 2.0).abs() < 1e-5);

        // Point behind the ray origin measures to the origin
        let behind = point_to_ray_distance(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::NEG_Z);
        assert!((behind - 3.0).abs() < 1e-5);
    }
}
