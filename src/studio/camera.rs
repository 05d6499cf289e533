//! Orbit camera for inspecting the product model

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::ui::ViewerSettings;
use crate::utils::pointer_over_ui;

/// Closest the camera can dolly to the target
const MIN_DISTANCE: f32 = 0.3;
/// Farthest the camera can dolly from the target
const MAX_DISTANCE: f32 = 40.0;
/// Pitch limit keeping the camera off the poles
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.05;

pub struct StudioCameraPlugin;

impl Plugin for StudioCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_studio_camera).add_systems(
            Update,
            (camera_orbit, camera_pan, camera_zoom, apply_orbit_transform).chain(),
        );
    }
}

/// Marker component for the studio camera
#[derive(Component)]
pub struct StudioCamera;

/// Orbit camera state: spherical coordinates around a focus target
#[derive(Component)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub target: Vec3,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.6,
            pitch: -0.4,
            distance: 4.0,
            target: Vec3::new(0.0, 0.8, 0.0),
        }
    }
}

impl OrbitCamera {
    /// Camera pose for the current spherical coordinates
    pub fn transform(&self) -> Transform {
        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0);
        let position = self.target + rotation * (Vec3::Z * self.distance);
        Transform::from_translation(position).looking_at(self.target, Vec3::Y)
    }
}

fn spawn_studio_camera(mut commands: Commands) {
    let orbit = OrbitCamera::default();
    let transform = orbit.transform();

    commands.spawn((
        StudioCamera,
        orbit,
        Camera3d::default(),
        transform,
    ));
}

/// Orbit with right mouse button drag
fn camera_orbit(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    settings: Res<ViewerSettings>,
    mut query: Query<&mut OrbitCamera, With<StudioCamera>>,
    mut contexts: EguiContexts,
) {
    if !mouse_button.pressed(MouseButton::Right) {
        return;
    }
    if pointer_over_ui(&mut contexts) {
        return;
    }

    let delta = mouse_motion.delta;
    if delta == Vec2::ZERO {
        return;
    }

    for mut orbit in &mut query {
        orbit.yaw -= delta.x * settings.orbit_sensitivity;
        orbit.pitch =
            (orbit.pitch - delta.y * settings.orbit_sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }
}

/// Pan the focus target with middle mouse button drag
fn camera_pan(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    settings: Res<ViewerSettings>,
    mut query: Query<(&mut OrbitCamera, &Transform), With<StudioCamera>>,
    mut contexts: EguiContexts,
) {
    if !mouse_button.pressed(MouseButton::Middle) {
        return;
    }
    if pointer_over_ui(&mut contexts) {
        return;
    }

    let delta = mouse_motion.delta;
    if delta == Vec2::ZERO {
        return;
    }

    for (mut orbit, transform) in &mut query {
        // Pan in the camera plane, scaled so a drag covers roughly the
        // same screen distance at any zoom level
        let scale = orbit.distance * settings.pan_speed;
        let right = transform.right().as_vec3();
        let up = transform.up().as_vec3();
        orbit.target -= right * delta.x * scale;
        orbit.target += up * delta.y * scale;
    }
}

/// Dolly in and out with the scroll wheel
fn camera_zoom(
    scroll: Res<AccumulatedMouseScroll>,
    settings: Res<ViewerSettings>,
    mut query: Query<&mut OrbitCamera, With<StudioCamera>>,
    mut contexts: EguiContexts,
) {
    if scroll.delta.y == 0.0 {
        return;
    }
    if pointer_over_ui(&mut contexts) {
        return;
    }

    for mut orbit in &mut query {
        let factor = 1.0 - scroll.delta.y * settings.zoom_speed;
        orbit.distance = (orbit.distance * factor.max(0.01)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

/// Write the orbit state into the camera transform
fn apply_orbit_transform(
    mut query: Query<(&OrbitCamera, &mut Transform), (With<StudioCamera>, Changed<OrbitCamera>)>,
) {
    for (orbit, mut transform) in &mut query {
        *transform = orbit.transform();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_transform_looks_at_target() {
        let orbit = OrbitCamera {
            yaw: 1.2,
            pitch: -0.5,
            distance: 6.0,
            target: Vec3::new(0.0, 1.0, 0.0),
        };
        let transform = orbit.transform();

        assert!((transform.translation.distance(orbit.target) - 6.0).abs() < 1e-4);

        let forward = transform.forward().as_vec3();
        let to_target = (orbit.target - transform.translation).normalize();
        assert!(forward.abs_diff_eq(to_target, 1e-4));
    }
}
