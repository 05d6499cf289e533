//! Main studio plugin bundling all snap point editing functionality

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin};

use super::camera::StudioCameraPlugin;
use super::state::{StudioStatePlugin, ToggleMarkersEvent};
use crate::markers::MarkerPlugin;
use crate::picking::PickingPlugin;
use crate::placement::PlacementPlugin;
use crate::snap_points::SnapPointsPlugin;
use crate::ui::UiPlugin;
use crate::utils::should_process_input;

/// Main plugin that bundles the whole snap point studio.
///
/// Add this (plus `DefaultPlugins`) to get the orbit camera, the placement
/// workflow, marker rendering, and the editing panel. Tag product component
/// roots with [`crate::picking::ComponentRoot`] so placed points tether to
/// them.
pub struct SnapPointEditorPlugin;

impl Plugin for SnapPointEditorPlugin {
    fn build(&self, app: &mut App) {
        app
            // Third-party plugins
            .add_plugins(EguiPlugin::default())
            // Studio core
            .add_plugins(StudioStatePlugin)
            .add_plugins(StudioCameraPlugin)
            .add_plugins(PickingPlugin)
            // Snap point editing
            .add_plugins(SnapPointsPlugin)
            .add_plugins(PlacementPlugin)
            .add_plugins(MarkerPlugin)
            // UI
            .add_plugins(UiPlugin)
            // Setup
            .add_systems(Startup, setup_studio_lighting)
            .add_systems(Update, handle_studio_hotkeys);
    }
}

/// Setup baseline lighting so untextured models read well from any angle
fn setup_studio_lighting(mut commands: Commands) {
    // Ambient light (a component in Bevy 0.18+)
    commands.spawn(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
        affects_lightmapped_meshes: true,
    });
}

/// Global hotkeys that are not tied to a specific mode
fn handle_studio_hotkeys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut toggle_markers: MessageWriter<ToggleMarkersEvent>,
    mut contexts: EguiContexts,
) {
    if !should_process_input(&mut contexts) {
        return;
    }

    if keyboard.just_pressed(KeyCode::KeyM) {
        toggle_markers.write(ToggleMarkersEvent);
    }
}
