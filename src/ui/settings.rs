//! Persistent viewer settings

use bevy::prelude::*;
use bevy_egui::{EguiContext, EguiContextSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::studio::StudioState;

fn default_marker_scale() -> f32 {
    1.0
}

fn default_markers_on_start() -> bool {
    true
}

/// Viewer settings that persist to disk
#[derive(Resource, Serialize, Deserialize, Clone)]
pub struct ViewerSettings {
    /// UI scale factor (1.0 = default)
    pub ui_scale: f32,
    /// Orbit drag sensitivity in radians per pixel
    pub orbit_sensitivity: f32,
    /// Dolly speed per scroll unit
    pub zoom_speed: f32,
    /// Pan speed per pixel, scaled by camera distance
    pub pan_speed: f32,
    /// Uniform scale applied to snap point markers
    #[serde(default = "default_marker_scale")]
    pub marker_scale: f32,
    /// Whether markers start visible
    #[serde(default = "default_markers_on_start")]
    pub markers_visible_on_start: bool,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            ui_scale: 1.25,
            orbit_sensitivity: 0.005,
            zoom_speed: 0.1,
            pan_speed: 0.0015,
            marker_scale: 1.0,
            markers_visible_on_start: true,
        }
    }
}

impl ViewerSettings {
    /// Get the settings file path
    fn file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("bevy_snap_point_editor");
            p.push("settings.ron");
            p
        })
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::file_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(content) => ron::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to disk
    pub fn save(&self) {
        let Some(path) = Self::file_path() else {
            error!("Could not determine config directory");
            return;
        };

        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {}", e);
                return;
            }
        }

        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(content) => {
                if let Err(e) = fs::write(&path, content) {
                    error!("Failed to save settings: {}", e);
                } else {
                    info!("Settings saved to: {:?}", path);
                }
            }
            Err(e) => {
                error!("Failed to serialize settings: {}", e);
            }
        }
    }
}

pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        // Load settings on startup
        let settings = ViewerSettings::load();
        app.insert_resource(settings)
            .add_systems(Startup, apply_settings_to_studio_state)
            .add_systems(Update, apply_ui_scale);
    }
}

/// Apply loaded settings to the studio state on startup
fn apply_settings_to_studio_state(
    settings: Res<ViewerSettings>,
    mut studio_state: ResMut<StudioState>,
) {
    studio_state.markers_visible = settings.markers_visible_on_start;
}

/// Apply UI scale to egui
fn apply_ui_scale(
    settings: Res<ViewerSettings>,
    mut query: Query<&mut EguiContextSettings, With<EguiContext>>,
) {
    if !settings.is_changed() {
        return;
    }
    for mut ctx_settings in &mut query {
        ctx_settings.scale_factor = settings.ui_scale;
    }
}
