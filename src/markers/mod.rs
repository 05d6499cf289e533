//! Snap point markers: sphere meshes with normal arrows, hover tracking,
//! and click selection.
//!
//! Marker entities are reconciled against the store every frame: one sphere
//! per snap point, plus a stem/tip arrow for plane points. These systems
//! read the store and never write it back, except for the explicit click
//! selection handler.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;
use std::collections::HashSet;

use crate::constants::{marker_colors, marker_sizes};
use crate::picking::pointer_ray;
use crate::placement::PlacementMode;
use crate::snap_points::{SnapPointKind, SnapPointStore};
use crate::studio::{StudioCamera, StudioState};
use crate::ui::ViewerSettings;
use crate::utils::{point_to_ray_distance, pointer_over_ui, rotation_from_normal};

/// Visualization-only marker entity for one snap point. Also present on the
/// arrow parts so the geometry picker can exclude the whole marker by a
/// single component.
#[derive(Component, Debug)]
pub struct SnapMarker {
    pub id: String,
}

/// Distinguishes the arrow stem/tip children from the marker sphere
#[derive(Component)]
pub struct NormalArrow;

/// Transient hover state. Never persisted; purely visual plus the input
/// hint for click selection.
#[derive(Resource, Default, Debug)]
pub struct HoveredSnapPoint(pub Option<String>);

/// Shared marker meshes and the three state materials
#[derive(Resource)]
pub struct MarkerAssets {
    sphere: Handle<Mesh>,
    stem: Handle<Mesh>,
    tip: Handle<Mesh>,
    default_material: Handle<StandardMaterial>,
    hovered_material: Handle<StandardMaterial>,
    selected_material: Handle<StandardMaterial>,
}

impl MarkerAssets {
    /// Material for a marker given its interaction state. Selection wins
    /// over hover.
    fn material_for(&self, selected: bool, hovered: bool) -> Handle<StandardMaterial> {
        if selected {
            self.selected_material.clone()
        } else if hovered {
            self.hovered_material.clone()
        } else {
            self.default_material.clone()
        }
    }
}

pub struct MarkerPlugin;

impl Plugin for MarkerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HoveredSnapPoint>()
            .add_systems(Startup, setup_marker_assets)
            .add_systems(
                Update,
                (update_marker_hover, handle_marker_selection, sync_markers).chain(),
            );
    }
}

fn setup_marker_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let unlit = |color: Color| StandardMaterial {
        base_color: color,
        unlit: true,
        ..default()
    };

    commands.insert_resource(MarkerAssets {
        sphere: meshes.add(Sphere::new(marker_sizes::MARKER_RADIUS)),
        stem: meshes.add(Cylinder::new(
            marker_sizes::ARROW_STEM_RADIUS,
            marker_sizes::ARROW_STEM_LENGTH,
        )),
        tip: meshes.add(Cone::new(
            marker_sizes::ARROW_TIP_RADIUS,
            marker_sizes::ARROW_TIP_LENGTH,
        )),
        default_material: materials.add(unlit(marker_colors::DEFAULT)),
        hovered_material: materials.add(unlit(marker_colors::HOVERED)),
        selected_material: materials.add(unlit(marker_colors::SELECTED)),
    });
}

/// Track which marker sits under the pointer. Nearest qualifying marker to
/// the camera wins.
fn update_marker_hover(
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<StudioCamera>>,
    markers: Query<(&SnapMarker, &GlobalTransform), Without<NormalArrow>>,
    studio_state: Res<StudioState>,
    settings: Res<ViewerSettings>,
    mut hovered: ResMut<HoveredSnapPoint>,
    mut contexts: EguiContexts,
) {
    let next = hover_target(
        &window_query,
        &camera_query,
        &markers,
        &studio_state,
        &settings,
        &mut contexts,
    );
    if hovered.0 != next {
        hovered.0 = next;
    }
}

fn hover_target(
    window_query: &Query<&Window, With<PrimaryWindow>>,
    camera_query: &Query<(&Camera, &GlobalTransform), With<StudioCamera>>,
    markers: &Query<(&SnapMarker, &GlobalTransform), Without<NormalArrow>>,
    studio_state: &StudioState,
    settings: &ViewerSettings,
    contexts: &mut EguiContexts,
) -> Option<String> {
    if !studio_state.markers_visible {
        return None;
    }
    if pointer_over_ui(contexts) {
        return None;
    }

    let window = window_query.single().ok()?;
    let (camera, camera_transform) = camera_query.single().ok()?;
    let ray = pointer_ray(window, camera, camera_transform)?;

    let hover_radius = marker_sizes::MARKER_RADIUS
        * settings.marker_scale
        * marker_sizes::HOVER_RADIUS_FACTOR;

    nearest_marker_on_ray(
        ray,
        markers
            .iter()
            .map(|(marker, transform)| (marker.id.as_str(), transform.translation())),
        hover_radius,
    )
    .map(str::to_owned)
}

/// Of the markers whose center passes within `radius` of the ray, the one
/// nearest the ray origin
fn nearest_marker_on_ray<'a>(
    ray: Ray3d,
    markers: impl Iterator<Item = (&'a str, Vec3)>,
    radius: f32,
) -> Option<&'a str> {
    let origin = ray.origin;
    let direction: Vec3 = ray.direction.into();

    markers
        .filter(|(_, center)| point_to_ray_distance(*center, origin, direction) <= radius)
        .min_by(|(_, a), (_, b)| {
            a.distance_squared(origin)
                .total_cmp(&b.distance_squared(origin))
        })
        .map(|(id, _)| id)
}

/// Click selection outside placement mode. Clicking a marker selects its
/// snap point; clicking anything else clears the selection.
fn handle_marker_selection(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mode: Res<State<PlacementMode>>,
    hovered: Res<HoveredSnapPoint>,
    mut store: ResMut<SnapPointStore>,
    mut contexts: EguiContexts,
) {
    // Placement clicks own the pointer while the mode is active
    if *mode.get() == PlacementMode::Active {
        return;
    }
    if !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }
    if pointer_over_ui(&mut contexts) {
        return;
    }

    match &hovered.0 {
        Some(id) => {
            let id = id.clone();
            store.select(Some(&id));
            info!("Selected snap point {}", id);
        }
        None => {
            if store.selected_id().is_some() {
                store.select(None);
            }
        }
    }
}

/// Reconcile marker entities against the store: despawn stale markers,
/// update live ones, spawn missing ones
#[allow(clippy::too_many_arguments)]
fn sync_markers(
    mut commands: Commands,
    store: Res<SnapPointStore>,
    studio_state: Res<StudioState>,
    settings: Res<ViewerSettings>,
    hovered: Res<HoveredSnapPoint>,
    assets: Res<MarkerAssets>,
    mut spheres: Query<
        (
            Entity,
            &SnapMarker,
            &mut Transform,
            &mut Visibility,
            &mut MeshMaterial3d<StandardMaterial>,
        ),
        Without<NormalArrow>,
    >,
    mut arrows: Query<
        (&SnapMarker, &mut Visibility, &mut MeshMaterial3d<StandardMaterial>),
        With<NormalArrow>,
    >,
) {
    let root_visibility = if studio_state.markers_visible {
        Visibility::Visible
    } else {
        Visibility::Hidden
    };

    let mut seen: HashSet<String> = HashSet::new();

    for (entity, marker, mut transform, mut visibility, mut material) in &mut spheres {
        let Some(point) = store.get(&marker.id) else {
            // Point deleted; arrow children despawn with the sphere
            commands.entity(entity).despawn();
            continue;
        };
        seen.insert(marker.id.clone());

        let selected = store.selected_id() == Some(marker.id.as_str());
        let is_hovered = hovered.0.as_deref() == Some(marker.id.as_str());

        transform.translation = point.position;
        transform.rotation = point
            .normal
            .map(rotation_from_normal)
            .unwrap_or(Quat::IDENTITY);
        let scale = settings.marker_scale
            * if selected {
                marker_sizes::SELECTED_SCALE
            } else {
                1.0
            };
        transform.scale = Vec3::splat(scale);

        if *visibility != root_visibility {
            *visibility = root_visibility;
        }

        let wanted = assets.material_for(selected, is_hovered);
        if material.0 != wanted {
            material.0 = wanted;
        }
    }

    for (marker, mut visibility, mut material) in &mut arrows {
        let Some(point) = store.get(&marker.id) else {
            continue;
        };

        // Arrows only render for plane points with a captured normal
        let arrow_visibility = if point.kind == SnapPointKind::Plane && point.normal.is_some() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        if *visibility != arrow_visibility {
            *visibility = arrow_visibility;
        }

        let selected = store.selected_id() == Some(marker.id.as_str());
        let is_hovered = hovered.0.as_deref() == Some(marker.id.as_str());
        let wanted = assets.material_for(selected, is_hovered);
        if material.0 != wanted {
            material.0 = wanted;
        }
    }

    for point in store.iter() {
        if seen.contains(&point.id) {
            continue;
        }
        spawn_marker(
            &mut commands,
            &assets,
            &point.id,
            point.position,
            point.normal,
            settings.marker_scale,
            root_visibility,
        );
    }
}

fn spawn_marker(
    commands: &mut Commands,
    assets: &MarkerAssets,
    id: &str,
    position: Vec3,
    normal: Option<Vec3>,
    scale: f32,
    visibility: Visibility,
) {
    let rotation = normal.map(rotation_from_normal).unwrap_or(Quat::IDENTITY);

    commands
        .spawn((
            SnapMarker { id: id.to_string() },
            Name::new(format!("Snap Marker {id}")),
            Mesh3d(assets.sphere.clone()),
            MeshMaterial3d(assets.default_material.clone()),
            Transform::from_translation(position)
                .with_rotation(rotation)
                .with_scale(Vec3::splat(scale)),
            visibility,
        ))
        .with_children(|parent| {
            let stem_offset =
                marker_sizes::MARKER_RADIUS + marker_sizes::ARROW_STEM_LENGTH * 0.5;
            let tip_offset = marker_sizes::MARKER_RADIUS
                + marker_sizes::ARROW_STEM_LENGTH
                + marker_sizes::ARROW_TIP_LENGTH * 0.5;

            parent.spawn((
                SnapMarker { id: id.to_string() },
                NormalArrow,
                Mesh3d(assets.stem.clone()),
                MeshMaterial3d(assets.default_material.clone()),
                Transform::from_translation(Vec3::Y * stem_offset),
                Visibility::Hidden,
            ));
            parent.spawn((
                SnapMarker { id: id.to_string() },
                NormalArrow,
                Mesh3d(assets.tip.clone()),
                MeshMaterial3d(assets.default_material.clone()),
                Transform::from_translation(Vec3::Y * tip_offset),
                Visibility::Hidden,
            ));
        });
}
