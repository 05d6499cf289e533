//! Click handling for placement mode: ray cast, candidate construction,
//! and handoff to the store

use bevy::picking::mesh_picking::ray_cast::MeshRayCast;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use super::mode::{PlacementGuard, PlacementMode};
use crate::constants::marker_sizes::CATCHER_PLANE_SIZE;
use crate::markers::SnapMarker;
use crate::picking::{
    ComponentAncestors, ComponentRoot, SceneHit, apply_surface_offset, pick_scene, pointer_ray,
};
use crate::snap_points::{SnapPointCandidate, SnapPointKind, SnapPointStore};
use crate::studio::{StatusNotices, StudioCamera};
use crate::utils::{pointer_over_ui, should_process_input};

/// Invisible plane spanning the scene while placement mode is active.
/// It guarantees a mesh exists under the pointer for input capture, and is
/// excluded from picking so it never absorbs a placement itself.
#[derive(Component)]
pub struct ClickCatcher;

pub(super) fn spawn_click_catcher(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        ClickCatcher,
        Name::new("Placement Click Catcher"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(CATCHER_PLANE_SIZE, CATCHER_PLANE_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(0.0, 0.0, 0.0, 0.0),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        })),
        Transform::default(),
        Visibility::Hidden,
    ));
}

pub(super) fn show_click_catcher(
    mut catchers: Query<&mut Visibility, With<ClickCatcher>>,
) {
    for mut visibility in &mut catchers {
        *visibility = Visibility::Visible;
    }
    info!("Placement mode: ON");
}

pub(super) fn hide_click_catcher(
    mut catchers: Query<&mut Visibility, With<ClickCatcher>>,
) {
    for mut visibility in &mut catchers {
        *visibility = Visibility::Hidden;
    }
    info!("Placement mode: OFF");
}

/// Leaving placement mode drops any in-flight click and the selection
pub(super) fn reset_placement_state(
    mut guard: ResMut<PlacementGuard>,
    mut store: ResMut<SnapPointStore>,
) {
    guard.cancel();
    store.select(None);
}

/// Advance the click cooldown
pub(super) fn tick_placement_cooldown(time: Res<Time>, mut guard: ResMut<PlacementGuard>) {
    if !guard.is_processing() {
        return;
    }
    guard.tick(time.delta());
}

/// Toggle placement with P; Escape always backs out
pub(super) fn handle_placement_hotkeys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mode: Res<State<PlacementMode>>,
    mut next_mode: ResMut<NextState<PlacementMode>>,
    mut contexts: EguiContexts,
) {
    if !should_process_input(&mut contexts) {
        return;
    }

    if keyboard.just_pressed(KeyCode::KeyP) {
        next_mode.set(match mode.get() {
            PlacementMode::Inactive => PlacementMode::Active,
            PlacementMode::Active => PlacementMode::Inactive,
        });
    }

    if keyboard.just_pressed(KeyCode::Escape) && *mode.get() == PlacementMode::Active {
        next_mode.set(PlacementMode::Inactive);
    }
}

/// Handle a placement click: claim the guard, cast the pointer ray, and
/// hand the resulting candidate to the store. Runs only in
/// [`PlacementMode::Active`].
#[allow(clippy::too_many_arguments)]
pub(super) fn handle_placement_click(
    mouse_button: Res<ButtonInput<MouseButton>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<StudioCamera>>,
    mut ray_cast: MeshRayCast,
    excluded: Query<(), Or<(With<SnapMarker>, With<ClickCatcher>)>>,
    ancestors: Res<ComponentAncestors>,
    roots: Query<&ComponentRoot>,
    mut store: ResMut<SnapPointStore>,
    mut guard: ResMut<PlacementGuard>,
    mut notices: ResMut<StatusNotices>,
    mut contexts: EguiContexts,
) {
    if !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }

    // Clicks on the panel are UI interactions, not placements
    if pointer_over_ui(&mut contexts) {
        return;
    }

    // Claim the guard before any ray work; a still-held guard means this
    // click is a duplicate of one already in flight
    if !guard.begin_click() {
        return;
    }

    let Ok(window) = window_query.single() else {
        guard.finish_without_hit();
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        guard.finish_without_hit();
        return;
    };
    let Some(ray) = pointer_ray(window, camera, camera_transform) else {
        guard.finish_without_hit();
        return;
    };

    // Markers and the catcher are input-capture/visualization helpers, not
    // placement targets
    let Some(hit) = pick_scene(&mut ray_cast, ray, |entity| !excluded.contains(entity)) else {
        // Missing the model is not an error; stay armed for the next click
        guard.finish_without_hit();
        return;
    };

    let parent_id = ancestors
        .nearest_root(hit.entity)
        .and_then(|root| roots.get(root).ok())
        .map(|root| root.id.clone());

    let candidate = candidate_from_hit(&hit, parent_id, store.len());
    let position = candidate.position;
    let added = store
        .add(candidate)
        .map(|point| (point.id.clone(), point.name.clone()));
    match added {
        Ok((id, name)) => {
            info!("Placed snap point '{}' at {:.3?}", name, position);
            // Select the fresh point so the panel opens it for editing
            store.select(Some(&id));
            notices.info(format!("Placed {name}"));
        }
        Err(err) => {
            warn!("Placement rejected: {}", err);
            notices.warn(err.to_string());
        }
    }

    // Either way the click processed a hit, so the cooldown applies
    guard.finish_with_hit();
}

/// Build a candidate snap point from a scene hit. Hits with a usable
/// surface normal become plane points nudged slightly off the surface;
/// degenerate normals fall back to bare points at the exact hit position.
pub(super) fn candidate_from_hit(
    hit: &SceneHit,
    parent_id: Option<String>,
    existing_count: usize,
) -> SnapPointCandidate {
    SnapPointCandidate {
        name: format!("Snap point {}", existing_count + 1),
        kind: if hit.normal.is_some() {
            SnapPointKind::Plane
        } else {
            SnapPointKind::Point
        },
        position: apply_surface_offset(hit.point, hit.normal),
        normal: hit.normal,
        compatibility: Vec::new(),
        parent_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_with_normal_becomes_offset_plane_point() {
        let hit = SceneHit {
            entity: Entity::PLACEHOLDER,
            point: Vec3::new(1.0, 0.0, -2.0),
            normal: Some(Vec3::Y),
            distance: 5.0,
        };

        let candidate = candidate_from_hit(&hit, None, 0);
        assert_eq!(candidate.kind, SnapPointKind::Plane);
        assert!(
            candidate.position.abs_diff_eq(Vec3::new(1.0, 0.005, -2.0), 1e-6),
            "position must sit 0.005 along the normal, got {:?}",
            candidate.position
        );
        assert_eq!(candidate.normal, Some(Vec3::Y));
        assert_eq!(candidate.parent_id, None);
        assert_eq!(candidate.name, "Snap point 1");
    }

    #[test]
    fn hit_without_normal_becomes_bare_point_at_hit() {
        let hit = SceneHit {
            entity: Entity::PLACEHOLDER,
            point: Vec3::new(0.5, 1.5, 0.0),
            normal: None,
            distance: 2.0,
        };

        let candidate = candidate_from_hit(&hit, Some("frame".into()), 3);
        assert_eq!(candidate.kind, SnapPointKind::Point);
        assert_eq!(candidate.position, Vec3::new(0.5, 1.5, 0.0));
        assert_eq!(candidate.parent_id.as_deref(), Some("frame"));
        assert_eq!(candidate.name, "Snap point 4");
    }

    #[test]
    fn placement_scenario_end_to_end_through_store() {
        // Click on top of a surface, then a near-identical second hit:
        // first is accepted, second is rejected by the dedup tolerance
        let mut store = SnapPointStore::default();

        let first = SceneHit {
            entity: Entity::PLACEHOLDER,
            point: Vec3::new(1.0, 0.0, -2.0),
            normal: Some(Vec3::Y),
            distance: 4.0,
        };
        let placed = store
            .add(candidate_from_hit(&first, None, store.len()))
            .map(|p| p.id.clone());
        assert!(placed.is_ok());

        let nearly_same = SceneHit {
            entity: Entity::PLACEHOLDER,
            point: Vec3::new(1.0003, 0.0, -2.0),
            normal: Some(Vec3::Y),
            distance: 4.0,
        };
        let rejected = store.add(candidate_from_hit(&nearly_same, None, store.len()));
        assert!(rejected.is_err(), "second hit is inside the dedup tolerance");
        assert_eq!(store.len(), 1);
    }
}
