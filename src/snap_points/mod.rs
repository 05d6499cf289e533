//! Snap point data model, store, and persistence

mod point;
mod serialization;
mod store;

pub use point::*;
pub use serialization::*;
pub use store::*;

use bevy::prelude::*;
use std::collections::{HashMap, HashSet};

use crate::picking::{ComponentRoot, normal_to_local, point_to_local};

pub struct SnapPointsPlugin;

impl Plugin for SnapPointsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SnapPointStore>()
            .add_message::<SaveSnapPointsEvent>()
            .add_message::<LoadSnapPointsEvent>()
            .add_systems(
                Update,
                (
                    handle_save_snap_points,
                    handle_load_snap_points,
                    refresh_local_frames,
                ),
            );
    }
}

/// Keep each tethered point's cached local frame in sync with its parent
/// component. Recomputes when the parent's global transform changes or when
/// the cache is missing (fresh point, or the parent was just reassigned).
fn refresh_local_frames(
    mut store: ResMut<SnapPointStore>,
    roots: Query<(&ComponentRoot, &GlobalTransform)>,
    moved: Query<&ComponentRoot, Changed<GlobalTransform>>,
) {
    if store.iter().all(|p| p.parent_id.is_none()) {
        return;
    }

    let moved_ids: HashSet<&str> = moved.iter().map(|root| root.id.as_str()).collect();
    let transforms: HashMap<&str, &GlobalTransform> = roots
        .iter()
        .map(|(root, transform)| (root.id.as_str(), transform))
        .collect();

    let mut updates: Vec<(String, Option<Vec3>, Option<Vec3>)> = Vec::new();
    for point in store.iter() {
        let Some(parent_id) = point.parent_id.as_deref() else {
            continue;
        };
        let Some(transform) = transforms.get(parent_id) else {
            // Parent left the scene, drop the stale cache
            if point.local_position.is_some() || point.local_normal.is_some() {
                updates.push((point.id.clone(), None, None));
            }
            continue;
        };

        if !moved_ids.contains(parent_id) && point.local_position.is_some() {
            continue;
        }

        let local_position = Some(point_to_local(transform, point.position));
        let local_normal = point.normal.map(|n| normal_to_local(transform, n));
        updates.push((point.id.clone(), local_position, local_normal));
    }

    for (id, local_position, local_normal) in updates {
        store.set_local_frame(&id, local_position, local_normal);
    }
}
