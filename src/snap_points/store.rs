//! Snap point store: ordered collection, deduplication, and selection

use bevy::prelude::*;
use thiserror::Error;

use super::point::{SnapPoint, SnapPointCandidate, SnapPointKind, generate_snap_id};
use crate::constants::placement::DEDUP_TOLERANCE;

/// Fallback display name for points added without one
const UNNAMED: &str = "Snap point";

/// Errors surfaced by [`SnapPointStore`]
#[derive(Debug, Error, PartialEq)]
pub enum SnapPointError {
    /// Another point already occupies (nearly) the same position
    #[error("a snap point already exists at ({x:.3}, {y:.3}, {z:.3})")]
    DuplicatePosition { x: f32, y: f32, z: f32 },
}

/// Field-wise patch applied by [`SnapPointStore::update`].
///
/// `None` leaves a field untouched. Position is deliberately absent: a snap
/// point's position is fixed at creation so the dedup invariant cannot be
/// bypassed after the fact.
#[derive(Debug, Default, Clone)]
pub struct SnapPointPatch {
    pub name: Option<String>,
    pub kind: Option<SnapPointKind>,
    pub normal: Option<Option<Vec3>>,
    pub parent_id: Option<Option<String>>,
}

/// Ordered snap point collection plus the active selection.
///
/// Insertion order is display order. All mutation goes through methods so
/// the dedup and selection invariants hold no matter which system is
/// writing.
#[derive(Resource, Default, Debug)]
pub struct SnapPointStore {
    points: Vec<SnapPoint>,
    selected: Option<String>,
}

impl SnapPointStore {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate points in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &SnapPoint> {
        self.points.iter()
    }

    pub fn get(&self, id: &str) -> Option<&SnapPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    /// The existing point whose position collides with `position`, if any.
    /// Collision means every axis delta is strictly inside the tolerance.
    pub fn duplicate_of(&self, position: Vec3) -> Option<&SnapPoint> {
        self.points.iter().find(|p| {
            (p.position.x - position.x).abs() < DEDUP_TOLERANCE
                && (p.position.y - position.y).abs() < DEDUP_TOLERANCE
                && (p.position.z - position.z).abs() < DEDUP_TOLERANCE
        })
    }

    /// Insert a candidate, assigning it a fresh id. Rejects candidates that
    /// collide with an existing position. Empty names fall back to a
    /// placeholder so every stored point stays displayable.
    pub fn add(&mut self, candidate: SnapPointCandidate) -> Result<&SnapPoint, SnapPointError> {
        if let Some(existing) = self.duplicate_of(candidate.position) {
            return Err(SnapPointError::DuplicatePosition {
                x: existing.position.x,
                y: existing.position.y,
                z: existing.position.z,
            });
        }

        let name = if candidate.name.trim().is_empty() {
            UNNAMED.to_string()
        } else {
            candidate.name
        };

        self.points.push(SnapPoint {
            id: generate_snap_id(),
            name,
            kind: candidate.kind,
            position: candidate.position,
            normal: candidate.normal,
            compatibility: candidate.compatibility,
            parent_id: candidate.parent_id,
            local_position: None,
            local_normal: None,
        });

        let index = self.points.len() - 1;
        Ok(&self.points[index])
    }

    /// Insert a batch, skipping duplicates instead of failing the batch.
    /// Each candidate is checked against the points accepted before it, so
    /// duplicates inside the batch itself are also skipped. Returns how many
    /// were accepted.
    pub fn add_many(
        &mut self,
        candidates: impl IntoIterator<Item = SnapPointCandidate>,
    ) -> usize {
        let mut accepted = 0;
        for candidate in candidates {
            if self.add(candidate).is_ok() {
                accepted += 1;
            }
        }
        accepted
    }

    /// Apply a patch to the point with the given id. Returns `false` (and
    /// changes nothing) when the id is unknown. Patching the parent clears
    /// the cached local frame; the ancestry refresh rebuilds it.
    pub fn update(&mut self, id: &str, patch: SnapPointPatch) -> bool {
        let Some(point) = self.points.iter_mut().find(|p| p.id == id) else {
            return false;
        };

        if let Some(name) = patch.name {
            if !name.trim().is_empty() {
                point.name = name;
            }
        }
        if let Some(kind) = patch.kind {
            point.kind = kind;
        }
        if let Some(normal) = patch.normal {
            point.normal = normal;
            point.local_normal = None;
        }
        if let Some(parent_id) = patch.parent_id {
            point.parent_id = parent_id;
            point.local_position = None;
            point.local_normal = None;
        }

        true
    }

    /// Overwrite the cached parent-local frame for a point. No-op for
    /// unknown ids. Used by the refresh system after a parent component
    /// moves; not part of the editing surface.
    pub fn set_local_frame(
        &mut self,
        id: &str,
        local_position: Option<Vec3>,
        local_normal: Option<Vec3>,
    ) {
        if let Some(point) = self.points.iter_mut().find(|p| p.id == id) {
            point.local_position = local_position;
            point.local_normal = local_normal;
        }
    }

    /// Remove a point by id, returning it. Clears the selection if the
    /// removed point was selected.
    pub fn remove(&mut self, id: &str) -> Option<SnapPoint> {
        let index = self.points.iter().position(|p| p.id == id)?;
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        Some(self.points.remove(index))
    }

    /// Add a compatibility tag to a point. Returns `true` if the tag was
    /// actually added (it was not already present and the id exists).
    pub fn add_compatibility(&mut self, id: &str, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() {
            return false;
        }
        let Some(point) = self.points.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        if point.compatibility.iter().any(|t| t == tag) {
            return false;
        }
        point.compatibility.push(tag.to_string());
        true
    }

    /// Remove a compatibility tag from a point. Returns `true` if the tag
    /// was present.
    pub fn remove_compatibility(&mut self, id: &str, tag: &str) -> bool {
        let Some(point) = self.points.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        let before = point.compatibility.len();
        point.compatibility.retain(|t| t != tag);
        point.compatibility.len() != before
    }

    /// Set or clear the selection. Selecting an unknown id is a no-op so a
    /// stale id from the UI can never leave the selection dangling.
    pub fn select(&mut self, id: Option<&str>) {
        match id {
            Some(id) => {
                if self.get(id).is_some() {
                    self.selected = Some(id.to_string());
                }
            }
            None => self.selected = None,
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected(&self) -> Option<&SnapPoint> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    /// Drop every point and the selection
    pub fn clear(&mut self) {
        self.points.clear();
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_origin_point() -> (SnapPointStore, String) {
        let mut store = SnapPointStore::default();
        let id = store
            .add(SnapPointCandidate::at("Origin", Vec3::ZERO))
            .map(|p| p.id.clone())
            .unwrap();
        (store, id)
    }

    #[test]
    fn add_assigns_id_and_keeps_order() {
        let mut store = SnapPointStore::default();
        store.add(SnapPointCandidate::at("A", Vec3::X)).unwrap();
        store.add(SnapPointCandidate::at("B", Vec3::Y)).unwrap();
        store.add(SnapPointCandidate::at("C", Vec3::Z)).unwrap();

        let names: Vec<&str> = store.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert!(store.iter().all(|p| !p.id.is_empty()));
    }

    #[test]
    fn add_rejects_position_within_tolerance_on_all_axes() {
        let (mut store, _) = store_with_origin_point();

        // Inside 0.001 on every axis: duplicate
        let near = SnapPointCandidate::at("Near", Vec3::new(0.0003, 0.0, 0.0));
        let err = store.add(near).unwrap_err();
        assert!(matches!(err, SnapPointError::DuplicatePosition { .. }));
        assert_eq!(store.len(), 1);

        // One axis outside the tolerance: distinct point
        let apart = SnapPointCandidate::at("Apart", Vec3::new(0.002, 0.0, 0.0));
        assert!(store.add(apart).is_ok());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn tolerance_requires_all_three_axes_simultaneously() {
        let (mut store, _) = store_with_origin_point();

        // Each axis delta individually tiny on some axis, but y is well
        // clear of the tolerance, so this is a new point
        let candidate = SnapPointCandidate::at("Off", Vec3::new(0.0005, 0.5, 0.0005));
        assert!(store.add(candidate).is_ok());
    }

    #[test]
    fn add_many_skips_duplicates_and_reports_accepted() {
        let mut store = SnapPointStore::default();
        let corners = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
        ];

        let accepted = store.add_many(
            corners
                .iter()
                .map(|&c| SnapPointCandidate::at("Corner", c)),
        );
        assert_eq!(accepted, 8, "all box corners are distinct");

        let stored: Vec<Vec3> = store.iter().map(|p| p.position).collect();
        assert_eq!(stored, corners.to_vec(), "insertion order is preserved");

        // Second import of the same batch is fully deduplicated
        let again = store.add_many(
            corners
                .iter()
                .map(|&c| SnapPointCandidate::at("Corner", c)),
        );
        assert_eq!(again, 0);
        assert_eq!(store.len(), 8);
    }

    #[test]
    fn add_many_dedups_within_the_batch_itself() {
        let mut store = SnapPointStore::default();
        let accepted = store.add_many(vec![
            SnapPointCandidate::at("A", Vec3::ZERO),
            SnapPointCandidate::at("B", Vec3::new(0.0002, 0.0, 0.0)),
            SnapPointCandidate::at("C", Vec3::X),
        ]);
        assert_eq!(accepted, 2, "B collides with A inside the same batch");
    }

    #[test]
    fn update_patches_fields_and_ignores_unknown_id() {
        let (mut store, id) = store_with_origin_point();

        let changed = store.update(
            &id,
            SnapPointPatch {
                name: Some("Rack mount".into()),
                kind: Some(SnapPointKind::Plane),
                normal: Some(Some(Vec3::Y)),
                ..Default::default()
            },
        );
        assert!(changed);

        let point = store.get(&id).unwrap();
        assert_eq!(point.name, "Rack mount");
        assert_eq!(point.kind, SnapPointKind::Plane);
        assert_eq!(point.normal, Some(Vec3::Y));

        assert!(!store.update("missing", SnapPointPatch::default()));
    }

    #[test]
    fn update_parent_clears_cached_local_frame() {
        let (mut store, id) = store_with_origin_point();
        store.set_local_frame(&id, Some(Vec3::X), Some(Vec3::Y));
        assert!(store.get(&id).unwrap().local_position.is_some());

        store.update(
            &id,
            SnapPointPatch {
                parent_id: Some(Some("fork".into())),
                ..Default::default()
            },
        );

        let point = store.get(&id).unwrap();
        assert_eq!(point.parent_id.as_deref(), Some("fork"));
        assert!(point.local_position.is_none());
        assert!(point.local_normal.is_none());
    }

    #[test]
    fn empty_name_falls_back_to_placeholder() {
        let mut store = SnapPointStore::default();
        let id = store
            .add(SnapPointCandidate::at("   ", Vec3::ZERO))
            .map(|p| p.id.clone())
            .unwrap();
        assert_eq!(store.get(&id).unwrap().name, "Snap point");
    }

    #[test]
    fn removing_selected_point_clears_selection() {
        let (mut store, id) = store_with_origin_point();
        store.select(Some(&id));
        assert_eq!(store.selected_id(), Some(id.as_str()));

        let removed = store.remove(&id);
        assert!(removed.is_some());
        assert_eq!(store.selected_id(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn removing_other_point_keeps_selection() {
        let (mut store, first) = store_with_origin_point();
        let second = store
            .add(SnapPointCandidate::at("Other", Vec3::X))
            .map(|p| p.id.clone())
            .unwrap();

        store.select(Some(&first));
        store.remove(&second);
        assert_eq!(store.selected_id(), Some(first.as_str()));
    }

    #[test]
    fn selecting_unknown_id_is_a_noop() {
        let (mut store, id) = store_with_origin_point();
        store.select(Some(&id));
        store.select(Some("does-not-exist"));
        assert_eq!(store.selected_id(), Some(id.as_str()));

        store.select(None);
        assert_eq!(store.selected_id(), None);
    }

    #[test]
    fn compatibility_tags_form_a_set() {
        let (mut store, id) = store_with_origin_point();

        assert!(store.add_compatibility(&id, "bottle-cage"));
        assert!(!store.add_compatibility(&id, "bottle-cage"), "tag already present");
        assert!(store.add_compatibility(&id, "pump"));
        assert_eq!(store.get(&id).unwrap().compatibility.len(), 2);

        assert!(store.remove_compatibility(&id, "bottle-cage"));
        assert!(!store.remove_compatibility(&id, "bottle-cage"));
        assert_eq!(
            store.get(&id).unwrap().compatibility,
            vec!["pump".to_string()]
        );
    }

    #[test]
    fn blank_compatibility_tag_is_rejected() {
        let (mut store, id) = store_with_origin_point();
        assert!(!store.add_compatibility(&id, "  "));
        assert!(store.get(&id).unwrap().compatibility.is_empty());
    }
}
