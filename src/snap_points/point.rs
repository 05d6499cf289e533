//! Snap point data model

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Whether a snap point is a bare location or an oriented surface attachment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapPointKind {
    /// Position only, orientation ignored by consumers
    #[default]
    Point,
    /// Position plus surface normal, rendered with a direction arrow
    Plane,
}

impl SnapPointKind {
    pub fn label(&self) -> &'static str {
        match self {
            SnapPointKind::Point => "Point",
            SnapPointKind::Plane => "Plane",
        }
    }
}

/// An annotated attachment location on or near the product model.
///
/// `position` and `normal` are world-space and fixed at creation time.
/// When the point is tethered to a component (`parent_id`), the store also
/// caches the parent-local frame so the point can follow that component if
/// it is repositioned later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapPoint {
    /// Unique identifier, assigned by the store
    pub id: String,
    /// Display name, always non-empty
    pub name: String,
    pub kind: SnapPointKind,
    /// World-space position, immutable after creation
    pub position: Vec3,
    /// World-space unit surface normal, if one was captured
    pub normal: Option<Vec3>,
    /// Deduplicated set of compatibility tags (e.g. accessory families
    /// that may attach here)
    #[serde(default)]
    pub compatibility: Vec<String>,
    /// Identifier of the component this point is tethered to, if any
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Cached position in the parent component's local frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_position: Option<Vec3>,
    /// Cached normal in the parent component's local frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_normal: Option<Vec3>,
}

impl SnapPoint {
    /// Rebuild a candidate carrying everything but the id and the cached
    /// local frame. Used when re-importing saved points through the store.
    pub fn to_candidate(&self) -> SnapPointCandidate {
        SnapPointCandidate {
            name: self.name.clone(),
            kind: self.kind,
            position: self.position,
            normal: self.normal,
            compatibility: self.compatibility.clone(),
            parent_id: self.parent_id.clone(),
        }
    }
}

/// A snap point awaiting insertion; the store assigns the id on accept
#[derive(Debug, Clone)]
pub struct SnapPointCandidate {
    pub name: String,
    pub kind: SnapPointKind,
    pub position: Vec3,
    pub normal: Option<Vec3>,
    pub compatibility: Vec<String>,
    pub parent_id: Option<String>,
}

impl SnapPointCandidate {
    /// Bare untethered point at a world position
    pub fn at(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            kind: SnapPointKind::Point,
            position,
            normal: None,
            compatibility: Vec::new(),
            parent_id: None,
        }
    }
}

/// Build a collision-resistant id from the wall clock plus a random suffix.
/// The suffix keeps ids unique across placements that land in the same
/// millisecond.
pub fn generate_snap_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("sp-{millis:x}-{:04x}", fastrand::u16(..))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_distinct() {
        let a = generate_snap_id();
        let b = generate_snap_id();
        assert!(a.starts_with("sp-"));
        assert_ne!(a, b, "ids from back-to-back calls must differ");
    }

    #[test]
    fn candidate_round_trips_point_fields() {
        let point = SnapPoint {
            id: "sp-1".into(),
            name: "Bottle mount".into(),
            kind: SnapPointKind::Plane,
            position: Vec3::new(1.0, 2.0, 3.0),
            normal: Some(Vec3::Y),
            compatibility: vec!["bottle-cage".into()],
            parent_id: Some("frame".into()),
            local_position: Some(Vec3::ZERO),
            local_normal: Some(Vec3::Y),
        };

        let candidate = point.to_candidate();
        assert_eq!(candidate.name, "Bottle mount");
        assert_eq!(candidate.kind, SnapPointKind::Plane);
        assert_eq!(candidate.parent_id.as_deref(), Some("frame"));
        assert_eq!(candidate.compatibility, vec!["bottle-cage".to_string()]);
    }
}
