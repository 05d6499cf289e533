//! Saving and loading snap point sets as RON files

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

use super::point::SnapPoint;
use super::store::SnapPointStore;
use crate::studio::StatusNotices;

/// Current on-disk format version
pub const SNAP_FORMAT_VERSION: u32 = 1;

/// On-disk representation of a snap point set
#[derive(Debug, Serialize, Deserialize)]
pub struct SnapPointFile {
    pub version: u32,
    pub points: Vec<SnapPoint>,
}

impl SnapPointFile {
    pub fn from_store(store: &SnapPointStore) -> Self {
        Self {
            version: SNAP_FORMAT_VERSION,
            points: store.iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SnapFileError {
    #[error("failed to parse snap point file: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("unsupported snap point file version {found} (this build reads up to {SNAP_FORMAT_VERSION})")]
    UnsupportedVersion { found: u32 },
}

/// Parse and version-check serialized snap point data
pub fn parse_snap_file(content: &str) -> Result<SnapPointFile, SnapFileError> {
    let file: SnapPointFile = ron::from_str(content)?;
    if file.version > SNAP_FORMAT_VERSION {
        return Err(SnapFileError::UnsupportedVersion {
            found: file.version,
        });
    }
    Ok(file)
}

/// Message to write the current snap point set to a RON file
#[derive(Message)]
pub struct SaveSnapPointsEvent {
    pub path: String,
}

/// Message to import snap points from a RON file. Imported points go
/// through the store's normal dedup path, so loading the same file twice
/// does not double up points.
#[derive(Message)]
pub struct LoadSnapPointsEvent {
    pub path: String,
}

pub(super) fn handle_save_snap_points(
    mut events: MessageReader<SaveSnapPointsEvent>,
    store: Res<SnapPointStore>,
    mut notices: ResMut<StatusNotices>,
) {
    for event in events.read() {
        let file = SnapPointFile::from_store(&store);
        let content = match ron::ser::to_string_pretty(&file, ron::ser::PrettyConfig::default()) {
            Ok(content) => content,
            Err(e) => {
                error!("Failed to serialize snap points: {}", e);
                notices.warn("Failed to serialize snap points");
                continue;
            }
        };

        match fs::write(&event.path, content) {
            Ok(()) => {
                info!("Saved {} snap points to {}", file.points.len(), event.path);
                notices.info(format!(
                    "Saved {} snap points to {}",
                    file.points.len(),
                    event.path
                ));
            }
            Err(e) => {
                error!("Failed to write {}: {}", event.path, e);
                notices.warn(format!("Failed to write {}", event.path));
            }
        }
    }
}

pub(super) fn handle_load_snap_points(
    mut events: MessageReader<LoadSnapPointsEvent>,
    mut store: ResMut<SnapPointStore>,
    mut notices: ResMut<StatusNotices>,
) {
    for event in events.read() {
        let content = match fs::read_to_string(&event.path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read {}: {}", event.path, e);
                notices.warn(format!("Failed to read {}", event.path));
                continue;
            }
        };

        let file = match parse_snap_file(&content) {
            Ok(file) => file,
            Err(e) => {
                warn!("Failed to load {}: {}", event.path, e);
                notices.warn(e.to_string());
                continue;
            }
        };

        let total = file.points.len();
        let accepted = store.add_many(file.points.iter().map(|p| p.to_candidate()));
        let skipped = total - accepted;

        info!(
            "Loaded {} snap points from {} ({} skipped as duplicates)",
            accepted, event.path, skipped
        );
        if skipped > 0 {
            notices.info(format!(
                "Loaded {accepted} snap points ({skipped} duplicates skipped)"
            ));
        } else {
            notices.info(format!("Loaded {accepted} snap points"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snap_points::{SnapPointCandidate, SnapPointKind};

    fn sample_store() -> SnapPointStore {
        let mut store = SnapPointStore::default();
        store
            .add(SnapPointCandidate {
                name: "Rack mount".into(),
                kind: SnapPointKind::Plane,
                position: Vec3::new(0.1, 0.9, -0.4),
                normal: Some(Vec3::Y),
                compatibility: vec!["rack".into(), "fender".into()],
                parent_id: Some("seatpost".into()),
            })
            .unwrap();
        store
            .add(SnapPointCandidate::at("Free point", Vec3::new(2.0, 0.0, 1.0)))
            .unwrap();
        store
    }

    #[test]
    fn snap_file_round_trips_through_ron() {
        let store = sample_store();
        let file = SnapPointFile::from_store(&store);
        let text =
            ron::ser::to_string_pretty(&file, ron::ser::PrettyConfig::default()).unwrap();

        let parsed = parse_snap_file(&text).unwrap();
        assert_eq!(parsed.version, SNAP_FORMAT_VERSION);
        assert_eq!(parsed.points.len(), 2);
        assert_eq!(parsed.points[0].name, "Rack mount");
        assert_eq!(parsed.points[0].kind, SnapPointKind::Plane);
        assert_eq!(parsed.points[0].parent_id.as_deref(), Some("seatpost"));
        assert_eq!(parsed.points[0].compatibility.len(), 2);
    }

    #[test]
    fn reimport_through_store_is_idempotent() {
        let store = sample_store();
        let file = SnapPointFile::from_store(&store);
        let text =
            ron::ser::to_string_pretty(&file, ron::ser::PrettyConfig::default()).unwrap();
        let parsed = parse_snap_file(&text).unwrap();

        let mut fresh = SnapPointStore::default();
        let first = fresh.add_many(parsed.points.iter().map(|p| p.to_candidate()));
        assert_eq!(first, 2);

        // Loading the same file again adds nothing
        let second = fresh.add_many(parsed.points.iter().map(|p| p.to_candidate()));
        assert_eq!(second, 0);
        assert_eq!(fresh.len(), 2);
    }

    #[test]
    fn future_version_is_rejected() {
        let text = "(version: 99, points: [])";
        let err = parse_snap_file(text).unwrap_err();
        assert!(matches!(
            err,
            SnapFileError::UnsupportedVersion { found: 99 }
        ));
    }

    #[test]
    fn malformed_content_is_a_parse_error() {
        let err = parse_snap_file("not ron at all {{{").unwrap_err();
        assert!(matches!(err, SnapFileError::Parse(_)));
    }
}
