//! # Bevy Snap Point Editor
//!
//! A studio plugin for annotating 3D product models with snap points:
//! typed, deduplicated attachment locations that accessories can later
//! snap to.
//!
//! ## Quick Start
//!
//! Add the studio to your Bevy app:
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_snap_point_editor::SnapPointEditorPlugin;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(SnapPointEditorPlugin)
//!         .run();
//! }
//! ```
//!
//! ## Tagging Product Components
//!
//! Tag the root of each identifiable assembly with `ComponentRoot` so snap
//! points placed on its meshes tether to it:
//!
//! ```ignore
//! commands.spawn((
//!     Name::new("Handlebar"),
//!     ComponentRoot::new("handlebar"),
//!     Transform::default(),
//!     Visibility::default(),
//! ));
//! ```
//!
//! ## Workflow
//!
//! - **P**: toggle placement mode, then click the model to place points
//! - **Esc**: leave placement mode
//! - **M**: toggle marker visibility
//! - Click a marker outside placement mode to select it; edit name, type,
//!   and compatibility tags in the side panel
//! - Points landing within 0.001 units of an existing point on every axis
//!   are rejected as duplicates

pub mod constants;
pub mod markers;
pub mod picking;
pub mod placement;
pub mod snap_points;
pub mod studio;
pub mod ui;
pub mod utils;

// Re-export the main plugin
pub use studio::SnapPointEditorPlugin;

// Re-export scene tagging and picking types
pub use picking::{ComponentAncestors, ComponentRoot, SceneHit};

// Re-export the snap point data model
pub use snap_points::{
    SnapPoint, SnapPointCandidate, SnapPointError, SnapPointKind, SnapPointPatch, SnapPointStore,
};

// Re-export mode and camera types
pub use placement::PlacementMode;
pub use studio::{StudioCamera, StudioState};

// Re-export marker types
pub use markers::{HoveredSnapPoint, SnapMarker};

// Re-export serialization events
pub use snap_points::{LoadSnapPointsEvent, SaveSnapPointsEvent};
