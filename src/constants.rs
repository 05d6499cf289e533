//! Centralized constants for the snap point studio
//!
//! This module contains shared tuning values like tolerances, marker sizes,
//! and colors to ensure consistency across the codebase.

use bevy::prelude::*;

/// Placement and deduplication tuning
pub mod placement {
    /// Per-axis tolerance for treating two snap point positions as duplicates.
    /// Two points collide only when all three axis deltas are inside this
    /// value at the same time.
    pub const DEDUP_TOLERANCE: f32 = 0.001;

    /// Distance a placed point is nudged along the surface normal so its
    /// marker does not z-fight with the surface it sits on
    pub const SURFACE_OFFSET: f32 = 0.005;

    /// Cooldown after an accepted placement click before the next click is
    /// processed. Absorbs trailing input events from the same physical click.
    pub const CLICK_COOLDOWN_SECS: f32 = 0.3;
}

/// Marker mesh dimensions in world units, before user scaling
pub mod marker_sizes {
    /// Radius of the marker sphere
    pub const MARKER_RADIUS: f32 = 0.03;
    /// Scale multiplier applied to the selected marker
    pub const SELECTED_SCALE: f32 = 1.4;
    /// Pointer-to-center distance (as a multiple of the marker radius)
    /// within which a marker counts as hovered
    pub const HOVER_RADIUS_FACTOR: f32 = 1.5;

    /// Length of the normal arrow stem
    pub const ARROW_STEM_LENGTH: f32 = 0.12;
    /// Radius of the normal arrow stem
    pub const ARROW_STEM_RADIUS: f32 = 0.006;
    /// Length of the normal arrow tip cone
    pub const ARROW_TIP_LENGTH: f32 = 0.04;
    /// Radius of the normal arrow tip cone
    pub const ARROW_TIP_RADIUS: f32 = 0.014;

    /// Side length of the invisible click catcher plane
    pub const CATCHER_PLANE_SIZE: f32 = 200.0;
}

/// Fixed marker palette. Three states, three colors.
pub mod marker_colors {
    use super::*;

    /// Idle marker
    pub const DEFAULT: Color = Color::srgb(0.25, 0.6, 1.0);
    /// Marker under the pointer
    pub const HOVERED: Color = Color::srgb(1.0, 0.85, 0.2);
    /// Marker of the selected snap point
    pub const SELECTED: Color = Color::srgb(1.0, 0.5, 0.1);
}

/// UI timing
pub mod ui {
    /// How long a status notice stays on screen
    pub const NOTICE_SECS: f32 = 2.5;
}
