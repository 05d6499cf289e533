//! Placement mode state machine and click debounce.
//!
//! The mode is a two-state Bevy `States` enum; the "currently processing a
//! click" sub-state lives in [`PlacementGuard`], whose flag and cooldown
//! timer have exactly one owner so overlapping clicks can never interleave.

use bevy::prelude::*;
use std::time::Duration;

use crate::constants::placement::CLICK_COOLDOWN_SECS;

/// Whether scene clicks currently create snap points
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, States)]
pub enum PlacementMode {
    /// Clicks select markers or do nothing
    #[default]
    Inactive,
    /// Clicks place snap points on the model
    Active,
}

/// Single owner of the click debounce.
///
/// Lifecycle per click: [`begin_click`](Self::begin_click) claims the guard
/// before any ray work. A miss releases it immediately via
/// [`finish_without_hit`](Self::finish_without_hit); a processed hit holds
/// it through a cooldown ([`finish_with_hit`](Self::finish_with_hit)) so
/// trailing input events from the same physical click are absorbed.
#[derive(Resource, Debug)]
pub struct PlacementGuard {
    processing: bool,
    cooldown: Timer,
}

impl Default for PlacementGuard {
    fn default() -> Self {
        let mut cooldown = Timer::from_seconds(CLICK_COOLDOWN_SECS, TimerMode::Once);
        cooldown.pause();
        Self {
            processing: false,
            cooldown,
        }
    }
}

impl PlacementGuard {
    /// Claim the guard for a new click. Returns `false` when a previous
    /// click is still processing, in which case the caller must drop the
    /// click entirely.
    pub fn begin_click(&mut self) -> bool {
        if self.processing {
            return false;
        }
        self.processing = true;
        true
    }

    /// The ray missed: accept clicks again immediately
    pub fn finish_without_hit(&mut self) {
        self.processing = false;
    }

    /// A hit was processed: hold the guard until the cooldown elapses
    pub fn finish_with_hit(&mut self) {
        self.cooldown.reset();
        self.cooldown.unpause();
    }

    /// Advance the cooldown, releasing the guard when it completes
    pub fn tick(&mut self, delta: Duration) {
        if self.cooldown.is_paused() {
            return;
        }
        self.cooldown.tick(delta);
        if self.cooldown.is_finished() {
            self.cooldown.pause();
            self.processing = false;
        }
    }

    /// Drop any in-flight click and pending cooldown. Used when leaving
    /// placement mode so a stale cooldown can never leak into the next
    /// activation.
    pub fn cancel(&mut self) {
        self.processing = false;
        self.cooldown.reset();
        self.cooldown.pause();
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }
}
