//! Studio-wide state, marker visibility toggling, and status notices

use bevy::prelude::*;
use std::time::Duration;

use crate::constants::ui::NOTICE_SECS;

/// Studio-wide state resource
#[derive(Debug, Resource)]
pub struct StudioState {
    /// Whether the studio UI is drawn
    pub ui_enabled: bool,
    /// Whether snap point markers are rendered
    pub markers_visible: bool,
}

impl Default for StudioState {
    fn default() -> Self {
        Self {
            ui_enabled: true,
            markers_visible: true,
        }
    }
}

/// Event to toggle snap point marker visibility (M key or panel checkbox)
#[derive(Message)]
pub struct ToggleMarkersEvent;

/// Severity of a status notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
}

/// A transient user-facing message shown near the bottom of the viewport
#[derive(Debug)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    ttl: Timer,
}

/// Holds the latest status notice. A new notice replaces the previous one;
/// notices expire on their own after a short time.
#[derive(Resource, Default, Debug)]
pub struct StatusNotices {
    current: Option<Notice>,
}

impl StatusNotices {
    pub fn info(&mut self, text: impl Into<String>) {
        self.push(NoticeKind::Info, text.into());
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.push(NoticeKind::Warning, text.into());
    }

    fn push(&mut self, kind: NoticeKind, text: String) {
        self.current = Some(Notice {
            kind,
            text,
            ttl: Timer::from_seconds(NOTICE_SECS, TimerMode::Once),
        });
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    /// Advance the expiry timer, dropping the notice once it elapses
    pub fn tick(&mut self, delta: Duration) {
        if let Some(notice) = &mut self.current {
            notice.ttl.tick(delta);
            if notice.ttl.is_finished() {
                self.current = None;
            }
        }
    }
}

pub struct StudioStatePlugin;

impl Plugin for StudioStatePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StudioState>()
            .init_resource::<StatusNotices>()
            .add_message::<ToggleMarkersEvent>()
            .add_systems(Update, (handle_toggle_markers, expire_notices));
    }
}

/// Handle toggling marker visibility
fn handle_toggle_markers(
    mut events: MessageReader<ToggleMarkersEvent>,
    mut studio_state: ResMut<StudioState>,
) {
    for _ in events.read() {
        studio_state.markers_visible = !studio_state.markers_visible;
        info!(
            "Snap point markers: {}",
            if studio_state.markers_visible {
                "VISIBLE"
            } else {
                "HIDDEN"
            }
        );
    }
}

fn expire_notices(time: Res<Time>, mut notices: ResMut<StatusNotices>) {
    if notices.current().is_none() {
        return;
    }
    notices.tick(time.delta());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_notice_replaces_and_expires() {
        let mut notices = StatusNotices::default();
        notices.info("first");
        notices.warn("second");

        let current = notices.current().unwrap();
        assert_eq!(current.kind, NoticeKind::Warning);
        assert_eq!(current.text, "second");

        notices.tick(Duration::from_secs_f32(NOTICE_SECS + 0.1));
        assert!(notices.current().is_none());
    }
}
