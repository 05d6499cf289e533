//! Transient status notice banner

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};

use crate::studio::{NoticeKind, StatusNotices, StudioState};

const INFO_TEXT: egui::Color32 = egui::Color32::from_rgb(220, 220, 220);
const WARNING_TEXT: egui::Color32 = egui::Color32::from_rgb(255, 200, 90);

pub struct NoticesPlugin;

impl Plugin for NoticesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(EguiPrimaryContextPass, draw_notice_banner);
    }
}

/// Draw the latest notice centered near the bottom of the viewport
fn draw_notice_banner(
    mut contexts: EguiContexts,
    notices: Res<StatusNotices>,
    studio_state: Res<StudioState>,
) -> Result {
    if !studio_state.ui_enabled {
        return Ok(());
    }
    let Some(notice) = notices.current() else {
        return Ok(());
    };

    let ctx = contexts.ctx_mut()?;

    egui::Window::new("status_notice")
        .title_bar(false)
        .resizable(false)
        .interactable(false)
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -36.0])
        .show(ctx, |ui| {
            let color = match notice.kind {
                NoticeKind::Info => INFO_TEXT,
                NoticeKind::Warning => WARNING_TEXT,
            };
            ui.colored_label(color, &notice.text);
        });

    Ok(())
}
