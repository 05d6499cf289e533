//! Side panel: snap point list, selected point editor, manual entry, and
//! file operations

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};

use super::settings::ViewerSettings;
use crate::markers::HoveredSnapPoint;
use crate::placement::PlacementMode;
use crate::snap_points::{
    LoadSnapPointsEvent, SaveSnapPointsEvent, SnapPoint, SnapPointCandidate, SnapPointKind,
    SnapPointPatch, SnapPointStore,
};
use crate::studio::{StatusNotices, StudioState};

/// Text color used for the hovered marker's list row
const HOVERED_ROW: egui::Color32 = egui::Color32::from_rgb(255, 217, 51);
/// Inline error color for the manual entry form
const FORM_ERROR: egui::Color32 = egui::Color32::from_rgb(255, 120, 100);

/// Edit-field state owned by the panel between frames
#[derive(Resource, Debug)]
pub struct PanelState {
    pub manual_name: String,
    pub manual_x: String,
    pub manual_y: String,
    pub manual_z: String,
    /// Inline validation error under the manual form
    pub manual_error: Option<String>,
    /// Pending compatibility tag text
    pub tag_input: String,
    /// Target path for save/load
    pub file_path: String,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            manual_name: String::new(),
            manual_x: String::new(),
            manual_y: String::new(),
            manual_z: String::new(),
            manual_error: None,
            tag_input: String::new(),
            file_path: "snap_points.ron".to_string(),
        }
    }
}

pub struct PanelPlugin;

impl Plugin for PanelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PanelState>()
            .add_systems(EguiPrimaryContextPass, draw_side_panel);
    }
}

/// Draw the snap point panel
#[allow(clippy::too_many_arguments)]
fn draw_side_panel(
    mut contexts: EguiContexts,
    mut store: ResMut<SnapPointStore>,
    mode: Res<State<PlacementMode>>,
    mut next_mode: ResMut<NextState<PlacementMode>>,
    mut studio_state: ResMut<StudioState>,
    mut settings: ResMut<ViewerSettings>,
    mut panel: ResMut<PanelState>,
    mut notices: ResMut<StatusNotices>,
    hovered: Res<HoveredSnapPoint>,
    mut save_events: MessageWriter<SaveSnapPointsEvent>,
    mut load_events: MessageWriter<LoadSnapPointsEvent>,
) -> Result {
    if !studio_state.ui_enabled {
        return Ok(());
    }

    let ctx = contexts.ctx_mut()?;

    egui::SidePanel::right("snap_point_panel")
        .default_width(300.0)
        .show(ctx, |ui| {
            ui.heading("Snap Points");
            ui.separator();

            draw_placement_controls(ui, &mode, &mut next_mode);
            ui.checkbox(&mut studio_state.markers_visible, "Show markers (M)");
            ui.separator();

            draw_point_list(ui, &mut store, &hovered, &mut notices);

            if let Some(point) = store.selected().cloned() {
                ui.separator();
                draw_selected_editor(ui, &point, &mut store, &mut panel);
            }

            ui.separator();
            draw_manual_entry(ui, &mut store, &mut panel, &mut notices);
            draw_file_section(ui, &mut panel, &mut save_events, &mut load_events);
            draw_view_settings(ui, &mut settings);

            ui.separator();
            ui.label(
                egui::RichText::new(format!("{} snap points", store.len()))
                    .weak()
                    .small(),
            );
        });

    Ok(())
}

fn draw_placement_controls(
    ui: &mut egui::Ui,
    mode: &State<PlacementMode>,
    next_mode: &mut NextState<PlacementMode>,
) {
    match mode.get() {
        PlacementMode::Inactive => {
            if ui.button("Place snap points (P)").clicked() {
                next_mode.set(PlacementMode::Active);
            }
        }
        PlacementMode::Active => {
            ui.label(
                egui::RichText::new("Click the model to place a point").italics(),
            );
            if ui.button("Done placing (Esc)").clicked() {
                next_mode.set(PlacementMode::Inactive);
            }
        }
    }
}

fn draw_point_list(
    ui: &mut egui::Ui,
    store: &mut SnapPointStore,
    hovered: &HoveredSnapPoint,
    notices: &mut StatusNotices,
) {
    if store.is_empty() {
        ui.label(
            egui::RichText::new("No snap points yet. Press P and click the model.").weak(),
        );
        return;
    }

    struct Row {
        id: String,
        name: String,
        kind: SnapPointKind,
    }

    let rows: Vec<Row> = store
        .iter()
        .map(|p| Row {
            id: p.id.clone(),
            name: p.name.clone(),
            kind: p.kind,
        })
        .collect();
    let selected_id = store.selected_id().map(str::to_owned);

    let mut clicked: Option<String> = None;
    let mut deleted: Option<String> = None;

    egui::ScrollArea::vertical()
        .max_height(220.0)
        .show(ui, |ui| {
            for row in &rows {
                ui.horizontal(|ui| {
                    let is_selected = selected_id.as_deref() == Some(row.id.as_str());
                    let mut label = egui::RichText::new(&row.name);
                    if hovered.0.as_deref() == Some(row.id.as_str()) {
                        label = label.color(HOVERED_ROW);
                    }
                    if ui.selectable_label(is_selected, label).clicked() {
                        clicked = Some(row.id.clone());
                    }
                    ui.label(egui::RichText::new(row.kind.label()).weak().small());

                    ui.with_layout(
                        egui::Layout::right_to_left(egui::Align::Center),
                        |ui| {
                            if ui.small_button("x").clicked() {
                                deleted = Some(row.id.clone());
                            }
                        },
                    );
                });
            }
        });

    if let Some(id) = clicked {
        if selected_id.as_deref() == Some(id.as_str()) {
            store.select(None);
        } else {
            store.select(Some(&id));
        }
    }
    if let Some(id) = deleted {
        if let Some(removed) = store.remove(&id) {
            info!("Deleted snap point '{}'", removed.name);
            notices.info(format!("Deleted {}", removed.name));
        }
    }
}

fn draw_selected_editor(
    ui: &mut egui::Ui,
    point: &SnapPoint,
    store: &mut SnapPointStore,
    panel: &mut PanelState,
) {
    ui.label(egui::RichText::new("Selected").strong());

    // Name
    ui.horizontal(|ui| {
        ui.label("Name:");
        let mut name = point.name.clone();
        if ui.text_edit_singleline(&mut name).changed() {
            store.update(
                &point.id,
                SnapPointPatch {
                    name: Some(name),
                    ..Default::default()
                },
            );
        }
    });

    // Kind
    ui.horizontal(|ui| {
        ui.label("Type:");
        egui::ComboBox::from_id_salt("snap_point_kind")
            .selected_text(point.kind.label())
            .show_ui(ui, |ui| {
                for kind in [SnapPointKind::Point, SnapPointKind::Plane] {
                    if ui.selectable_label(point.kind == kind, kind.label()).clicked() {
                        store.update(
                            &point.id,
                            SnapPointPatch {
                                kind: Some(kind),
                                ..Default::default()
                            },
                        );
                    }
                }
            });
    });

    // Read-only geometry
    ui.label(
        egui::RichText::new(format!(
            "Position: ({:.3}, {:.3}, {:.3})",
            point.position.x, point.position.y, point.position.z
        ))
        .monospace(),
    );
    if let Some(normal) = point.normal {
        ui.label(
            egui::RichText::new(format!(
                "Normal: ({:.3}, {:.3}, {:.3})",
                normal.x, normal.y, normal.z
            ))
            .monospace(),
        );
    }

    // Parent tether
    match &point.parent_id {
        Some(parent_id) => {
            ui.horizontal(|ui| {
                ui.label(format!("Parent: {parent_id}"));
                if ui.small_button("Untether").clicked() {
                    store.update(
                        &point.id,
                        SnapPointPatch {
                            parent_id: Some(None),
                            ..Default::default()
                        },
                    );
                }
            });
            if let Some(local) = point.local_position {
                ui.label(
                    egui::RichText::new(format!(
                        "Local: ({:.3}, {:.3}, {:.3})",
                        local.x, local.y, local.z
                    ))
                    .monospace()
                    .weak(),
                );
            }
        }
        None => {
            ui.label(egui::RichText::new("Parent: none").weak());
        }
    }

    // Compatibility tags
    ui.label("Compatibility:");
    ui.horizontal_wrapped(|ui| {
        for tag in &point.compatibility {
            if ui.small_button(format!("{tag} x")).clicked() {
                store.remove_compatibility(&point.id, tag);
            }
        }
    });
    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut panel.tag_input)
                .hint_text("tag")
                .desired_width(120.0),
        );
        if ui.button("Add tag").clicked() {
            let tag = panel.tag_input.trim().to_string();
            if !tag.is_empty() {
                // Re-adding an existing tag is a silent no-op
                store.add_compatibility(&point.id, &tag);
                panel.tag_input.clear();
            }
        }
    });
}

fn draw_manual_entry(
    ui: &mut egui::Ui,
    store: &mut SnapPointStore,
    panel: &mut PanelState,
    notices: &mut StatusNotices,
) {
    ui.collapsing("Add by coordinates", |ui| {
        ui.horizontal(|ui| {
            ui.label("Name:");
            ui.text_edit_singleline(&mut panel.manual_name);
        });
        ui.horizontal(|ui| {
            ui.label("X:");
            ui.add(egui::TextEdit::singleline(&mut panel.manual_x).desired_width(56.0));
            ui.label("Y:");
            ui.add(egui::TextEdit::singleline(&mut panel.manual_y).desired_width(56.0));
            ui.label("Z:");
            ui.add(egui::TextEdit::singleline(&mut panel.manual_z).desired_width(56.0));
        });

        if let Some(error) = &panel.manual_error {
            ui.colored_label(FORM_ERROR, error);
        }

        if ui.button("Add point").clicked() {
            match parse_manual_coords(&panel.manual_x, &panel.manual_y, &panel.manual_z) {
                Ok(position) => {
                    let name = if panel.manual_name.trim().is_empty() {
                        format!("Snap point {}", store.len() + 1)
                    } else {
                        panel.manual_name.trim().to_string()
                    };

                    let added = store
                        .add(SnapPointCandidate::at(name, position))
                        .map(|p| (p.id.clone(), p.name.clone()));
                    match added {
                        Ok((id, name)) => {
                            panel.manual_error = None;
                            panel.manual_name.clear();
                            panel.manual_x.clear();
                            panel.manual_y.clear();
                            panel.manual_z.clear();
                            store.select(Some(&id));
                            notices.info(format!("Added {name}"));
                        }
                        Err(err) => {
                            panel.manual_error = Some(err.to_string());
                        }
                    }
                }
                Err(message) => {
                    panel.manual_error = Some(message);
                }
            }
        }
    });
}

fn draw_file_section(
    ui: &mut egui::Ui,
    panel: &mut PanelState,
    save_events: &mut MessageWriter<SaveSnapPointsEvent>,
    load_events: &mut MessageWriter<LoadSnapPointsEvent>,
) {
    ui.collapsing("File", |ui| {
        ui.horizontal(|ui| {
            ui.label("Path:");
            ui.text_edit_singleline(&mut panel.file_path);
        });
        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                save_events.write(SaveSnapPointsEvent {
                    path: panel.file_path.clone(),
                });
            }
            if ui.button("Load").clicked() {
                load_events.write(LoadSnapPointsEvent {
                    path: panel.file_path.clone(),
                });
            }
        });
    });
}

fn draw_view_settings(ui: &mut egui::Ui, settings: &mut ViewerSettings) {
    ui.collapsing("View settings", |ui| {
        egui::Grid::new("view_settings_grid")
            .num_columns(2)
            .spacing([10.0, 8.0])
            .show(ui, |ui| {
                let mut changed = false;

                ui.label("UI Scale:");
                changed |= ui
                    .add(
                        egui::Slider::new(&mut settings.ui_scale, 0.75..=3.0)
                            .step_by(0.25)
                            .suffix("x"),
                    )
                    .changed();
                ui.end_row();

                ui.label("Orbit Sensitivity:");
                changed |= ui
                    .add(egui::Slider::new(
                        &mut settings.orbit_sensitivity,
                        0.001..=0.02,
                    ))
                    .changed();
                ui.end_row();

                ui.label("Zoom Speed:");
                changed |= ui
                    .add(egui::Slider::new(&mut settings.zoom_speed, 0.02..=0.3))
                    .changed();
                ui.end_row();

                ui.label("Marker Scale:");
                changed |= ui
                    .add(
                        egui::Slider::new(&mut settings.marker_scale, 0.5..=3.0)
                            .step_by(0.1)
                            .suffix("x"),
                    )
                    .changed();
                ui.end_row();

                if changed {
                    settings.save();
                }
            });
    });
}

/// Parse the manual-entry coordinate fields, rejecting anything that is not
/// a finite number
fn parse_manual_coords(x: &str, y: &str, z: &str) -> Result<Vec3, String> {
    let parse_axis = |label: &str, value: &str| -> Result<f32, String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(format!("{label} is required"));
        }
        let parsed: f32 = trimmed
            .parse()
            .map_err(|_| format!("{label} must be a number (got '{trimmed}')"))?;
        if !parsed.is_finite() {
            return Err(format!("{label} must be finite"));
        }
        Ok(parsed)
    };

    Ok(Vec3::new(
        parse_axis("X", x)?,
        parse_axis("Y", y)?,
        parse_axis("Z", z)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_coords_parse_valid_input() {
        let position = parse_manual_coords(" 1.5 ", "-2", "0.25").unwrap();
        assert_eq!(position, Vec3::new(1.5, -2.0, 0.25));
    }

    #[test]
    fn manual_coords_reject_garbage_with_axis_in_message() {
        let err = parse_manual_coords("1.0", "abc", "0").unwrap_err();
        assert!(err.contains('Y'), "error should name the bad axis: {err}");

        let missing = parse_manual_coords("", "0", "0").unwrap_err();
        assert!(missing.contains("required"));
    }

    #[test]
    fn manual_coords_reject_non_finite() {
        assert!(parse_manual_coords("inf", "0", "0").is_err());
        assert!(parse_manual_coords("0", "NaN", "0").is_err());
    }
}
