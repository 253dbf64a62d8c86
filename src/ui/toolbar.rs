use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::config::AppConfig;
use crate::export::{default_file_name, ExportFormat, ExportRequest, ExportTarget, ImportRequest};
use crate::measure::{RouteKind, Tool, ToolController};
use crate::theme;

use super::ClearDialogState;

const EXPORT_TARGETS: [ExportTarget; 4] = [
    ExportTarget::File(ExportFormat::GeoJson),
    ExportTarget::File(ExportFormat::Csv),
    ExportTarget::File(ExportFormat::Json),
    ExportTarget::Bundle,
];

fn tool_button(ui: &mut egui::Ui, label: &str, selected: bool) -> egui::Response {
    let text = if selected {
        egui::RichText::new(label).size(14.0).strong().color(theme::ui::ACTIVE_TOOL)
    } else {
        egui::RichText::new(label).size(14.0).strong()
    };
    ui.add(
        egui::Button::new(text)
            .min_size(egui::vec2(0.0, 28.0))
            .selected(selected),
    )
}

/// Main toolbar: tools, draft controls, export/import and clearing
pub fn toolbar_ui(
    mut contexts: EguiContexts,
    mut controller: ResMut<ToolController>,
    config: Res<AppConfig>,
    mut clear_dialog: ResMut<ClearDialogState>,
    mut export_events: MessageWriter<ExportRequest>,
    mut import_events: MessageWriter<ImportRequest>,
) -> Result {
    egui::TopBottomPanel::top("main_toolbar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 8)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                let active = controller.active_tool();
                let route_kind = controller.route().map(|r| r.kind());

                for tool in Tool::all() {
                    let selected = active == *tool && route_kind != Some(RouteKind::Area);
                    if tool_button(ui, tool.display_name(), selected).clicked() {
                        controller.activate(*tool);
                    }
                }
                if tool_button(ui, "Area route", route_kind == Some(RouteKind::Area))
                    .on_hover_text("Polygon through searched places")
                    .clicked()
                {
                    controller.activate_route(RouteKind::Area);
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                let drafting = !controller.is_idle();
                ui.add_enabled_ui(drafting, |ui| {
                    if ui.button("Finish").on_hover_text("Enter").clicked() {
                        let _ = controller.finish();
                    }
                    if ui.button("Undo").on_hover_text("Backspace").clicked() {
                        let _ = controller.undo_last();
                    }
                    if ui.button("Reset").clicked() {
                        let _ = controller.reset_current();
                    }
                    if ui.button("Cancel").on_hover_text("Esc").clicked() {
                        let _ = controller.cancel();
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Clear all").clicked() {
                        clear_dialog.is_open = true;
                        clear_dialog.also_history = false;
                    }

                    let start_dir = config
                        .data
                        .last_export_dir
                        .clone()
                        .unwrap_or_else(crate::paths::default_export_dir);

                    if ui.button("Import").clicked()
                        && let Some(path) = rfd::FileDialog::new()
                            .set_title("Import Measurements")
                            .set_directory(&start_dir)
                            .add_filter("Measurements", &["geojson", "json"])
                            .pick_file()
                    {
                        import_events.write(ImportRequest { path });
                    }

                    ui.menu_button("Export", |ui| {
                        for target in EXPORT_TARGETS {
                            if ui.button(target.label()).clicked() {
                                ui.close();
                                if let Some(path) = rfd::FileDialog::new()
                                    .set_title("Export Measurements")
                                    .set_directory(&start_dir)
                                    .set_file_name(default_file_name(target))
                                    .add_filter(target.label(), &[target.extension()])
                                    .save_file()
                                {
                                    export_events.write(ExportRequest { target, path });
                                }
                            }
                        }
                    });
                });
            });
        });
    Ok(())
}
