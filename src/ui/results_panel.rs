//! Right panel: saved results, recent history and favorites.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};
use chrono::{DateTime, Local, Utc};

use crate::measure::{MeasurementKind, ToolController};
use crate::storage::Favorites;
use crate::theme;

fn kind_icon(kind: MeasurementKind) -> &'static str {
    match kind {
        MeasurementKind::Distance => "📏",
        MeasurementKind::Area => "⬛",
        MeasurementKind::Marker => "📍",
    }
}

fn local_time(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

fn section_heading(ui: &mut egui::Ui, title: &str) {
    ui.add_space(4.0);
    ui.label(egui::RichText::new(title).heading().size(18.0));
    ui.add_space(4.0);
    ui.separator();
    ui.add_space(4.0);
}

fn render_results(ui: &mut egui::Ui, controller: &mut ToolController) {
    section_heading(ui, "Results");

    if controller.store().is_empty() {
        ui.label(egui::RichText::new("Nothing measured yet").weak());
        return;
    }

    let mut remove = None;
    for (index, result) in controller.store().results().iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(kind_icon(result.kind));
            ui.vertical(|ui| {
                ui.label(egui::RichText::new(&result.text).strong());
                ui.label(
                    egui::RichText::new(local_time(&result.created_at))
                        .color(theme::ui::HINT_TEXT)
                        .size(11.0),
                );
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("✕").on_hover_text("Remove").clicked() {
                    remove = Some(index);
                }
            });
        });
    }

    if let Some(index) = remove {
        controller.remove_result(index);
    }
}

fn render_history(ui: &mut egui::Ui, controller: &ToolController) {
    egui::CollapsingHeader::new(format!("Recent ({})", controller.store().history_len()))
        .default_open(false)
        .show(ui, |ui| {
            for entry in controller.store().history() {
                ui.horizontal(|ui| {
                    ui.label(kind_icon(entry.kind));
                    ui.label(entry.text.as_str());
                    ui.label(
                        egui::RichText::new(local_time(&entry.created_at))
                            .color(theme::ui::HINT_TEXT)
                            .size(11.0),
                    );
                });
            }
        });
}

fn render_favorites(ui: &mut egui::Ui, favorites: &mut Favorites, controller: &mut ToolController) {
    section_heading(ui, "Favorites");

    if favorites.is_empty() {
        ui.label(egui::RichText::new("Star a search result to keep it here").weak());
        return;
    }

    let mut remove = None;
    for favorite in favorites.items() {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("★").color(theme::ui::FAVORITE));
            if ui.link(favorite.name.as_str()).on_hover_text("Go to").clicked() {
                controller.show_place(&favorite.name, favorite.location);
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("✕").clicked() {
                    remove = Some(favorite.id);
                }
            });
        });
    }

    if let Some(id) = remove {
        favorites.remove(id);
    }
}

pub fn results_panel_ui(
    mut contexts: EguiContexts,
    mut controller: ResMut<ToolController>,
    favorites: Option<ResMut<Favorites>>,
) -> Result {
    egui::SidePanel::right("results_panel")
        .default_width(240.0)
        .show(contexts.ctx_mut()?, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                render_results(ui, &mut controller);
                ui.add_space(8.0);
                render_history(ui, &controller);

                if let Some(mut favorites) = favorites {
                    ui.add_space(8.0);
                    render_favorites(ui, &mut favorites, &mut controller);
                }
            });
        });
    Ok(())
}
