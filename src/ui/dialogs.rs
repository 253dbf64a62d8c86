use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::config::ConfigResetNotification;
use crate::measure::{ClearScope, RouteChoice, ToolController};
use crate::theme;

use super::ClearDialogState;

/// Centered, fixed-size window drawn above the backdrop
fn modal(title: &str) -> egui::Window<'static> {
    egui::Window::new(title)
        .order(egui::Order::Foreground)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
}

fn dim_background(ctx: &egui::Context) {
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Middle,
        egui::Id::new("modal_backdrop"),
    ));
    painter.rect_filled(ctx.screen_rect(), 0.0, theme::ui::MODAL_OVERLAY);
}

/// Confirmation before dropping every result
pub fn clear_all_dialog_ui(
    mut contexts: EguiContexts,
    mut dialog: ResMut<ClearDialogState>,
    mut controller: ResMut<ToolController>,
) -> Result {
    if !dialog.is_open {
        return Ok(());
    }

    let ctx = contexts.ctx_mut()?;
    dim_background(ctx);
    modal("Clear All").show(ctx, |ui| {
        ui.label(format!(
            "Remove all {} results from the map?",
            controller.store().len()
        ));
        ui.checkbox(&mut dialog.also_history, "Also clear recent history");
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            if ui.button("Clear").clicked() {
                let scope = if dialog.also_history {
                    ClearScope::Everything
                } else {
                    ClearScope::ResultsOnly
                };
                controller.clear_results(scope);
                dialog.is_open = false;
            }
            if ui.button("Cancel").clicked() {
                dialog.is_open = false;
            }
        });
    });
    Ok(())
}

/// Asks where a searched place goes in the route being built
pub fn route_choice_ui(mut contexts: EguiContexts, mut controller: ResMut<ToolController>) -> Result {
    let Some(pending) = controller.pending_choice() else {
        return Ok(());
    };
    let name = pending.name.clone();

    // "Last" needs enough stops to close the route
    let can_finish = controller
        .route()
        .is_some_and(|r| r.len() + 1 >= r.kind().min_waypoints());

    let mut choice = None;
    let ctx = contexts.ctx_mut()?;
    dim_background(ctx);
    modal("Add Stop").show(ctx, |ui| {
        ui.label(egui::RichText::new(&name).strong());
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Add as stop").clicked() {
                choice = Some(RouteChoice::Middle);
            }
            if ui
                .add_enabled(can_finish, egui::Button::new("Add as last stop"))
                .on_disabled_hover_text("The route needs more stops first")
                .clicked()
            {
                choice = Some(RouteChoice::Last);
            }
            if ui.button("Dismiss").clicked() {
                choice = Some(RouteChoice::Dismiss);
            }
        });
    });

    if let Some(choice) = choice {
        let _ = controller.resolve_choice(choice);
    }
    Ok(())
}

/// Shown once at startup when the config file had to be replaced with defaults
pub fn config_reset_notification_ui(
    mut contexts: EguiContexts,
    mut notification: ResMut<ConfigResetNotification>,
) -> Result {
    if !notification.show {
        return Ok(());
    }

    let ctx = contexts.ctx_mut()?;
    dim_background(ctx);
    modal("Settings Reset").show(ctx, |ui| {
        ui.label("Your settings could not be read and were reset to defaults.");
        if let Some(ref reason) = notification.reason {
            ui.add_space(5.0);
            ui.label(egui::RichText::new(reason).color(theme::ui::HINT_TEXT));
        }
        ui.add_space(10.0);
        if ui.button("OK").clicked() {
            notification.show = false;
        }
    });
    Ok(())
}
