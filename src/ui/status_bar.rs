use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::geometry::MapPoint;
use crate::map_view::{is_cursor_over_ui, MapCameraParams, MapOrigin};
use crate::measure::ToolController;
use crate::theme;

/// Bottom bar: what to do next, the live reading and the zoom level.
///
/// While a session is drafted over the map the reading stretches to the
/// cursor, the same way the rubber band line does.
pub fn status_bar_ui(
    mut contexts: EguiContexts,
    controller: Res<ToolController>,
    origin: Res<MapOrigin>,
    camera: MapCameraParams,
) -> Result {
    let geometry = controller.geometry();
    let cursor = camera
        .cursor_world_pos()
        .filter(|_| !is_cursor_over_ui(&mut contexts))
        .map(|world| MapPoint::from_world(world, origin.0));

    let reading = if let Some(session) = controller.session() {
        let reading = cursor
            .and_then(|cursor| session.preview(cursor, geometry))
            .unwrap_or_else(|| session.reading(geometry));
        reading.total_text(session.kind())
    } else if let Some(route) = controller.route().filter(|r| r.len() >= 2) {
        route.reading(geometry).total_text(route.kind().result_kind())
    } else {
        None
    };
    let zoom = camera.camera.single().ok().map(|(_, _, zoom)| zoom.level);

    egui::TopBottomPanel::bottom("status_bar").show(contexts.ctx_mut()?, |ui| {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(controller.status_hint()).color(theme::ui::LABEL_TEXT));

            if let Some(text) = reading {
                ui.separator();
                ui.label(egui::RichText::new(text).strong());
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(level) = zoom {
                    ui.label(
                        egui::RichText::new(format!("Zoom {:.1}", level))
                            .color(theme::ui::HINT_TEXT),
                    );
                }
            });
        });
    });
    Ok(())
}
