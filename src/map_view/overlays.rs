use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::measure::{OverlayKey, SharedSurface};
use crate::theme;

use super::params::MapCameraParams;
use super::MapOrigin;

/// Draw the controller's text overlays as egui labels anchored to map positions
pub fn render_overlays(
    surface: Res<SharedSurface>,
    origin: Res<MapOrigin>,
    camera: MapCameraParams,
    mut contexts: EguiContexts,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    for (key, overlay) in surface.overlays() {
        let Some(screen_pos) = camera.to_viewport(overlay.at.to_world(origin.0)) else {
            continue;
        };

        // Segment lengths sit on the line, everything else just above its point
        let (pivot, offset) = match key {
            OverlayKey::SegmentBadge => (egui::Align2::CENTER_CENTER, 0.0),
            _ => (egui::Align2::CENTER_BOTTOM, -10.0),
        };

        egui::Area::new(egui::Id::new(("map_overlay", key)))
            .fixed_pos(egui::pos2(screen_pos.x, screen_pos.y + offset))
            .pivot(pivot)
            .interactable(false)
            .show(ctx, |ui| {
                let stroke = if key.is_draft() {
                    egui::Stroke::new(1.0, theme::ui::DRAFT_OVERLAY_STROKE)
                } else {
                    egui::Stroke::NONE
                };
                egui::Frame::new()
                    .fill(theme::ui::OVERLAY_BACKGROUND)
                    .stroke(stroke)
                    .corner_radius(4.0)
                    .inner_margin(egui::Margin::symmetric(6, 2))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(&overlay.text).color(egui::Color32::WHITE));
                    });
            });
    }
}
