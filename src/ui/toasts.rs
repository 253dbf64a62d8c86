//! Short-lived notifications in the bottom-right corner.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::constants::TOAST_SECONDS;
use crate::measure::ToolEventMessage;
use crate::theme;

/// Oldest toasts are dropped beyond this many
const MAX_TOASTS: usize = 4;

#[derive(Debug, Clone)]
pub struct Toast {
    pub text: String,
    remaining: f32,
}

#[derive(Resource, Debug, Default)]
pub struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn push(&mut self, text: impl Into<String>) {
        self.items.push(Toast {
            text: text.into(),
            remaining: TOAST_SECONDS,
        });
        if self.items.len() > MAX_TOASTS {
            let excess = self.items.len() - MAX_TOASTS;
            self.items.drain(..excess);
        }
    }

    /// Age every toast by `dt` seconds and drop the expired ones
    pub fn tick(&mut self, dt: f32) {
        for toast in &mut self.items {
            toast.remaining -= dt;
        }
        self.items.retain(|t| t.remaining > 0.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Turn controller events into toasts and expire old ones
pub fn collect_toasts(
    time: Res<Time>,
    mut events: MessageReader<ToolEventMessage>,
    mut toasts: ResMut<Toasts>,
) {
    toasts.tick(time.delta_secs());
    for event in events.read() {
        if let Some(text) = event.0.toast_text() {
            toasts.push(text);
        }
    }
}

pub fn toasts_ui(mut contexts: EguiContexts, toasts: Res<Toasts>) -> Result {
    if toasts.is_empty() {
        return Ok(());
    }

    egui::Area::new(egui::Id::new("toasts"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -40.0])
        .interactable(false)
        .show(contexts.ctx_mut()?, |ui| {
            for toast in toasts.iter() {
                egui::Frame::new()
                    .fill(theme::ui::TOAST_BACKGROUND)
                    .corner_radius(6.0)
                    .inner_margin(egui::Margin::symmetric(12, 8))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(&toast.text).color(theme::ui::LABEL_TEXT));
                    });
                ui.add_space(4.0);
            }
        });
    Ok(())
}
