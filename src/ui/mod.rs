//! egui panels around the map.
//!
//! ## Module Structure
//!
//! - `toolbar`: tool buttons, draft controls, export/import, clear all
//! - `search_panel`: left panel with place search
//! - `results_panel`: right panel with results, history and favorites
//! - `status_bar`: hint line and live reading
//! - `dialogs`: clear confirmation, route stop choice, config reset notice
//! - `toasts`: transient notifications fed by controller events

mod dialogs;
mod results_panel;
mod search_panel;
mod status_bar;
mod toasts;
mod toolbar;

pub use toasts::Toasts;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::config::ConfigResetNotification;
use crate::measure::ToolController;

/// Resource that tracks whether any modal dialog is currently open.
/// Map input handlers check this so clicks meant for a dialog never
/// reach the active tool.
#[derive(Resource, Default)]
pub struct DialogState {
    pub any_modal_open: bool,
}

/// State of the "Clear all" confirmation
#[derive(Resource, Default)]
pub struct ClearDialogState {
    pub is_open: bool,
    pub also_history: bool,
}

/// Runs in First, before input handlers
fn update_dialog_state(
    clear_dialog: Res<ClearDialogState>,
    config_reset: Res<ConfigResetNotification>,
    controller: Option<Res<ToolController>>,
    mut dialog_state: ResMut<DialogState>,
) {
    let choice_open = controller.is_some_and(|c| c.pending_choice().is_some());
    dialog_state.any_modal_open = clear_dialog.is_open || config_reset.show || choice_open;
}

/// Run condition: returns true when no modal dialog is open.
///
/// Usage: `.run_if(no_dialog_open)`
pub fn no_dialog_open(dialog_state: Res<DialogState>) -> bool {
    !dialog_state.any_modal_open
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogState>()
            .init_resource::<ClearDialogState>()
            .init_resource::<Toasts>()
            .add_systems(First, update_dialog_state)
            .add_systems(Update, toasts::collect_toasts)
            // Side panels render first so top and bottom panels fit between them
            .add_systems(
                EguiPrimaryContextPass,
                (
                    search_panel::search_panel_ui,
                    results_panel::results_panel_ui,
                    toolbar::toolbar_ui,
                    status_bar::status_bar_ui,
                )
                    .chain(),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    dialogs::clear_all_dialog_ui,
                    dialogs::route_choice_ui,
                    dialogs::config_reset_notification_ui,
                    toasts::toasts_ui,
                )
                    .after(status_bar::status_bar_ui),
            );
    }
}
