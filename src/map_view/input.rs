//! Mouse and keyboard dispatch into the [`ToolController`].
//!
//! Rejected input is not handled here: the controller reports it as a
//! `ToolEvent::Rejected`, which the UI shows as a toast.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::constants::DOUBLE_CLICK_SECONDS;
use crate::geometry::MapPoint;
use crate::measure::{InputKind, SharedSurface, Tool, ToolController};

use super::params::{is_cursor_over_ui, is_typing, MapCameraParams};
use super::MapOrigin;

/// Second click must land within this many pixels of the first
const DOUBLE_CLICK_RADIUS_PX: f32 = 6.0;

/// Pairs up clicks into double-clicks
#[derive(Debug, Default)]
pub struct ClickTracker {
    last: Option<(f64, Vec2)>,
}

impl ClickTracker {
    /// Record a click at `now` seconds and screen position `pos`.
    /// Returns true when it completes a double-click; the pair is then consumed.
    pub fn register(&mut self, now: f64, pos: Vec2) -> bool {
        if let Some((at, prev)) = self.last
            && now - at <= DOUBLE_CLICK_SECONDS
            && prev.distance(pos) <= DOUBLE_CLICK_RADIUS_PX
        {
            self.last = None;
            return true;
        }
        self.last = Some((now, pos));
        false
    }
}

/// Left clicks on the map. The second click of a double-click goes to the
/// double-click handler instead when a mode listens for it.
pub fn handle_map_clicks(
    mouse_button: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    mut tracker: Local<ClickTracker>,
    surface: Res<SharedSurface>,
    origin: Res<MapOrigin>,
    camera: MapCameraParams,
    mut controller: ResMut<ToolController>,
    mut contexts: EguiContexts,
) {
    if !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }

    if is_cursor_over_ui(&mut contexts) {
        return;
    }

    let wants_click = surface.is_listening(InputKind::Click);
    let wants_double = surface.is_listening(InputKind::DoubleClick);
    if !wants_click && !wants_double {
        return;
    }

    let (Some(screen), Some(world)) = (camera.cursor_screen_pos(), camera.cursor_world_pos())
    else {
        return;
    };

    let is_double = tracker.register(time.elapsed_secs_f64(), screen);
    if is_double && wants_double {
        let _ = controller.receive_double_click();
        return;
    }

    if wants_click {
        let _ = controller.receive_map_click(MapPoint::from_world(world, origin.0));
    }
}

/// Enter finishes, Escape cancels, Backspace undoes; letters pick tools
pub fn handle_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut controller: ResMut<ToolController>,
    mut contexts: EguiContexts,
) {
    // Don't act on keys while typing in a text field
    if is_typing(&mut contexts) {
        return;
    }

    if keyboard.just_pressed(KeyCode::Enter) || keyboard.just_pressed(KeyCode::NumpadEnter) {
        let _ = controller.finish();
        return;
    }
    if keyboard.just_pressed(KeyCode::Escape) {
        let _ = controller.cancel();
        return;
    }
    if keyboard.just_pressed(KeyCode::Backspace) {
        let _ = controller.undo_last();
        return;
    }

    let tool = if keyboard.just_pressed(KeyCode::KeyD) {
        Some(Tool::Distance)
    } else if keyboard.just_pressed(KeyCode::KeyA) {
        Some(Tool::Area)
    } else if keyboard.just_pressed(KeyCode::KeyM) {
        Some(Tool::Marker)
    } else if keyboard.just_pressed(KeyCode::KeyS) {
        Some(Tool::SmartDistance)
    } else if keyboard.just_pressed(KeyCode::KeyR) {
        Some(Tool::MultiRoute)
    } else {
        None
    };

    if let Some(tool) = tool {
        controller.activate(tool);
    }
}
