//! SystemParam bundle for cursor and viewport conversions, plus the egui input gates.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use super::camera::{meters_per_pixel, MapCamera, MapZoom};

/// Bundled camera and window queries for screen/world calculations
#[derive(SystemParam)]
pub struct MapCameraParams<'w, 's> {
    pub window: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
    pub camera: Query<
        'w,
        's,
        (&'static Camera, &'static GlobalTransform, &'static MapZoom),
        With<MapCamera>,
    >,
}

impl MapCameraParams<'_, '_> {
    /// Cursor position in window coordinates, if over the window
    pub fn cursor_screen_pos(&self) -> Option<Vec2> {
        self.window.single().ok()?.cursor_position()
    }

    /// World position of the cursor, if available
    pub fn cursor_world_pos(&self) -> Option<Vec2> {
        let cursor_pos = self.cursor_screen_pos()?;
        let (camera, transform, _) = self.camera.single().ok()?;
        camera.viewport_to_world_2d(transform, cursor_pos).ok()
    }

    /// Viewport position of a world point
    pub fn to_viewport(&self, world: Vec2) -> Option<Vec2> {
        let (camera, transform, _) = self.camera.single().ok()?;
        camera.world_to_viewport(transform, world.extend(0.0)).ok()
    }

    /// World units per screen pixel at the current zoom
    pub fn meters_per_pixel(&self) -> f32 {
        self.camera
            .single()
            .map(|(_, _, zoom)| meters_per_pixel(zoom.level))
            .unwrap_or(1.0)
    }

    /// World-space (min, max) corners of the visible area
    pub fn visible_bounds(&self) -> Option<(Vec2, Vec2)> {
        let window = self.window.single().ok()?;
        let (_, transform, zoom) = self.camera.single().ok()?;
        let center = transform.translation().truncate();
        let half = Vec2::new(window.width(), window.height()) * meters_per_pixel(zoom.level) / 2.0;
        Some((center - half, center + half))
    }
}

/// Check if the cursor is over egui UI
pub fn is_cursor_over_ui(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area())
        .unwrap_or(false)
}

/// Check if a text field has keyboard focus
pub fn is_typing(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_keyboard_input())
        .unwrap_or(false)
}
