use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::constants::{FLY_TO_SECONDS, INITIAL_ZOOM, MAX_ZOOM, METERS_PER_PIXEL_Z0, MIN_ZOOM};
use crate::measure::SharedSurface;

use super::params::is_cursor_over_ui;
use super::MapOrigin;

#[derive(Component)]
pub struct MapCamera;

/// Slippy-map zoom level of the camera
#[derive(Component)]
pub struct MapZoom {
    pub level: f32,
}

impl Default for MapZoom {
    fn default() -> Self {
        Self { level: INITIAL_ZOOM }
    }
}

/// Projected meters covered by one screen pixel at `level`
pub fn meters_per_pixel(level: f32) -> f32 {
    (METERS_PER_PIXEL_Z0 / 2f64.powf(level as f64)) as f32
}

/// Camera animation toward a requested target
#[derive(Component, Debug, Clone, Copy)]
pub struct FlyTo {
    from: Vec2,
    to: Vec2,
    from_zoom: f32,
    to_zoom: f32,
    elapsed: f32,
}

impl FlyTo {
    pub fn new(from: Vec2, to: Vec2, from_zoom: f32, to_zoom: f32) -> Self {
        Self {
            from,
            to,
            from_zoom,
            to_zoom: to_zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            elapsed: 0.0,
        }
    }

    /// Advance by `dt` seconds; returns position, zoom and whether the flight ended
    pub fn advance(&mut self, dt: f32) -> (Vec2, f32, bool) {
        self.elapsed = (self.elapsed + dt).min(FLY_TO_SECONDS);
        let t = self.elapsed / FLY_TO_SECONDS;
        // Smoothstep easing
        let eased = t * t * (3.0 - 2.0 * t);
        (
            self.from.lerp(self.to, eased),
            self.from_zoom + (self.to_zoom - self.from_zoom) * eased,
            self.elapsed >= FLY_TO_SECONDS,
        )
    }
}

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        MapCamera,
        MapZoom::default(),
        // The origin sits at the initial map center
        Transform::from_translation(Vec3::new(0.0, 0.0, 1000.0)),
    ));
}

/// Pan with the middle or right mouse button; a manual pan aborts any flight
pub fn camera_pan(
    mut commands: Commands,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut camera_query: Query<(Entity, &mut Transform, &MapZoom), With<MapCamera>>,
) {
    if !mouse_button.pressed(MouseButton::Middle) && !mouse_button.pressed(MouseButton::Right) {
        mouse_motion.clear();
        return;
    }

    let Ok((entity, mut transform, zoom)) = camera_query.single_mut() else {
        return;
    };

    let scale = meters_per_pixel(zoom.level);
    let mut moved = false;
    for event in mouse_motion.read() {
        let delta = event.delta * scale;
        transform.translation.x -= delta.x;
        transform.translation.y += delta.y;
        moved = true;
    }
    if moved {
        commands.entity(entity).remove::<FlyTo>();
    }
}

pub fn camera_zoom(
    mut scroll_events: MessageReader<MouseWheel>,
    mut camera_query: Query<&mut MapZoom, With<MapCamera>>,
    mut contexts: EguiContexts,
) {
    // Scrolling a panel must not zoom the map
    if is_cursor_over_ui(&mut contexts) {
        scroll_events.clear();
        return;
    }

    let Ok(mut zoom) = camera_query.single_mut() else {
        return;
    };

    for event in scroll_events.read() {
        let steps = match event.unit {
            MouseScrollUnit::Line => event.y * 0.5,
            MouseScrollUnit::Pixel => event.y * 0.01,
        };
        zoom.level = (zoom.level + steps).clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

pub fn apply_camera_zoom(
    mut camera_query: Query<(&MapZoom, &mut Projection), (With<MapCamera>, Changed<MapZoom>)>,
) {
    for (zoom, mut projection) in camera_query.iter_mut() {
        if let Projection::Orthographic(ref mut ortho) = *projection {
            ortho.scale = meters_per_pixel(zoom.level);
        }
    }
}

/// Turn the controller's camera request into a flight
pub fn start_fly_to(
    mut commands: Commands,
    surface: Res<SharedSurface>,
    origin: Res<MapOrigin>,
    camera_query: Query<(Entity, &Transform, &MapZoom), With<MapCamera>>,
) {
    let Some(request) = surface.take_camera_request() else {
        return;
    };
    let Ok((entity, transform, zoom)) = camera_query.single() else {
        return;
    };

    let target = request.target.to_world(origin.0);
    debug!("Flying to {:?} at zoom {}", target, request.zoom);
    commands.entity(entity).insert(FlyTo::new(
        transform.translation.truncate(),
        target,
        zoom.level,
        request.zoom,
    ));
}

pub fn animate_fly_to(
    mut commands: Commands,
    time: Res<Time>,
    mut camera_query: Query<(Entity, &mut Transform, &mut MapZoom, &mut FlyTo), With<MapCamera>>,
) {
    for (entity, mut transform, mut zoom, mut flight) in camera_query.iter_mut() {
        let (position, level, done) = flight.advance(time.delta_secs());
        transform.translation.x = position.x;
        transform.translation.y = position.y;
        zoom.level = level;
        if done {
            commands.entity(entity).remove::<FlyTo>();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_per_pixel_halves_per_level() {
        let z12 = meters_per_pixel(12.0);
        let z13 = meters_per_pixel(13.0);
        assert!((z12 / z13 - 2.0).abs() < 1e-4);
        assert!((meters_per_pixel(0.0) as f64 - METERS_PER_PIXEL_Z0).abs() < 1.0);
    }

    #[test]
    fn test_fly_to_reaches_target() {
        let mut flight = FlyTo::new(Vec2::ZERO, Vec2::new(100.0, -50.0), 10.0, 14.0);

        let (mid, mid_zoom, done) = flight.advance(FLY_TO_SECONDS / 2.0);
        assert!(!done);
        assert!((mid - Vec2::new(50.0, -25.0)).length() < 1e-3);
        assert!((mid_zoom - 12.0).abs() < 1e-4);

        let (end, end_zoom, done) = flight.advance(FLY_TO_SECONDS);
        assert!(done);
        assert_eq!(end, Vec2::new(100.0, -50.0));
        assert_eq!(end_zoom, 14.0);
    }

    #[test]
    fn test_fly_to_clamps_zoom() {
        let mut flight = FlyTo::new(Vec2::ZERO, Vec2::ZERO, 10.0, 25.0);
        let (_, zoom, _) = flight.advance(FLY_TO_SECONDS);
        assert_eq!(zoom, MAX_ZOOM);
    }
}
