//! The map the measurement tools run on.
//!
//! There are no tiles: the view is a lon/lat graticule drawn with gizmos over a
//! web-mercator world. One world unit is one projected meter, measured from
//! [`MapOrigin`] so that f32 render coordinates stay precise.
//!
//! This plugin is the Bevy side of the [`SharedSurface`](crate::measure::SharedSurface):
//! it dispatches clicks and keys to the controller, plays the camera flights
//! it requests and draws its overlays.
//!
//! ## Module Structure
//!
//! - `camera`: pan, wheel zoom and fly-to animation
//! - `params`: cursor/viewport conversions and egui input gates
//! - `input`: click, double-click and keyboard dispatch
//! - `render`: graticule, results and drafts as gizmos
//! - `overlays`: text overlays as egui labels

mod camera;
mod input;
mod overlays;
mod params;
mod render;

pub use camera::{meters_per_pixel, MapCamera, MapZoom};
pub use params::{is_cursor_over_ui, MapCameraParams};

use bevy::math::DVec2;
use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::constants::INITIAL_CENTER;
use crate::geometry::{GeoPoint, GeometryAdapter, SphericalMercator};
use crate::theme;
use crate::ui::no_dialog_open;

/// Projected position of world coordinate zero
#[derive(Resource, Debug, Clone, Copy)]
pub struct MapOrigin(pub DVec2);

impl MapOrigin {
    pub fn centered_on(geometry: &dyn GeometryAdapter, center: GeoPoint) -> Self {
        let projected = geometry.to_projected(center);
        Self(DVec2::new(projected.x, projected.y))
    }
}

pub struct MapViewPlugin;

impl Plugin for MapViewPlugin {
    fn build(&self, app: &mut App) {
        let center = GeoPoint::new(INITIAL_CENTER.0, INITIAL_CENTER.1);

        app.insert_resource(MapOrigin::centered_on(&SphericalMercator, center))
            .insert_resource(ClearColor(theme::MAP_BACKGROUND))
            .add_systems(Startup, camera::spawn_camera)
            .add_systems(
                Update,
                (
                    camera::camera_pan,
                    camera::camera_zoom,
                    camera::start_fly_to,
                    camera::animate_fly_to,
                    camera::apply_camera_zoom,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    (input::handle_map_clicks, input::handle_shortcuts).run_if(no_dialog_open),
                    render::draw_graticule,
                    render::draw_results,
                    render::draw_drafts,
                ),
            )
            .add_systems(EguiPrimaryContextPass, overlays::render_overlays);
    }
}
