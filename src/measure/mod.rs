//! Interactive measurement and annotation.
//!
//! The [`ToolController`] is the only owner of measurement state. Bevy systems
//! elsewhere translate mouse, keyboard and search input into controller calls;
//! this plugin builds the controller once the config is loaded, advances its
//! overlay timers and forwards its lifecycle events as messages.
//!
//! ## Module Structure
//!
//! - `tools`: the [`Tool`] modes
//! - `format`: unit formatting of lengths and areas
//! - `session`: free-hand point accumulation
//! - `route`: waypoint routes from search selections
//! - `result` / `store`: finished results and the history ring
//! - `surface`: the map surface contract and its shared implementation
//! - `expiry`: cancellable overlay timers
//! - `controller`: the state machine

mod controller;
mod error;
mod events;
mod expiry;
pub mod format;
mod result;
mod route;
mod session;
mod store;
mod surface;
mod tools;


pub use controller::{
    ModeTicket, PendingChoice, RouteChoice, SearchSelection, SelectionIntent, ToolController,
};
pub use error::MeasureError;
pub use events::{ToolEvent, ToolEventMessage};
pub use result::{HistoryEntry, MeasurementKind, MeasurementResult, ResultId, RouteSummary};
pub use route::{RouteKind, Waypoint, WaypointRole};
pub use session::LiveReading;
pub use store::ClearScope;
pub use surface::{InputKind, MapSurface, OverlayKey, SharedSurface};
pub use tools::Tool;

use std::sync::Arc;
use std::time::Duration;

use bevy::prelude::*;

use crate::config::{AppConfig, ConfigLoaded};
use crate::geometry::SphericalMercator;

/// Systems that need the controller at startup run after this set
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControllerReady;

/// Build the controller against the shared surface with the loaded settings
fn setup_controller(mut commands: Commands, surface: Res<SharedSurface>, config: Res<AppConfig>) {
    let shared: Arc<dyn MapSurface> = Arc::new(surface.clone());
    let badge = Duration::from_secs_f32(config.data.result_badge_seconds.max(0.1));
    let controller = ToolController::new(Box::new(SphericalMercator), shared)
        .with_badge_lifetime(badge)
        .with_fly_to_zoom(config.data.fly_to_zoom);
    commands.insert_resource(controller);
    info!("Measurement controller ready");
}

fn tick_controller(time: Res<Time>, mut controller: ResMut<ToolController>) {
    controller.tick(time.delta());
}

fn forward_tool_events(
    mut controller: ResMut<ToolController>,
    mut writer: MessageWriter<ToolEventMessage>,
) {
    for event in controller.drain_events() {
        writer.write(ToolEventMessage(event));
    }
}

pub struct MeasurePlugin;

impl Plugin for MeasurePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SharedSurface>()
            .add_message::<ToolEventMessage>()
            .add_systems(
                Startup,
                setup_controller.after(ConfigLoaded).in_set(ControllerReady),
            )
            .add_systems(
                PostUpdate,
                (tick_controller, forward_tool_events).chain(),
            );
    }
}
