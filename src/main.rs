mod config;
mod constants;
mod export;
mod geometry;
mod logging;
mod map_view;
mod measure;
mod paths;
mod search;
mod storage;
pub mod theme;
mod ui;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use constants::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};

fn main() {
    if let Err(e) = paths::ensure_directories() {
        eprintln!("Failed to create application directories: {}", e);
    }

    // Held until exit so the file writer flushes
    let log_guard = logging::init(&paths::logs_dir());

    let window = WindowPlugin {
        primary_window: Some(Window {
            title: "Waymark".into(),
            resolution: (DEFAULT_WINDOW_WIDTH as u32, DEFAULT_WINDOW_HEIGHT as u32).into(),
            ..default()
        }),
        ..default()
    };
    let mut default_plugins = DefaultPlugins.build().set(window);
    if log_guard.is_some() {
        default_plugins = default_plugins.disable::<LogPlugin>();
    }

    App::new()
        .add_plugins(default_plugins)
        .add_plugins(EguiPlugin::default())
        .add_plugins(config::ConfigPlugin)
        .add_plugins(measure::MeasurePlugin)
        .add_plugins(map_view::MapViewPlugin)
        .add_plugins(search::SearchPlugin)
        .add_plugins(storage::StoragePlugin)
        .add_plugins(export::ExportPlugin)
        .add_plugins(ui::UiPlugin)
        .run();
}
