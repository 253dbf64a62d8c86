//! Persisted application settings.
//!
//! The config lives in `config.json` (see [`crate::paths`]). Every field has a
//! serde default, so older or partial files load fine; a file that cannot be
//! read or parsed is replaced by the defaults and the user is told once.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{MAX_ZOOM, MIN_ZOOM};

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Nominatim caps `limit` at 40
const MAX_SEARCH_LIMIT: usize = 40;

fn default_geocoder_url() -> String {
    DEFAULT_GEOCODER_URL.to_string()
}

fn default_search_limit() -> usize {
    5
}

fn default_fly_to_zoom() -> f32 {
    12.0
}

fn default_true() -> bool {
    true
}

fn default_badge_seconds() -> f32 {
    3.0
}

/// Application configuration persisted to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfigData {
    /// Search endpoint (Nominatim-compatible)
    #[serde(default = "default_geocoder_url")]
    pub geocoder_url: String,

    /// Maximum number of search results requested
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Zoom level the map animates to when jumping to a place
    #[serde(default = "default_fly_to_zoom")]
    pub fly_to_zoom: f32,

    /// Keep the recent-measurements ring across sessions
    #[serde(default = "default_true")]
    pub persist_history: bool,

    /// How long the label of a just-finished measurement stays on the map
    #[serde(default = "default_badge_seconds")]
    pub result_badge_seconds: f32,

    /// Directory of the last export, offered first in the save dialog
    #[serde(default)]
    pub last_export_dir: Option<PathBuf>,
}

impl Default for AppConfigData {
    fn default() -> Self {
        Self {
            geocoder_url: default_geocoder_url(),
            search_limit: default_search_limit(),
            fly_to_zoom: default_fly_to_zoom(),
            persist_history: true,
            result_badge_seconds: default_badge_seconds(),
            last_export_dir: None,
        }
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: crate::paths::config_file(),
            dirty: false,
        }
    }
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification dialog
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Message to remember where the user last exported to
#[derive(Message)]
pub struct UpdateLastExportDirRequest {
    pub dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read configuration file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Configuration file was corrupted: {0}")]
    Parse(#[from] serde_json::Error),
}

impl AppConfigData {
    /// Pull values a hand-edited file may have put out of range back into it
    pub fn sanitized(mut self) -> Self {
        self.search_limit = self.search_limit.clamp(1, MAX_SEARCH_LIMIT);
        if !self.fly_to_zoom.is_finite() {
            self.fly_to_zoom = default_fly_to_zoom();
        }
        self.fly_to_zoom = self.fly_to_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if !(self.result_badge_seconds.is_finite() && self.result_badge_seconds > 0.0) {
            self.result_badge_seconds = default_badge_seconds();
        }
        if self.geocoder_url.trim().is_empty() {
            self.geocoder_url = default_geocoder_url();
        }
        self
    }
}

/// Read the config at `path`. A missing file yields the defaults.
fn load_config(path: &Path) -> Result<AppConfigData, ConfigError> {
    if !path.exists() {
        info!("No config file found at {:?}, using defaults", path);
        return Ok(AppConfigData::default());
    }

    let json = std::fs::read_to_string(path)?;
    let data: AppConfigData = serde_json::from_str(&json)?;
    info!("Loaded config from {:?}", path);
    Ok(data.sanitized())
}

fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(&config.data)?;
    std::fs::write(&config.config_path, json)?;
    Ok(())
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    config.dirty = false;
    match load_config(&config.config_path) {
        Ok(data) => config.data = data,
        Err(e) => {
            warn!("Resetting config to defaults: {}", e);
            config.data = AppConfigData::default();
            reset_notification.show = true;
            reset_notification.reason = Some(e.to_string());
        }
    }
}

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut config: ResMut<AppConfig>,
) {
    // Several requests in one frame collapse into one write
    events.clear();
    if !config.dirty {
        return;
    }
    match save_config(&config) {
        Ok(()) => info!("Config saved to {:?}", config.config_path),
        Err(e) => error!("Failed to save config: {}", e),
    }
    config.dirty = false;
}

fn update_last_export_dir_system(
    mut events: MessageReader<UpdateLastExportDirRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        if config.data.last_export_dir.as_ref() == Some(&event.dir) {
            continue;
        }
        config.data.last_export_dir = Some(event.dir.clone());
        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_message::<UpdateLastExportDirRequest>()
            .add_systems(Startup, load_config_system.in_set(ConfigLoaded))
            .add_systems(
                Update,
                (
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                    update_last_export_dir_system
                        .run_if(on_message::<UpdateLastExportDirRequest>),
                ),
            );
    }
}
