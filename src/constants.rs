//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1600.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// Number of entries kept in the recent-measurements ring
pub const HISTORY_CAPACITY: usize = 10;

/// Tolerance in degrees (both axes) for matching a location to a favorite
pub const FAVORITE_MATCH_TOLERANCE_DEG: f64 = 0.001;

/// How long the pin dropped by "Go to" stays on the map
pub const SEARCH_PIN_SECONDS: f32 = 3.0;

/// How long toast notifications stay visible
pub const TOAST_SECONDS: f32 = 2.0;

/// Duration of the camera fly-to animation
pub const FLY_TO_SECONDS: f32 = 1.0;

/// Two clicks closer than this count as a double-click
pub const DOUBLE_CLICK_SECONDS: f64 = 0.3;

/// Zoom limits, in slippy-map zoom levels
pub const MIN_ZOOM: f32 = 3.0;
pub const MAX_ZOOM: f32 = 18.0;

/// Zoom the map opens at
pub const INITIAL_ZOOM: f32 = 12.0;

/// Meters per pixel at zoom 0 on the web-mercator equator
pub const METERS_PER_PIXEL_Z0: f64 = 156_543.033_92;

/// Initial view center (lon, lat)
pub const INITIAL_CENTER: (f64, f64) = (126.9780, 37.5665);

/// User-Agent sent to the geocoding service
pub const USER_AGENT: &str = concat!("waymark/", env!("CARGO_PKG_VERSION"));
