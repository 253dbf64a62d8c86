//! Colors for the map gizmos and the egui panels.
//!
//! Measurement kinds keep one color everywhere: on the map, in the results
//! list and in the toolbar.

use bevy::prelude::Color;

use crate::measure::MeasurementKind;

// ----------------------------------------------------------------------------
// Map Background
// ----------------------------------------------------------------------------

/// Clear color behind the graticule
pub const MAP_BACKGROUND: Color = Color::srgb(0.11, 0.12, 0.14);

/// Minor graticule lines
pub const GRATICULE_COLOR: Color = Color::srgba(0.5, 0.5, 0.5, 0.25);

/// Equator and prime meridian
pub const GRATICULE_MAJOR: Color = Color::srgba(0.7, 0.7, 0.7, 0.5);

// ----------------------------------------------------------------------------
// Finished Results
// ----------------------------------------------------------------------------

pub const DISTANCE_COLOR: Color = Color::srgb(0.2, 0.6, 1.0);

pub const AREA_COLOR: Color = Color::srgb(0.3, 0.8, 0.4);

pub const MARKER_COLOR: Color = Color::srgb(1.0, 0.35, 0.3);

/// Gizmo color for a finished result of `kind`
pub fn kind_color(kind: MeasurementKind) -> Color {
    match kind {
        MeasurementKind::Distance => DISTANCE_COLOR,
        MeasurementKind::Area => AREA_COLOR,
        MeasurementKind::Marker => MARKER_COLOR,
    }
}

// ----------------------------------------------------------------------------
// Drafts
// ----------------------------------------------------------------------------

/// The session or route being built
pub const DRAFT_COLOR: Color = Color::srgb(1.0, 0.7, 0.2);

/// Fixed start of a smart-distance session
pub const ANCHOR_COLOR: Color = Color::srgb(1.0, 0.9, 0.3);

/// Pin dropped by "Go to"
pub const SEARCH_PIN_COLOR: Color = Color::srgb(0.9, 0.3, 0.9);

// ----------------------------------------------------------------------------
// UI Colors (egui)
// ----------------------------------------------------------------------------

pub mod ui {
    use bevy_egui::egui;

    /// Highlight for the active tool button
    pub const ACTIVE_TOOL: egui::Color32 = egui::Color32::from_rgb(100, 200, 100);

    pub const LABEL_TEXT: egui::Color32 = egui::Color32::from_gray(200);

    /// Status hints, empty-list placeholders and timestamps
    pub const HINT_TEXT: egui::Color32 = egui::Color32::from_gray(140);

    /// Failed searches and exports
    pub const ERROR_TEXT: egui::Color32 = egui::Color32::from_rgb(230, 90, 80);

    /// Gold star for favorites
    pub const FAVORITE: egui::Color32 = egui::Color32::from_rgb(240, 190, 60);

    /// Semi-transparent backing of the labels drawn on the map
    pub const OVERLAY_BACKGROUND: egui::Color32 = egui::Color32::from_black_alpha(170);

    /// Outline of labels that follow the draft, matching `DRAFT_COLOR`
    pub const DRAFT_OVERLAY_STROKE: egui::Color32 = egui::Color32::from_rgb(255, 178, 51);

    /// Background of toast notifications
    pub const TOAST_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(45, 45, 48);

    /// Dims the map behind a modal
    pub const MODAL_OVERLAY: egui::Color32 = egui::Color32::from_black_alpha(100);
}
