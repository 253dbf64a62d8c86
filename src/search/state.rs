//! Search state resources, messages and task components.

use std::sync::Arc;

use bevy::prelude::*;
use bevy::tasks::Task;

use crate::measure::ModeTicket;

use super::geocoding::{GeocodeError, Geocoder, Place};

/// State of the search panel
#[derive(Resource, Default)]
pub struct SearchState {
    /// Text in the search box
    pub query: String,
    /// Results of the newest completed search
    pub results: Vec<Place>,
    /// Whether the newest search is still in flight
    pub is_searching: bool,
    /// Error message of the newest search, if it failed
    pub error: Option<String>,
    /// Generation of the newest request; older responses are dropped
    pub generation: u64,
    /// Mode the newest search was issued for, when a search-driven tool was active
    pub ticket: Option<ModeTicket>,
}

impl SearchState {
    /// Start a new generation and return its number
    pub fn begin(&mut self, ticket: Option<ModeTicket>) -> u64 {
        self.generation += 1;
        self.is_searching = true;
        self.error = None;
        self.ticket = ticket;
        self.generation
    }

    /// Apply a finished search. Returns false when a newer search superseded it.
    pub fn apply(&mut self, generation: u64, outcome: Result<Vec<Place>, GeocodeError>) -> bool {
        if generation != self.generation {
            return false;
        }

        self.is_searching = false;
        match outcome {
            Ok(places) => {
                self.results = places;
                self.error = None;
            }
            Err(e) => {
                self.results.clear();
                self.error = Some(e.to_string());
            }
        }
        true
    }
}

/// The geocoder searches run against
#[derive(Resource, Clone)]
pub struct ActiveGeocoder(pub Arc<dyn Geocoder>);

/// Background search, tagged with the generation it belongs to
#[derive(Component)]
pub struct SearchTask {
    pub generation: u64,
    pub task: Task<Result<Vec<Place>, GeocodeError>>,
}

/// Message to run a search
#[derive(Message)]
pub struct SearchRequest {
    pub query: String,
}

/// What to do with a search result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceAction {
    /// Fly there and drop a pin
    GoTo,
    SmartDistance,
    /// Add to the current route, starting one if needed
    Route,
    ToggleFavorite,
}

/// Message sent when the user acts on a search result (or a favorite)
#[derive(Message, Debug, Clone)]
pub struct PlaceSelected {
    pub place: Place,
    pub action: PlaceAction,
}
