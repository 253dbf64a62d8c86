//! Place search feeding the search-driven tools.
//!
//! Searches run on the async compute pool. Each request starts a new
//! generation; a response is only applied if no newer request was made in
//! the meantime. A failed search only sets an error on [`SearchState`], the
//! measurement controller is never touched by it.

mod geocoding;
mod state;
mod systems;

#[cfg(test)]
mod tests;

pub use geocoding::{GeocodeError, Geocoder, NominatimGeocoder, Place};
pub use state::{ActiveGeocoder, PlaceAction, PlaceSelected, SearchRequest, SearchState};

use std::sync::Arc;

use bevy::prelude::*;

use crate::config::{AppConfig, ConfigLoaded};

fn setup_geocoder(mut commands: Commands, config: Res<AppConfig>) {
    let geocoder = NominatimGeocoder::new(config.data.geocoder_url.clone(), config.data.search_limit);
    commands.insert_resource(ActiveGeocoder(Arc::new(geocoder)));
}

pub struct SearchPlugin;

impl Plugin for SearchPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SearchState>()
            .add_message::<SearchRequest>()
            .add_message::<PlaceSelected>()
            .add_systems(Startup, setup_geocoder.after(ConfigLoaded))
            .add_systems(
                Update,
                (
                    systems::start_search.run_if(on_message::<SearchRequest>),
                    systems::poll_search_tasks,
                    systems::handle_place_selected.run_if(on_message::<PlaceSelected>),
                ),
            );
    }
}
