//! Bevy systems for running searches and acting on their results.

use bevy::prelude::*;
use bevy::tasks::AsyncComputeTaskPool;
use futures_lite::future;

use crate::measure::{SearchSelection, SelectionIntent, Tool, ToolController};

use super::state::{ActiveGeocoder, PlaceAction, PlaceSelected, SearchRequest, SearchState, SearchTask};

/// System to spawn a search task for the newest request
pub fn start_search(
    mut commands: Commands,
    mut requests: MessageReader<SearchRequest>,
    mut state: ResMut<SearchState>,
    geocoder: Res<ActiveGeocoder>,
    controller: Res<ToolController>,
) {
    let Some(request) = requests.read().last() else {
        return;
    };

    let query = request.query.trim().to_string();
    let ticket = matches!(
        controller.active_tool(),
        Tool::SmartDistance | Tool::MultiRoute
    )
    .then(|| controller.ticket());
    let generation = state.begin(ticket);

    if query.is_empty() {
        state.apply(generation, Ok(Vec::new()));
        return;
    }

    debug!("Searching for '{}' (generation {})", query, generation);
    let geocoder = geocoder.0.clone();
    let task = AsyncComputeTaskPool::get().spawn(async move { geocoder.search(&query) });
    commands.spawn(SearchTask { generation, task });
}

/// System to poll running searches
pub fn poll_search_tasks(
    mut commands: Commands,
    mut state: ResMut<SearchState>,
    mut tasks: Query<(Entity, &mut SearchTask)>,
) {
    for (entity, mut search) in tasks.iter_mut() {
        if let Some(outcome) = future::block_on(future::poll_once(&mut search.task)) {
            if let Err(e) = &outcome {
                warn!("Search failed: {}", e);
            }
            let generation = search.generation;
            if state.apply(generation, outcome) {
                debug!("Search generation {} applied", generation);
            } else {
                debug!("Search generation {} superseded, dropped", generation);
            }
            commands.entity(entity).despawn();
        }
    }
}

/// System to hand chosen places to the controller
pub fn handle_place_selected(
    mut events: MessageReader<PlaceSelected>,
    mut controller: ResMut<ToolController>,
    state: Res<SearchState>,
) {
    for event in events.read() {
        let place = &event.place;
        let intent = match event.action {
            PlaceAction::GoTo => {
                controller.show_place(place.short_name(), place.location);
                continue;
            }
            PlaceAction::ToggleFavorite => continue,
            PlaceAction::SmartDistance => SelectionIntent::SmartDistance,
            PlaceAction::Route => SelectionIntent::Route(None),
        };

        // Errors are queued as controller events and surface as toasts
        let _ = controller.receive_search_selection(SearchSelection {
            name: place.short_name().to_string(),
            location: place.location,
            intent,
            ticket: state.ticket,
        });
    }
}
