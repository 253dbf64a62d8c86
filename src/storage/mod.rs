//! Persistence of the history ring and favorites.
//!
//! Both live in one [`JsonFileStore`] in the data directory, under the keys
//! [`HISTORY_KEY`] and [`FAVORITES_KEY`]. Loading happens once at startup
//! after the controller exists; writes happen whenever the data changes.

mod favorites;
mod kv;

pub use favorites::{Favorite, Favorites};
pub use kv::{JsonFileStore, KeyValueStore, StoreError};

use bevy::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::AppConfig;
use crate::constants::HISTORY_CAPACITY;
use crate::measure::{ControllerReady, HistoryEntry, ToolController, ToolEvent, ToolEventMessage};
use crate::search::{PlaceAction, PlaceSelected};

pub const HISTORY_KEY: &str = "measurement-history";
pub const FAVORITES_KEY: &str = "favorites";

/// The key/value store used by the app
#[derive(Resource)]
pub struct PersistentStore(pub Box<dyn KeyValueStore>);

/// Read a typed value; missing or malformed entries read as `None`
fn read_value<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let value = store.get(key)?;
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!("Ignoring malformed '{}' entry: {}", key, e);
            None
        }
    }
}

fn write_value<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    store.set(key, serde_json::to_value(value)?)
}

pub fn load_history(store: &dyn KeyValueStore) -> Vec<HistoryEntry> {
    let mut entries: Vec<HistoryEntry> = read_value(store, HISTORY_KEY).unwrap_or_default();
    entries.truncate(HISTORY_CAPACITY);
    entries
}

pub fn load_favorites(store: &dyn KeyValueStore) -> Vec<Favorite> {
    read_value(store, FAVORITES_KEY).unwrap_or_default()
}

/// Startup system to open the store and restore history and favorites
fn load_persisted_state(
    mut commands: Commands,
    config: Res<AppConfig>,
    mut controller: ResMut<ToolController>,
) {
    let path = crate::paths::store_file();
    let store = match JsonFileStore::open(&path) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open store {:?}: {}", path, e);
            JsonFileStore::empty(&path)
        }
    };

    if config.data.persist_history {
        let history = load_history(&store);
        info!("Restored {} history entries", history.len());
        controller.restore_history(history);
    }

    let favorites = load_favorites(&store);
    info!("Loaded {} favorites", favorites.len());
    commands.insert_resource(Favorites::from_items(favorites));
    commands.insert_resource(PersistentStore(Box::new(store)));
}

/// System to write the history ring whenever it changes
fn persist_history(
    config: Res<AppConfig>,
    controller: Res<ToolController>,
    store: Option<ResMut<PersistentStore>>,
    mut last_revision: Local<Option<u64>>,
) {
    let Some(mut store) = store else {
        return;
    };
    let revision = controller.store().history_revision();
    let Some(last) = *last_revision else {
        // The first revision seen is the restored state
        *last_revision = Some(revision);
        return;
    };
    if last == revision || !config.data.persist_history {
        return;
    }
    *last_revision = Some(revision);

    let entries: Vec<&HistoryEntry> = controller.store().history().collect();
    if let Err(e) = write_value(store.0.as_mut(), HISTORY_KEY, &entries) {
        error!("Failed to save history: {}", e);
    }
}

/// System to write favorites when they change
fn persist_favorites(favorites: Option<ResMut<Favorites>>, store: Option<ResMut<PersistentStore>>) {
    let (Some(mut favorites), Some(mut store)) = (favorites, store) else {
        return;
    };
    if !favorites.dirty {
        return;
    }
    favorites.dirty = false;

    if let Err(e) = write_value(store.0.as_mut(), FAVORITES_KEY, &favorites.items()) {
        error!("Failed to save favorites: {}", e);
    }
}

/// System to add or remove favorites picked in the search panel
fn handle_favorite_toggle(
    mut events: MessageReader<PlaceSelected>,
    favorites: Option<ResMut<Favorites>>,
    mut notices: MessageWriter<ToolEventMessage>,
) {
    let Some(mut favorites) = favorites else {
        return;
    };
    for event in events.read() {
        if event.action != PlaceAction::ToggleFavorite {
            continue;
        }
        let name = event.place.short_name();
        let text = if favorites.toggle(name, event.place.location) {
            format!("Added {} to favorites", name)
        } else {
            format!("Removed {} from favorites", name)
        };
        notices.write(ToolEventMessage(ToolEvent::Notice(text)));
    }
}

pub struct StoragePlugin;

impl Plugin for StoragePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_persisted_state.after(ControllerReady))
            .add_systems(
                Update,
                (
                    handle_favorite_toggle.run_if(on_message::<PlaceSelected>),
                    persist_favorites,
                    persist_history,
                ),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::kv::MemoryStore;
    use super::*;
    use crate::geometry::GeoPoint;
    use crate::measure::MeasurementKind;
    use chrono::Utc;
    use serde_json::json;

    fn entry(value: f64) -> HistoryEntry {
        HistoryEntry {
            kind: MeasurementKind::Distance,
            value,
            text: format!("{value:.1} m"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_history_roundtrip_through_store() {
        let mut store = MemoryStore::default();
        let entries = vec![entry(2.0), entry(1.0)];
        write_value(&mut store, HISTORY_KEY, &entries).unwrap();

        let loaded = load_history(&store);
        assert_eq!(loaded, entries);
    }

    #[test]
    fn test_history_is_trimmed_to_capacity() {
        let mut store = MemoryStore::default();
        let entries: Vec<HistoryEntry> = (0..15).map(|i| entry(i as f64)).collect();
        write_value(&mut store, HISTORY_KEY, &entries).unwrap();

        let loaded = load_history(&store);
        assert_eq!(loaded.len(), HISTORY_CAPACITY);
        assert_eq!(loaded[0].value, 0.0);
    }

    #[test]
    fn test_malformed_entries_read_as_empty() {
        let mut store = MemoryStore::default();
        store.set(HISTORY_KEY, json!({"not": "a list"})).unwrap();
        store.set(FAVORITES_KEY, json!(42)).unwrap();
        assert!(load_history(&store).is_empty());
        assert!(load_favorites(&store).is_empty());
    }

    #[test]
    fn test_favorites_roundtrip_through_store() {
        let mut store = MemoryStore::default();
        let mut favorites = Favorites::default();
        favorites.add("Seoul", GeoPoint::new(126.978, 37.5665));
        write_value(&mut store, FAVORITES_KEY, &favorites.items()).unwrap();

        let loaded = load_favorites(&store);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Seoul");
    }

    #[test]
    fn test_history_key_uses_timestamp_field_name() {
        let mut store = MemoryStore::default();
        write_value(&mut store, HISTORY_KEY, &vec![entry(1.0)]).unwrap();
        let raw = store.get(HISTORY_KEY).unwrap();
        assert!(raw[0].get("when").is_some());
    }
}
