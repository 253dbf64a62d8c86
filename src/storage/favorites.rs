//! Saved places.

use bevy::prelude::Resource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::FAVORITE_MATCH_TOLERANCE_DEG;
use crate::geometry::GeoPoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: u64,
    pub name: String,
    pub location: GeoPoint,
    pub added_at: DateTime<Utc>,
}

#[derive(Resource, Debug, Default)]
pub struct Favorites {
    items: Vec<Favorite>,
    /// Whether the list changed since it was last persisted
    pub dirty: bool,
}

impl Favorites {
    pub fn from_items(items: Vec<Favorite>) -> Self {
        Self { items, dirty: false }
    }

    pub fn items(&self) -> &[Favorite] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn next_id(&self) -> u64 {
        self.items.iter().map(|f| f.id).max().unwrap_or(0) + 1
    }

    /// Saved place within the match tolerance of `location`
    pub fn find(&self, location: GeoPoint) -> Option<&Favorite> {
        self.items
            .iter()
            .find(|f| f.location.approx_eq(&location, FAVORITE_MATCH_TOLERANCE_DEG))
    }

    pub fn is_favorite(&self, location: GeoPoint) -> bool {
        self.find(location).is_some()
    }

    /// Newest favorites go first
    pub fn add(&mut self, name: impl Into<String>, location: GeoPoint) -> u64 {
        let id = self.next_id();
        self.items.insert(
            0,
            Favorite {
                id,
                name: name.into(),
                location,
                added_at: Utc::now(),
            },
        );
        self.dirty = true;
        id
    }

    pub fn remove(&mut self, id: u64) -> Option<Favorite> {
        let index = self.items.iter().position(|f| f.id == id)?;
        self.dirty = true;
        Some(self.items.remove(index))
    }

    /// Add the place, or remove it if it is already saved. Returns true if added.
    pub fn toggle(&mut self, name: &str, location: GeoPoint) -> bool {
        match self.find(location).map(|f| f.id) {
            Some(id) => {
                self.remove(id);
                false
            }
            None => {
                self.add(name, location);
                true
            }
        }
    }

    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            self.items.clear();
            self.dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut favorites = Favorites::default();
        let seoul = GeoPoint::new(126.978, 37.5665);

        assert!(favorites.toggle("Seoul", seoul));
        assert!(favorites.is_favorite(seoul));
        assert!(favorites.dirty);

        // Within 0.001 degrees counts as the same place
        assert!(!favorites.toggle("Seoul", GeoPoint::new(126.9785, 37.5661)));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_match_tolerance() {
        let mut favorites = Favorites::default();
        favorites.add("A", GeoPoint::new(10.0, 10.0));
        assert!(favorites.is_favorite(GeoPoint::new(10.0009, 9.9991)));
        assert!(!favorites.is_favorite(GeoPoint::new(10.002, 10.0)));
    }

    #[test]
    fn test_ids_are_unique_and_newest_first() {
        let mut favorites = Favorites::default();
        let a = favorites.add("A", GeoPoint::new(0.0, 0.0));
        let b = favorites.add("B", GeoPoint::new(1.0, 1.0));
        assert_ne!(a, b);
        assert_eq!(favorites.items()[0].name, "B");

        assert_eq!(favorites.remove(a).unwrap().name, "A");
        assert!(favorites.remove(a).is_none());
        assert_eq!(favorites.items().len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut favorites = Favorites::default();
        favorites.add("A", GeoPoint::new(0.0, 0.0));
        favorites.dirty = false;
        favorites.clear();
        assert!(favorites.is_empty());
        assert!(favorites.dirty);
    }
}
