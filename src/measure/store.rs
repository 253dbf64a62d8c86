//! Finalized results plus the recent-measurements ring.

use std::collections::VecDeque;

use crate::constants::HISTORY_CAPACITY;

use super::result::{HistoryEntry, MeasurementResult, ResultId};

/// What `clear` empties
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearScope {
    ResultsOnly,
    Everything,
}

/// Ordered list of results and a bounded, newest-first history ring.
///
/// The ring is written on append only; removing a result never rewrites it.
#[derive(Debug)]
pub struct ResultStore {
    results: Vec<MeasurementResult>,
    history: VecDeque<HistoryEntry>,
    capacity: usize,
    next_id: u64,
    /// Bumped whenever the ring changes, so persistence can tell when to write
    history_revision: u64,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl ResultStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            results: Vec::new(),
            history: VecDeque::with_capacity(capacity),
            capacity,
            next_id: 1,
            history_revision: 0,
        }
    }

    fn assign_id(&mut self, result: &mut MeasurementResult) -> ResultId {
        let id = ResultId(self.next_id);
        self.next_id += 1;
        result.id = id;
        id
    }

    /// Append a result, give it an identity and mirror it into the ring
    pub fn append(&mut self, mut result: MeasurementResult) -> ResultId {
        let id = self.assign_id(&mut result);
        self.history.push_front(HistoryEntry::from(&result));
        self.history.truncate(self.capacity);
        self.history_revision += 1;
        self.results.push(result);
        id
    }

    /// Append results loaded from a file. They get fresh identities and do
    /// not enter the history ring.
    pub fn import(&mut self, results: Vec<MeasurementResult>) -> Vec<ResultId> {
        results
            .into_iter()
            .map(|mut result| {
                let id = self.assign_id(&mut result);
                self.results.push(result);
                id
            })
            .collect()
    }

    /// Remove by position; the ring is left as it is
    pub fn remove_at(&mut self, index: usize) -> Option<MeasurementResult> {
        (index < self.results.len()).then(|| self.results.remove(index))
    }

    /// Empty the list (and the ring for `Everything`). Returns the ids removed.
    pub fn clear(&mut self, scope: ClearScope) -> Vec<ResultId> {
        let removed = self.results.drain(..).map(|r| r.id).collect();
        if scope == ClearScope::Everything && !self.history.is_empty() {
            self.history.clear();
            self.history_revision += 1;
        }
        removed
    }

    /// Replace the ring with persisted entries, newest first
    pub fn restore_history(&mut self, entries: Vec<HistoryEntry>) {
        self.history = entries.into_iter().take(self.capacity).collect();
        self.history_revision += 1;
    }

    pub fn results(&self) -> &[MeasurementResult] {
        &self.results
    }

    pub fn get(&self, index: usize) -> Option<&MeasurementResult> {
        self.results.get(index)
    }

    pub fn position(&self, id: ResultId) -> Option<usize> {
        self.results.iter().position(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_revision(&self) -> u64 {
        self.history_revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeoPoint;
    use crate::measure::result::MeasurementKind;

    fn distance(value: f64) -> MeasurementResult {
        MeasurementResult::new(
            MeasurementKind::Distance,
            value,
            format!("{value}"),
            vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.1)],
        )
    }

    #[test]
    fn test_append_assigns_increasing_ids() {
        let mut store = ResultStore::default();
        let a = store.append(distance(1.0));
        let b = store.append(distance(2.0));
        assert!(b > a);
        assert_eq!(store.get(1).unwrap().id, b);
        assert_eq!(store.position(a), Some(0));
    }

    #[test]
    fn test_history_is_newest_first_and_bounded() {
        let mut store = ResultStore::with_capacity(3);
        for i in 0..5 {
            store.append(distance(i as f64));
        }
        let values: Vec<f64> = store.history().map(|h| h.value).collect();
        assert_eq!(values, vec![4.0, 3.0, 2.0]);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_default_capacity_is_ten() {
        let mut store = ResultStore::default();
        for i in 0..12 {
            store.append(distance(i as f64));
        }
        assert_eq!(store.history_len(), 10);
    }

    #[test]
    fn test_remove_at_leaves_history_alone() {
        let mut store = ResultStore::default();
        store.append(distance(1.0));
        store.append(distance(2.0));
        store.append(distance(3.0));
        let revision = store.history_revision();

        let removed = store.remove_at(1).unwrap();
        assert_eq!(removed.value, 2.0);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1).unwrap().value, 3.0);
        assert_eq!(store.history_len(), 3);
        assert_eq!(store.history_revision(), revision);

        assert!(store.remove_at(5).is_none());
    }

    #[test]
    fn test_clear_scopes() {
        let mut store = ResultStore::default();
        store.append(distance(1.0));
        store.append(distance(2.0));

        let removed = store.clear(ClearScope::ResultsOnly);
        assert_eq!(removed.len(), 2);
        assert!(store.is_empty());
        assert_eq!(store.history_len(), 2);

        store.append(distance(3.0));
        store.clear(ClearScope::Everything);
        assert!(store.is_empty());
        assert_eq!(store.history_len(), 0);
    }

    #[test]
    fn test_import_reassigns_ids_without_history() {
        let mut store = ResultStore::default();
        store.append(distance(1.0));

        let mut loaded = distance(7.0);
        loaded.id = ResultId(1);
        let ids = store.import(vec![loaded]);

        assert_eq!(ids.len(), 1);
        assert_ne!(ids[0], ResultId(1));
        assert_eq!(store.len(), 2);
        assert_eq!(store.history_len(), 1);
    }

    #[test]
    fn test_restore_history_trims_to_capacity() {
        let mut store = ResultStore::with_capacity(2);
        let entries = (0..4).map(|i| HistoryEntry::from(&distance(i as f64))).collect();
        store.restore_history(entries);
        let values: Vec<f64> = store.history().map(|h| h.value).collect();
        assert_eq!(values, vec![0.0, 1.0]);
    }
}
