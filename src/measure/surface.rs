//! What the measurement core needs from the map it runs on.
//!
//! The controller never touches cameras or input devices directly. It holds
//! input subscriptions while a mode is active, asks for camera animations and
//! places text overlays, all through [`MapSurface`].
//!
//! ## Module Structure
//!
//! - [`MapSurface`]: the consumed contract
//! - [`InputSubscription`]: RAII guard that unsubscribes on drop
//! - [`SharedSurface`]: in-process implementation polled by the Bevy systems

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use bevy::prelude::Resource;

use crate::geometry::MapPoint;

use super::result::ResultId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputKind {
    Click,
    DoubleClick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Identity of a text overlay; setting an existing key moves and relabels it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OverlayKey {
    /// Cumulative reading at the newest point of the draft
    LiveTotal,
    /// Length of the newest pair, at its midpoint
    SegmentBadge,
    /// Transient label of a just-finished result
    ResultBadge(ResultId),
    /// Transient pin where the map flew to
    SearchPin(u64),
}

impl OverlayKey {
    /// Overlays that belong to the draft of the active mode
    pub fn is_draft(&self) -> bool {
        matches!(self, OverlayKey::LiveTotal | OverlayKey::SegmentBadge)
    }
}

pub trait MapSurface: Send + Sync {
    fn subscribe(&self, kind: InputKind) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);

    /// Ask the camera to animate to `target` at slippy-map `zoom`
    fn animate_to(&self, target: MapPoint, zoom: f32);

    fn set_overlay(&self, key: OverlayKey, at: MapPoint, text: String);

    fn remove_overlay(&self, key: OverlayKey);
}

/// Scoped input registration. Dropping the guard releases the handler, so
/// every path out of a mode gives its input back.
pub struct InputSubscription {
    surface: Arc<dyn MapSurface>,
    id: SubscriptionId,
    kind: InputKind,
}

impl InputSubscription {
    pub fn acquire(surface: &Arc<dyn MapSurface>, kind: InputKind) -> Self {
        let id = surface.subscribe(kind);
        Self {
            surface: Arc::clone(surface),
            id,
            kind,
        }
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }
}

impl Drop for InputSubscription {
    fn drop(&mut self) {
        self.surface.unsubscribe(self.id);
    }
}

impl std::fmt::Debug for InputSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputSubscription")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub at: MapPoint,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRequest {
    pub target: MapPoint,
    pub zoom: f32,
}

#[derive(Debug, Default)]
struct SurfaceState {
    next_id: u64,
    subscriptions: BTreeMap<SubscriptionId, InputKind>,
    camera_request: Option<CameraRequest>,
    overlays: BTreeMap<OverlayKey, Overlay>,
}

/// Map surface shared between the controller and the Bevy systems that
/// dispatch input, animate the camera and draw overlays.
#[derive(Resource, Clone, Default)]
pub struct SharedSurface {
    state: Arc<Mutex<SurfaceState>>,
}

impl SharedSurface {
    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        // State stays consistent even if a holder panicked
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether any active mode currently listens for `kind`
    pub fn is_listening(&self, kind: InputKind) -> bool {
        self.lock().subscriptions.values().any(|k| *k == kind)
    }

    pub fn subscription_count(&self) -> usize {
        self.lock().subscriptions.len()
    }

    /// Take the pending camera request, newest wins
    pub fn take_camera_request(&self) -> Option<CameraRequest> {
        self.lock().camera_request.take()
    }

    pub fn overlays(&self) -> Vec<(OverlayKey, Overlay)> {
        self.lock()
            .overlays
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect()
    }

    pub fn overlay(&self, key: OverlayKey) -> Option<Overlay> {
        self.lock().overlays.get(&key).cloned()
    }
}

impl MapSurface for SharedSurface {
    fn subscribe(&self, kind: InputKind) -> SubscriptionId {
        let mut state = self.lock();
        state.next_id += 1;
        let id = SubscriptionId(state.next_id);
        state.subscriptions.insert(id, kind);
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.lock().subscriptions.remove(&id);
    }

    fn animate_to(&self, target: MapPoint, zoom: f32) {
        self.lock().camera_request = Some(CameraRequest { target, zoom });
    }

    fn set_overlay(&self, key: OverlayKey, at: MapPoint, text: String) {
        self.lock().overlays.insert(key, Overlay { at, text });
    }

    fn remove_overlay(&self, key: OverlayKey) {
        self.lock().overlays.remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_released_on_drop() {
        let shared = SharedSurface::default();
        let surface: Arc<dyn MapSurface> = Arc::new(shared.clone());

        let click = InputSubscription::acquire(&surface, InputKind::Click);
        assert!(shared.is_listening(InputKind::Click));
        assert!(!shared.is_listening(InputKind::DoubleClick));
        assert_eq!(click.kind(), InputKind::Click);

        drop(click);
        assert!(!shared.is_listening(InputKind::Click));
        assert_eq!(shared.subscription_count(), 0);
    }

    #[test]
    fn test_overlay_replace_and_remove() {
        let shared = SharedSurface::default();
        shared.set_overlay(OverlayKey::LiveTotal, MapPoint::new(1.0, 2.0), "a".into());
        shared.set_overlay(OverlayKey::LiveTotal, MapPoint::new(3.0, 4.0), "b".into());
        assert_eq!(shared.overlays().len(), 1);
        assert_eq!(shared.overlay(OverlayKey::LiveTotal).unwrap().text, "b");

        shared.remove_overlay(OverlayKey::LiveTotal);
        assert!(shared.overlays().is_empty());
    }

    #[test]
    fn test_only_live_labels_are_draft() {
        assert!(OverlayKey::LiveTotal.is_draft());
        assert!(OverlayKey::SegmentBadge.is_draft());
        assert!(!OverlayKey::ResultBadge(ResultId(1)).is_draft());
        assert!(!OverlayKey::SearchPin(0).is_draft());
    }

    #[test]
    fn test_camera_request_is_taken_once() {
        let shared = SharedSurface::default();
        shared.animate_to(MapPoint::new(0.0, 0.0), 10.0);
        shared.animate_to(MapPoint::new(5.0, 5.0), 12.0);

        let request = shared.take_camera_request().unwrap();
        assert_eq!(request.target, MapPoint::new(5.0, 5.0));
        assert_eq!(request.zoom, 12.0);
        assert!(shared.take_camera_request().is_none());
    }
}
