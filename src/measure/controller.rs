//! The tool state machine.
//!
//! [`ToolController`] owns which tool is active, the draft (session or route
//! builder) of that tool, the input subscriptions it holds on the map surface,
//! and the result store. Every input is one synchronous call; errors are
//! returned and also queued as [`ToolEvent::Rejected`] for the UI.
//!
//! Search selections arrive asynchronously. Each mode the user starts has a
//! [`ModeTicket`]; a selection stamped with an older ticket is dropped. A
//! restart or extension driven by a selection keeps the ticket, so further
//! picks from the same result list still apply.

use std::sync::Arc;
use std::time::Duration;

use bevy::prelude::*;

use crate::constants::SEARCH_PIN_SECONDS;
use crate::geometry::{GeoPoint, GeometryAdapter, MapPoint};

use super::error::MeasureError;
use super::events::ToolEvent;
use super::expiry::ExpiryScheduler;
use super::format::format_lat_lon;
use super::result::{HistoryEntry, MeasurementKind, MeasurementResult, ResultId};
use super::route::{RouteBuilder, RouteKind, Waypoint, WaypointRole};
use super::session::MeasurementSession;
use super::store::{ClearScope, ResultStore};
use super::surface::{InputKind, InputSubscription, MapSurface, OverlayKey};
use super::tools::Tool;

/// Identity of a user-started mode. Activation, cancel, toggle-off and
/// finishing issue a new one; selection-driven restarts keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModeTicket(u64);

/// What the user asked to do with a search result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionIntent {
    /// Start a smart distance anchored at the place
    SmartDistance,
    /// Add the place to the route, optionally with a role already chosen
    Route(Option<WaypointRole>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchSelection {
    pub name: String,
    pub location: GeoPoint,
    pub intent: SelectionIntent,
    /// Mode instance the selection was made for; `None` applies to whatever is active
    pub ticket: Option<ModeTicket>,
}

/// A route stop waiting for the user to pick its role
#[derive(Debug, Clone, PartialEq)]
pub struct PendingChoice {
    pub name: String,
    pub location: GeoPoint,
    ticket: ModeTicket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteChoice {
    Middle,
    Last,
    Dismiss,
}

/// Draft state of the active tool, with the inputs it holds
#[derive(Debug, Default)]
enum ActiveMode {
    #[default]
    Idle,
    Marker {
        _inputs: Vec<InputSubscription>,
    },
    Session {
        session: MeasurementSession,
        _inputs: Vec<InputSubscription>,
    },
    Route {
        builder: RouteBuilder,
    },
}

#[derive(Resource)]
pub struct ToolController {
    geometry: Box<dyn GeometryAdapter>,
    surface: Arc<dyn MapSurface>,
    store: ResultStore,
    mode: ActiveMode,
    tool: Tool,
    epoch: u64,
    pending: Option<PendingChoice>,
    events: Vec<ToolEvent>,
    expiry: ExpiryScheduler<OverlayKey>,
    badge_lifetime: Duration,
    fly_to_zoom: f32,
    next_pin: u64,
}

impl ToolController {
    pub fn new(geometry: Box<dyn GeometryAdapter>, surface: Arc<dyn MapSurface>) -> Self {
        Self {
            geometry,
            surface,
            store: ResultStore::default(),
            mode: ActiveMode::Idle,
            tool: Tool::None,
            epoch: 0,
            pending: None,
            events: Vec::new(),
            expiry: ExpiryScheduler::default(),
            badge_lifetime: Duration::from_secs(3),
            fly_to_zoom: 12.0,
            next_pin: 0,
        }
    }

    pub fn with_badge_lifetime(mut self, lifetime: Duration) -> Self {
        self.badge_lifetime = lifetime;
        self
    }

    pub fn with_fly_to_zoom(mut self, zoom: f32) -> Self {
        self.fly_to_zoom = zoom;
        self
    }

    // ---- queries ----

    pub fn active_tool(&self) -> Tool {
        self.tool
    }

    pub fn is_idle(&self) -> bool {
        self.tool == Tool::None
    }

    pub fn ticket(&self) -> ModeTicket {
        ModeTicket(self.epoch)
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn geometry(&self) -> &dyn GeometryAdapter {
        self.geometry.as_ref()
    }

    pub fn session(&self) -> Option<&MeasurementSession> {
        match &self.mode {
            ActiveMode::Session { session, .. } => Some(session),
            _ => None,
        }
    }

    pub fn route(&self) -> Option<&RouteBuilder> {
        match &self.mode {
            ActiveMode::Route { builder } => Some(builder),
            _ => None,
        }
    }

    pub fn pending_choice(&self) -> Option<&PendingChoice> {
        self.pending.as_ref()
    }

    /// Lifecycle events queued since the last call
    pub fn drain_events(&mut self) -> Vec<ToolEvent> {
        std::mem::take(&mut self.events)
    }

    /// Guidance for the status bar
    pub fn status_hint(&self) -> String {
        match &self.mode {
            ActiveMode::Idle => "Pick a tool or search for a place".into(),
            ActiveMode::Marker { .. } => "Click the map to drop a marker".into(),
            ActiveMode::Session { session, .. } => {
                let need = session.tool().min_points();
                let have = session.len();
                if session.tool() == Tool::SmartDistance && have == 0 {
                    "Click the start point, or pick a search result".into()
                } else if have < need {
                    format!("Click to add points ({} more needed), Esc to cancel", need - have)
                } else if session.tool() == Tool::SmartDistance {
                    "Click to add points, double-click or Enter to finish".into()
                } else {
                    "Click to add points, Enter to finish, Backspace to undo".into()
                }
            }
            ActiveMode::Route { builder } => {
                if self.pending.is_some() {
                    "Add this stop as a middle or as the last stop".into()
                } else if builder.needs_start() {
                    "Search for the starting point".into()
                } else {
                    "Search for the next stop".into()
                }
            }
        }
    }

    // ---- mode lifecycle ----

    /// Switch to `tool`. Activating the active tool again toggles back to idle.
    pub fn activate(&mut self, tool: Tool) {
        if tool == Tool::MultiRoute {
            self.activate_route(RouteKind::Distance);
            return;
        }

        let previous = self.tool;
        self.epoch += 1;
        self.leave();
        if previous == tool || tool == Tool::None {
            debug!("Tool {:?} toggled off", previous);
            return;
        }
        self.enter(tool, None);
    }

    /// Switch to a route of `kind`; activating the same route kind again toggles off
    pub fn activate_route(&mut self, kind: RouteKind) {
        let same = self.route().is_some_and(|b| b.kind() == kind);
        self.epoch += 1;
        self.leave();
        if same {
            debug!("Route tool toggled off");
            return;
        }
        self.enter_route(kind);
    }

    /// Drop the draft of the active tool and return to idle
    pub fn cancel(&mut self) -> Result<(), MeasureError> {
        let outcome = if self.is_idle() {
            Err(MeasureError::NoActiveMeasurement)
        } else {
            self.epoch += 1;
            self.leave();
            Ok(())
        };
        self.report(outcome)
    }

    /// Complete the active measurement
    pub fn finish(&mut self) -> Result<(), MeasureError> {
        let outcome = self.try_finish();
        self.report(outcome)
    }

    fn try_finish(&mut self) -> Result<(), MeasureError> {
        match &mut self.mode {
            ActiveMode::Idle => Err(MeasureError::NoActiveMeasurement),
            ActiveMode::Marker { .. } => Err(MeasureError::NotAccepted {
                tool: Tool::Marker,
                input: "finish",
            }),
            ActiveMode::Session { session, .. } => {
                let result = session.finalize(self.geometry.as_ref())?;
                self.complete(result);
                Ok(())
            }
            ActiveMode::Route { builder } => match builder.finalize(self.geometry.as_ref())? {
                Some(result) => {
                    self.complete(result);
                    Ok(())
                }
                None => {
                    debug!("Route finished with only a start, cancelling");
                    self.epoch += 1;
                    self.leave();
                    Ok(())
                }
            },
        }
    }

    /// Keep the anchor (or route start) and drop everything added after it
    pub fn reset_current(&mut self) -> Result<(), MeasureError> {
        let changed = match &mut self.mode {
            ActiveMode::Idle => return self.report(Err(MeasureError::NoActiveMeasurement)),
            ActiveMode::Marker { .. } => false,
            ActiveMode::Session { session, .. } => session.reset_to_start(),
            ActiveMode::Route { builder } => builder.reset_to_start(),
        };

        if changed {
            debug!("Reset {:?} to its start", self.tool);
            self.refresh_draft_overlays();
            self.events.push(ToolEvent::Reset);
        }
        Ok(())
    }

    /// Remove the newest point or waypoint, never the anchor or the start
    pub fn undo_last(&mut self) -> Result<(), MeasureError> {
        let removed = match &mut self.mode {
            ActiveMode::Idle => return self.report(Err(MeasureError::NoActiveMeasurement)),
            ActiveMode::Marker { .. } => false,
            ActiveMode::Session { session, .. } => session.remove_last_point().is_some(),
            ActiveMode::Route { builder } => builder.undo().is_some(),
        };

        if removed {
            self.refresh_draft_overlays();
            self.events.push(ToolEvent::PointRemoved);
        }
        Ok(())
    }

    // ---- input ----

    pub fn receive_map_click(&mut self, point: MapPoint) -> Result<(), MeasureError> {
        let outcome = self.try_map_click(point);
        self.report(outcome)
    }

    fn try_map_click(&mut self, point: MapPoint) -> Result<(), MeasureError> {
        match &mut self.mode {
            ActiveMode::Idle => Err(MeasureError::NoActiveMeasurement),
            ActiveMode::Route { .. } => Err(MeasureError::NotAccepted {
                tool: self.tool,
                input: "map clicks",
            }),
            ActiveMode::Marker { .. } => {
                let location = self.geometry.to_geographic(point);
                let text = format!("Marker: {}", format_lat_lon(location.lat, location.lon));
                let result =
                    MeasurementResult::new(MeasurementKind::Marker, 0.0, text, vec![location]);
                self.complete(result);
                Ok(())
            }
            ActiveMode::Session { session, .. } => {
                let reading = session.add_point(point, self.geometry.as_ref());
                self.refresh_draft_overlays();
                self.events.push(ToolEvent::PointAdded { reading });
                Ok(())
            }
        }
    }

    /// Double-click finishes a smart distance once it has two points
    pub fn receive_double_click(&mut self) -> Result<(), MeasureError> {
        let outcome = match &self.mode {
            ActiveMode::Idle => Err(MeasureError::NoActiveMeasurement),
            ActiveMode::Session { session, .. } if session.tool() == Tool::SmartDistance => {
                if session.len() >= 2 {
                    self.try_finish()
                } else {
                    Ok(())
                }
            }
            _ => Err(MeasureError::NotAccepted {
                tool: self.tool,
                input: "double-click",
            }),
        };
        self.report(outcome)
    }

    pub fn receive_search_selection(
        &mut self,
        selection: SearchSelection,
    ) -> Result<(), MeasureError> {
        let outcome = self.try_search_selection(selection);
        self.report(outcome)
    }

    fn try_search_selection(&mut self, selection: SearchSelection) -> Result<(), MeasureError> {
        if let Some(ticket) = selection.ticket
            && ticket != self.ticket()
        {
            info!(
                "Dropping stale selection '{}' (ticket {:?}, current {:?})",
                selection.name,
                ticket,
                self.ticket()
            );
            return Err(MeasureError::StaleAsyncResult);
        }

        match selection.intent {
            SelectionIntent::SmartDistance => {
                let anchor = self.geometry.to_projected(selection.location);
                self.leave();
                self.enter(Tool::SmartDistance, Some(anchor));
                self.surface.animate_to(anchor, self.fly_to_zoom);
                self.refresh_draft_overlays();
                Ok(())
            }
            SelectionIntent::Route(role) => {
                if self.route().is_none() {
                    self.leave();
                    self.enter_route(RouteKind::Distance);
                }
                self.route_selection(selection.name, selection.location, role)
            }
        }
    }

    fn route_selection(
        &mut self,
        name: String,
        location: GeoPoint,
        role: Option<WaypointRole>,
    ) -> Result<(), MeasureError> {
        let needs_start = self.route().is_some_and(|b| b.needs_start());
        let role = match role {
            _ if needs_start => WaypointRole::Start,
            Some(role) => role,
            None => {
                debug!("Waiting for a role for '{}'", name);
                self.pending = Some(PendingChoice {
                    name: name.clone(),
                    location,
                    ticket: self.ticket(),
                });
                self.events.push(ToolEvent::ChoiceRequired { name });
                return Ok(());
            }
        };

        if role == WaypointRole::End
            && let Some(builder) = self.route()
        {
            let need = builder.kind().min_waypoints();
            let have = builder.len() + 1;
            if have < need {
                return Err(MeasureError::InsufficientPoints {
                    tool: Tool::MultiRoute,
                    have,
                    need,
                });
            }
        }

        self.add_waypoint(Waypoint::new(name, location, role))?;
        if role == WaypointRole::End {
            self.try_finish()?;
        }
        Ok(())
    }

    /// Apply the user's answer to the pending route choice
    pub fn resolve_choice(&mut self, choice: RouteChoice) -> Result<(), MeasureError> {
        let outcome = self.try_resolve_choice(choice);
        self.report(outcome)
    }

    fn try_resolve_choice(&mut self, choice: RouteChoice) -> Result<(), MeasureError> {
        let pending = self
            .pending
            .take()
            .ok_or(MeasureError::NoActiveMeasurement)?;
        if pending.ticket != self.ticket() {
            return Err(MeasureError::StaleAsyncResult);
        }

        let role = match choice {
            RouteChoice::Dismiss => return Ok(()),
            RouteChoice::Middle => WaypointRole::Middle,
            RouteChoice::Last => WaypointRole::End,
        };
        self.route_selection(pending.name, pending.location, Some(role))
    }

    /// Fly to a place and drop a short-lived pin there
    pub fn show_place(&mut self, name: &str, location: GeoPoint) {
        let at = self.geometry.to_projected(location);
        self.next_pin += 1;
        let key = OverlayKey::SearchPin(self.next_pin);
        self.surface.animate_to(at, self.fly_to_zoom);
        self.surface.set_overlay(key, at, name.to_string());
        self.expiry
            .schedule(key, Duration::from_secs_f32(SEARCH_PIN_SECONDS));
    }

    // ---- results ----

    pub fn remove_result(&mut self, index: usize) -> Option<MeasurementResult> {
        let removed = self.store.remove_at(index)?;
        self.drop_badge(removed.id);
        debug!("Removed result {:?}", removed.id);
        Some(removed)
    }

    pub fn clear_results(&mut self, scope: ClearScope) {
        for id in self.store.clear(scope) {
            self.drop_badge(id);
        }
        info!("Cleared results ({:?})", scope);
    }

    pub fn import_results(&mut self, results: Vec<MeasurementResult>) -> usize {
        let ids = self.store.import(results);
        info!("Imported {} results", ids.len());
        ids.len()
    }

    pub fn restore_history(&mut self, entries: Vec<HistoryEntry>) {
        self.store.restore_history(entries);
    }

    /// Advance overlay expirations. Only overlays are touched, never the draft.
    pub fn tick(&mut self, elapsed: Duration) {
        for key in self.expiry.tick(elapsed) {
            self.surface.remove_overlay(key);
        }
    }

    // ---- internals ----

    fn report(&mut self, outcome: Result<(), MeasureError>) -> Result<(), MeasureError> {
        if let Err(err) = &outcome {
            debug!("{:?} rejected: {}", self.tool, err);
            self.events.push(ToolEvent::Rejected(err.clone()));
        }
        outcome
    }

    fn enter(&mut self, tool: Tool, anchor: Option<MapPoint>) {
        self.tool = tool;
        let mut inputs = Vec::new();
        if tool.accepts_clicks() {
            inputs.push(InputSubscription::acquire(&self.surface, InputKind::Click));
        }
        if tool == Tool::SmartDistance {
            inputs.push(InputSubscription::acquire(&self.surface, InputKind::DoubleClick));
        }

        self.mode = match tool {
            Tool::None => ActiveMode::Idle,
            Tool::MultiRoute => ActiveMode::Route {
                builder: RouteBuilder::new(RouteKind::Distance),
            },
            _ if tool.uses_session() => {
                let session = match anchor {
                    Some(anchor) => MeasurementSession::anchored(tool, anchor),
                    None => MeasurementSession::new(tool),
                };
                ActiveMode::Session {
                    session,
                    _inputs: inputs,
                }
            }
            _ => ActiveMode::Marker { _inputs: inputs },
        };
        debug!("Tool {:?} started", tool);
        self.events.push(ToolEvent::Started(tool));
    }

    fn enter_route(&mut self, kind: RouteKind) {
        self.tool = Tool::MultiRoute;
        self.mode = ActiveMode::Route {
            builder: RouteBuilder::new(kind),
        };
        debug!("Route ({:?}) started", kind);
        self.events.push(ToolEvent::Started(Tool::MultiRoute));
    }

    /// Tear down the active mode. Dropping the mode releases its subscriptions.
    /// The ticket is left alone; callers ending a user-started mode bump it.
    fn leave(&mut self) {
        if self.is_idle() {
            return;
        }
        let tool = self.tool;
        self.mode = ActiveMode::Idle;
        self.tool = Tool::None;
        self.pending = None;
        self.clear_draft_overlays();
        debug!("Tool {:?} cancelled", tool);
        self.events.push(ToolEvent::Cancelled(tool));
    }

    /// Store a finished result, badge it and go idle
    fn complete(&mut self, result: MeasurementResult) {
        let kind = result.kind;
        let text = result.text.clone();
        let anchor = result.label_anchor();
        let id = self.store.append(result);
        info!("{} measurement saved: {}", kind.label(), text);

        if let Some(anchor) = anchor {
            let at = self.geometry.to_projected(anchor);
            let key = OverlayKey::ResultBadge(id);
            self.surface.set_overlay(key, at, text.clone());
            self.expiry.schedule(key, self.badge_lifetime);
        }

        self.mode = ActiveMode::Idle;
        self.tool = Tool::None;
        self.pending = None;
        self.epoch += 1;
        self.clear_draft_overlays();
        self.events.push(ToolEvent::Finished { kind, text });
    }

    fn add_waypoint(&mut self, waypoint: Waypoint) -> Result<(), MeasureError> {
        let ActiveMode::Route { builder } = &mut self.mode else {
            return Err(MeasureError::NoActiveMeasurement);
        };
        let target = self.geometry.to_projected(waypoint.location);
        let name = waypoint.name.clone();
        let role = waypoint.role;
        let reading = builder.add_waypoint(waypoint, self.geometry.as_ref())?;

        debug!("Waypoint '{}' added as {:?}", name, role);
        self.surface.animate_to(target, self.fly_to_zoom);
        self.refresh_draft_overlays();
        self.events.push(ToolEvent::PointAdded { reading });
        Ok(())
    }

    fn drop_badge(&mut self, id: ResultId) {
        let key = OverlayKey::ResultBadge(id);
        self.expiry.cancel(key);
        self.surface.remove_overlay(key);
    }

    fn clear_draft_overlays(&self) {
        self.surface.remove_overlay(OverlayKey::LiveTotal);
        self.surface.remove_overlay(OverlayKey::SegmentBadge);
    }

    /// Re-place the live total and segment badge for the current draft
    fn refresh_draft_overlays(&self) {
        let geometry = self.geometry.as_ref();
        let (points, reading, kind) = match &self.mode {
            ActiveMode::Session { session, .. } => (
                session.coordinates().to_vec(),
                session.reading(geometry),
                session.kind(),
            ),
            ActiveMode::Route { builder } => {
                let points: Vec<MapPoint> = builder
                    .waypoints()
                    .iter()
                    .map(|w| geometry.to_projected(w.location))
                    .collect();
                (points, builder.reading(geometry), builder.kind().result_kind())
            }
            _ => {
                self.clear_draft_overlays();
                return;
            }
        };

        match (points.last(), reading.total_text(kind)) {
            (Some(last), Some(text)) if points.len() >= 2 => {
                self.surface.set_overlay(OverlayKey::LiveTotal, *last, text)
            }
            _ => self.surface.remove_overlay(OverlayKey::LiveTotal),
        }

        match (points.as_slice(), reading.segment_text()) {
            ([.., a, b], Some(text)) => {
                self.surface.set_overlay(OverlayKey::SegmentBadge, a.midpoint(b), text)
            }
            _ => self.surface.remove_overlay(OverlayKey::SegmentBadge),
        }
    }
}
