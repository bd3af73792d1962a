//! Interactive capture of emergency routes.
//!
//! The [RouteDrawer] is either idle or drawing. While drawing, map clicks
//! append points to a [DrawingSession]. Finishing a session with at least
//! two points turns it into a [DrawnRoute] and dispatches an
//! [EmergencyVehicle] from the first point to the last.
//!
//! The drawer only tracks which polyline belongs to what; operations that
//! retire a polyline hand its handle back so the caller can remove it from
//! the map.

use crate::geo::{path_length, LatLng};
use crate::model::{EmergencyVehicle, Priority, VehicleStatus, VehicleType};
use crate::surface::OverlayId;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// The minimum number of points in a finished route.
pub const MIN_ROUTE_POINTS: usize = 2;

/// A route being drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawingSession {
    kind: VehicleType,
    points: Vec<LatLng>,
    polyline: Option<OverlayId>,
}

impl DrawingSession {
    fn new(kind: VehicleType) -> Self {
        Self {
            kind,
            points: vec![],
            polyline: None,
        }
    }

    /// The vehicle type the route is being drawn for.
    pub fn kind(&self) -> VehicleType {
        self.kind
    }

    pub fn points(&self) -> &[LatLng] {
        &self.points
    }

    /// The polyline showing the route so far, once one has been drawn.
    pub fn polyline(&self) -> Option<OverlayId> {
        self.polyline
    }

    pub(crate) fn attach_polyline(&mut self, id: OverlayId) {
        self.polyline = Some(id);
    }
}

/// A finished route.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DrawnRoute {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: VehicleType,
    pub points: Vec<LatLng>,
    #[serde(skip)]
    pub polyline: Option<OverlayId>,
}

impl DrawnRoute {
    /// Length of the route in m.
    pub fn length(&self) -> f64 {
        path_length(&self.points)
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub enum DrawingState {
    #[default]
    Idle,
    Drawing(DrawingSession),
}

/// The outcome of finishing a route.
#[derive(Clone, Debug, PartialEq)]
pub struct Dispatch {
    pub route_id: String,
    pub vehicle: EmergencyVehicle,
}

/// Owns the in-progress session and the finished routes.
#[derive(Clone, Debug)]
pub struct RouteDrawer {
    state: DrawingState,
    selected: VehicleType,
    routes: Vec<DrawnRoute>,
    /// Time until a dispatched vehicle is expected to arrive.
    eta: Duration,
}

impl Default for RouteDrawer {
    fn default() -> Self {
        Self::new(Duration::minutes(10))
    }
}

impl RouteDrawer {
    pub fn new(eta: Duration) -> Self {
        Self {
            state: DrawingState::Idle,
            selected: VehicleType::Ambulance,
            routes: vec![],
            eta,
        }
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawingState::Drawing(_))
    }

    pub fn session(&self) -> Option<&DrawingSession> {
        match &self.state {
            DrawingState::Drawing(session) => Some(session),
            DrawingState::Idle => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut DrawingSession> {
        match &mut self.state {
            DrawingState::Drawing(session) => Some(session),
            DrawingState::Idle => None,
        }
    }

    /// The vehicle type the next session will be drawn for.
    pub fn selected(&self) -> VehicleType {
        self.selected
    }

    /// Picks the vehicle type for the next session. A session already
    /// in progress keeps the type it was started with.
    pub fn select(&mut self, kind: VehicleType) {
        self.selected = kind;
    }

    pub fn routes(&self) -> &[DrawnRoute] {
        &self.routes
    }

    /// Starts a new session, discarding any session already in progress.
    /// Returns the stale polyline, if there was one.
    pub fn start(&mut self) -> Option<OverlayId> {
        let stale = self.take_session().and_then(|session| session.polyline);
        log::debug!("drawing {} route", self.selected);
        self.state = DrawingState::Drawing(DrawingSession::new(self.selected));
        stale
    }

    /// Appends a point to the session. Ignored while idle.
    pub fn add_point(&mut self, point: LatLng) -> bool {
        match &mut self.state {
            DrawingState::Drawing(session) => {
                session.points.push(point);
                log::trace!("route point {} at ({}, {})", session.points.len(), point.lat, point.lng);
                true
            }
            DrawingState::Idle => false,
        }
    }

    /// Whether the session has enough points to be finished.
    pub fn can_finish(&self) -> bool {
        self.session()
            .map_or(false, |session| session.points.len() >= MIN_ROUTE_POINTS)
    }

    /// Finishes the session, recording the route and dispatching a vehicle along it.
    /// Does nothing and returns `None` unless [Self::can_finish] holds.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Option<Dispatch> {
        if !self.can_finish() {
            return None;
        }
        let session = self.take_session()?;
        let (first, last) = match (session.points.first(), session.points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return None,
        };

        let stamp = now.timestamp_millis();
        let route_id = self.unique_route_id(stamp);
        let vehicle = EmergencyVehicle {
            id: format!("{}-{}", session.kind, route_id.trim_start_matches("route-")),
            kind: session.kind,
            position: first,
            destination: last,
            status: VehicleStatus::Dispatched,
            priority: Priority::High,
            estimated_arrival: now + self.eta,
        };

        let route = DrawnRoute {
            id: route_id.clone(),
            kind: session.kind,
            points: session.points,
            polyline: session.polyline,
        };
        log::debug!(
            "finished {} ({} points, {:.0} m), dispatched {}",
            route.id,
            route.points.len(),
            route.length(),
            vehicle.id
        );
        self.routes.push(route);

        Some(Dispatch { route_id, vehicle })
    }

    /// Abandons the session. Returns its polyline, if one was drawn.
    pub fn cancel(&mut self) -> Option<OverlayId> {
        let session = self.take_session()?;
        log::debug!("cancelled route with {} points", session.points.len());
        session.polyline
    }

    /// Removes one finished route, returning it.
    pub fn remove_route(&mut self, id: &str) -> Option<DrawnRoute> {
        let idx = self.routes.iter().position(|route| route.id == id)?;
        Some(self.routes.remove(idx))
    }

    /// Removes every finished route. Returns their polylines.
    ///
    /// Vehicles dispatched along the routes are not recalled.
    pub fn clear_all(&mut self) -> Vec<OverlayId> {
        log::debug!("clearing {} routes", self.routes.len());
        self.routes
            .drain(..)
            .filter_map(|route| route.polyline)
            .collect()
    }

    fn take_session(&mut self) -> Option<DrawingSession> {
        match std::mem::take(&mut self.state) {
            DrawingState::Drawing(session) => Some(session),
            DrawingState::Idle => None,
        }
    }

    /// Route IDs are derived from the time; disambiguate routes finished in the same millisecond.
    fn unique_route_id(&self, stamp: i64) -> String {
        let taken = |id: &str| self.routes.iter().any(|route| route.id == id);
        let base = format!("route-{}", stamp);
        if !taken(&base) {
            return base;
        }
        let mut n = 2;
        loop {
            let id = format!("{}-{}", base, n);
            if !taken(&id) {
                return id;
            }
            n += 1;
        }
    }
}
