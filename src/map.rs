//! The map tab: entity collections, route drawing and their rendering.

use crate::config::MapConfig;
use crate::error::LoadError;
use crate::geo::LatLng;
use crate::light::toggle_light;
use crate::model::{EmergencyVehicle, TrafficDensity, TrafficIncident, TrafficLight, VehicleType};
use crate::route::{Dispatch, DrawnRoute, RouteDrawer};
use crate::samples;
use crate::surface::{MapAdapter, MapService, MapSurface};
use crate::util::Tracked;
use chrono::{DateTime, Duration, Utc};

/// Everything shown on the map, plus the surface it is drawn on.
pub struct TrafficMap<S> {
    lights: Tracked<TrafficLight>,
    vehicles: Tracked<EmergencyVehicle>,
    density: Tracked<TrafficDensity>,
    incidents: Tracked<TrafficIncident>,
    drawer: RouteDrawer,
    adapter: MapAdapter<S>,
}

impl<S: MapSurface> TrafficMap<S> {
    /// Creates an empty map.
    pub fn new(view: MapConfig, dispatch_eta: Duration) -> Self {
        Self {
            lights: Tracked::default(),
            vehicles: Tracked::default(),
            density: Tracked::default(),
            incidents: Tracked::default(),
            drawer: RouteDrawer::new(dispatch_eta),
            adapter: MapAdapter::new(view),
        }
    }

    /// Creates a map populated with the built-in sample data.
    pub fn with_samples(view: MapConfig, dispatch_eta: Duration, now: DateTime<Utc>) -> Self {
        let mut map = Self::new(view, dispatch_eta);
        map.lights = Tracked::new(samples::traffic_lights(now));
        map.vehicles = Tracked::new(samples::emergency_vehicles(now));
        map.density = Tracked::new(samples::traffic_density(now));
        map.incidents = Tracked::new(samples::incidents(now));
        map
    }

    /// Loads the map service and draws the current state.
    pub fn load<M>(&mut self, service: &mut M, credential: &str) -> Result<(), LoadError>
    where
        M: MapService<Surface = S>,
    {
        self.adapter.load(service, credential)?;
        self.render();
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.adapter.is_ready()
    }

    pub fn adapter(&self) -> &MapAdapter<S> {
        &self.adapter
    }

    pub fn lights(&self) -> &[TrafficLight] {
        self.lights.items()
    }

    pub fn vehicles(&self) -> &[EmergencyVehicle] {
        self.vehicles.items()
    }

    pub fn density(&self) -> &[TrafficDensity] {
        self.density.items()
    }

    pub fn incidents(&self) -> &[TrafficIncident] {
        self.incidents.items()
    }

    pub fn routes(&self) -> &[DrawnRoute] {
        self.drawer.routes()
    }

    pub fn drawer(&self) -> &RouteDrawer {
        &self.drawer
    }

    /// Redraws every layer whose collection changed since it was last drawn.
    pub fn render(&mut self) {
        self.adapter.sync_density(&self.density);
        self.adapter.sync_lights(&self.lights);
        self.adapter.sync_incidents(&self.incidents);
        self.adapter.sync_vehicles(&self.vehicles);
    }

    /// Advances a light through its cycle. Unknown IDs are ignored.
    pub fn toggle_light(&mut self, id: &str, now: DateTime<Utc>) -> bool {
        if !self.lights.iter().any(|light| light.id == id) {
            log::trace!("toggle ignored for unknown light {}", id);
            return false;
        }
        self.lights.modify(|lights| toggle_light(lights, id, now));
        self.render();
        true
    }

    pub fn select_vehicle_type(&mut self, kind: VehicleType) {
        self.drawer.select(kind);
    }

    pub fn start_drawing(&mut self) {
        if let Some(stale) = self.drawer.start() {
            self.adapter.remove_overlay(stale);
        }
    }

    /// Handles a click on the map. Returns whether it added a route point.
    pub fn click(&mut self, point: LatLng) -> bool {
        let Some(point) = self.adapter.forward_click(self.drawer.is_drawing(), point) else {
            return false;
        };
        if !self.drawer.add_point(point) {
            return false;
        }
        if let Some(session) = self.drawer.session_mut() {
            self.adapter.draw_session(session);
        }
        true
    }

    /// Whether the current session can be finished.
    pub fn can_finish_drawing(&self) -> bool {
        self.drawer.can_finish()
    }

    /// Finishes the route being drawn and dispatches a vehicle along it.
    /// Returns `None` and leaves the session as it was if it has fewer than two points.
    pub fn finish_drawing(&mut self, now: DateTime<Utc>) -> Option<String> {
        let Dispatch { route_id, vehicle } = self.drawer.finish(now)?;
        self.vehicles.push(vehicle);
        self.render();
        Some(route_id)
    }

    pub fn cancel_drawing(&mut self) {
        if let Some(polyline) = self.drawer.cancel() {
            self.adapter.remove_overlay(polyline);
        }
    }

    /// Removes a single route and its polyline.
    pub fn remove_route(&mut self, id: &str) -> bool {
        match self.drawer.remove_route(id) {
            Some(route) => {
                if let Some(polyline) = route.polyline {
                    self.adapter.remove_overlay(polyline);
                }
                true
            }
            None => false,
        }
    }

    /// Removes every route and its polyline.
    ///
    /// Vehicles dispatched along the routes stay on the map.
    pub fn clear_routes(&mut self) {
        for polyline in self.drawer.clear_all() {
            self.adapter.remove_overlay(polyline);
        }
    }
}
