//! The boundary with the external mapping service.
//!
//! A [MapService] is asked once for a [MapSurface] using the user's credential.
//! The [MapAdapter] owns the resulting surface, translates entity state into
//! markers, polylines and a heatmap, and only forwards clicks while a route
//! is being drawn. Until the service loads the adapter is not ready and makes
//! no drawing calls at all.

use crate::config::MapConfig;
use crate::error::LoadError;
use crate::geo::LatLng;
use crate::model::{
    EmergencyVehicle, Severity, TrafficDensity, TrafficIncident, TrafficLight, DEFAULT_COLOR,
};
use crate::route::DrawingSession;
use crate::util::Tracked;
use serde::Serialize;
use slotmap::new_key_type;

pub use recording::{RecordedOverlay, RecordingService, RecordingSurface};

mod recording;

new_key_type! {
    /// Handle to something drawn on a [MapSurface].
    pub struct OverlayId;
}

/// The symbol used for a marker.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum MarkerIcon {
    Circle { fill: &'static str, scale: f64 },
    Arrow { fill: &'static str, scale: f64 },
    Pin { fill: &'static str },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub position: LatLng,
    pub title: String,
    pub icon: MarkerIcon,
    /// Text shown when the marker is clicked.
    pub info: Option<String>,
    pub bounce: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PolylineStyle {
    pub color: &'static str,
    pub opacity: f64,
    pub weight: f64,
    /// Whether to repeat direction arrows along the line.
    pub arrows: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HeatmapPoint {
    pub position: LatLng,
    pub weight: f64,
}

/// A loaded map that overlays can be drawn on.
pub trait MapSurface {
    fn add_marker(&mut self, marker: Marker) -> OverlayId;
    fn add_polyline(&mut self, path: &[LatLng], style: PolylineStyle) -> OverlayId;
    fn set_polyline_path(&mut self, id: OverlayId, path: &[LatLng]);
    fn add_heatmap(&mut self, points: &[HeatmapPoint], radius: f64, opacity: f64) -> OverlayId;
    /// Removes an overlay. Unknown handles are ignored.
    fn remove(&mut self, id: OverlayId);
}

/// A mapping provider which can be initialised with a credential.
pub trait MapService {
    type Surface: MapSurface;

    fn initialize(&mut self, credential: &str, view: &MapConfig) -> Result<Self::Surface, LoadError>;
}

/// Overlays belonging to one collection, and the revision they were drawn from.
#[derive(Default)]
struct Layer {
    overlays: Vec<OverlayId>,
    revision: Option<u64>,
}

impl Layer {
    fn is_stale(&self, revision: u64) -> bool {
        self.revision != Some(revision)
    }

    fn clear(&mut self, surface: &mut impl MapSurface) {
        for id in self.overlays.drain(..) {
            surface.remove(id);
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum LayerKind {
    Lights,
    Vehicles,
    Density,
    Incidents,
}

#[derive(Default)]
struct Layers {
    lights: Layer,
    vehicles: Layer,
    density: Layer,
    incidents: Layer,
}

impl Layers {
    fn get_mut(&mut self, kind: LayerKind) -> &mut Layer {
        match kind {
            LayerKind::Lights => &mut self.lights,
            LayerKind::Vehicles => &mut self.vehicles,
            LayerKind::Density => &mut self.density,
            LayerKind::Incidents => &mut self.incidents,
        }
    }
}

/// Renders entity state onto a [MapSurface] once one is available.
pub struct MapAdapter<S> {
    surface: Option<S>,
    view: MapConfig,
    layers: Layers,
    load_error: Option<LoadError>,
}

impl<S: MapSurface> MapAdapter<S> {
    /// Creates an adapter which is not ready yet.
    pub fn new(view: MapConfig) -> Self {
        Self {
            surface: None,
            view,
            layers: Layers::default(),
            load_error: None,
        }
    }

    /// Initialises the external service. On failure the adapter stays not ready.
    pub fn load<M>(&mut self, service: &mut M, credential: &str) -> Result<(), LoadError>
    where
        M: MapService<Surface = S>,
    {
        if self.surface.is_some() {
            return Ok(());
        }
        match service.initialize(credential, &self.view) {
            Ok(surface) => {
                log::info!(
                    "map loaded at ({}, {}) zoom {}",
                    self.view.center.lat,
                    self.view.center.lng,
                    self.view.zoom
                );
                self.surface = Some(surface);
                self.load_error = None;
                Ok(())
            }
            Err(err) => {
                log::warn!("map failed to load: {}", err);
                self.load_error = Some(err.clone());
                Err(err)
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.surface.is_some()
    }

    /// The most recent load failure, if the adapter is not ready because of one.
    pub fn load_error(&self) -> Option<&LoadError> {
        self.load_error.as_ref()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn view(&self) -> &MapConfig {
        &self.view
    }

    /// Filters a raw map click. Clicks are only passed on while drawing.
    pub fn forward_click(&self, drawing: bool, point: LatLng) -> Option<LatLng> {
        (self.is_ready() && drawing).then_some(point)
    }

    /// Redraws the lights if they changed since they were last drawn.
    pub fn sync_lights(&mut self, lights: &Tracked<TrafficLight>) -> bool {
        self.sync(LayerKind::Lights, lights, |light| {
            vec![Overlay::Marker(Marker {
                position: light.position,
                title: light.name.clone(),
                icon: MarkerIcon::Circle {
                    fill: light.status.color(),
                    scale: 12.0,
                },
                info: Some(light.info_text()),
                bounce: false,
            })]
        })
    }

    /// Redraws vehicle markers and their dispatch lines if they changed.
    pub fn sync_vehicles(&mut self, vehicles: &Tracked<EmergencyVehicle>) -> bool {
        self.sync(LayerKind::Vehicles, vehicles, |vehicle| {
            vec![
                Overlay::Marker(Marker {
                    position: vehicle.position,
                    title: vehicle.title(),
                    icon: MarkerIcon::Arrow {
                        fill: DEFAULT_COLOR,
                        scale: 8.0,
                    },
                    info: None,
                    bounce: true,
                }),
                Overlay::Polyline(
                    vec![vehicle.position, vehicle.destination],
                    PolylineStyle {
                        color: DEFAULT_COLOR,
                        opacity: 1.0,
                        weight: 4.0,
                        arrows: false,
                    },
                ),
            ]
        })
    }

    pub fn sync_incidents(&mut self, incidents: &Tracked<TrafficIncident>) -> bool {
        self.sync(LayerKind::Incidents, incidents, |incident| {
            vec![Overlay::Marker(Marker {
                position: incident.position,
                title: incident.description.clone(),
                icon: MarkerIcon::Pin {
                    fill: match incident.severity {
                        Severity::High => "#ef4444",
                        Severity::Medium => "#f59e0b",
                        Severity::Low => "#22c55e",
                    },
                },
                info: None,
                bounce: false,
            })]
        })
    }

    /// Redraws the density heatmap, weighted by vehicle count.
    pub fn sync_density(&mut self, density: &Tracked<TrafficDensity>) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        let layer = self.layers.get_mut(LayerKind::Density);
        if !layer.is_stale(density.revision()) {
            return false;
        }
        layer.clear(surface);
        let points = density
            .iter()
            .map(|sample| HeatmapPoint {
                position: sample.position,
                weight: sample.vehicle_count as f64,
            })
            .collect::<Vec<_>>();
        if !points.is_empty() {
            let id = surface.add_heatmap(&points, self.view.heatmap_radius, self.view.heatmap_opacity);
            layer.overlays.push(id);
        }
        layer.revision = Some(density.revision());
        true
    }

    /// Creates or extends the polyline for an in-progress route.
    pub fn draw_session(&mut self, session: &mut DrawingSession) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        match session.polyline() {
            Some(id) => surface.set_polyline_path(id, session.points()),
            None => {
                let id = surface.add_polyline(
                    session.points(),
                    PolylineStyle {
                        color: session.kind().color(),
                        opacity: 0.8,
                        weight: 4.0,
                        arrows: true,
                    },
                );
                session.attach_polyline(id);
            }
        }
    }

    /// Removes an overlay from the map, if the map is loaded.
    pub fn remove_overlay(&mut self, id: OverlayId) {
        if let Some(surface) = self.surface.as_mut() {
            surface.remove(id);
        }
    }

    fn sync<T>(&mut self, kind: LayerKind, items: &Tracked<T>, draw: impl Fn(&T) -> Vec<Overlay>) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        let layer = self.layers.get_mut(kind);
        if !layer.is_stale(items.revision()) {
            return false;
        }
        layer.clear(surface);
        for item in items {
            for overlay in draw(item) {
                let id = match overlay {
                    Overlay::Marker(marker) => surface.add_marker(marker),
                    Overlay::Polyline(path, style) => surface.add_polyline(&path, style),
                };
                layer.overlays.push(id);
            }
        }
        layer.revision = Some(items.revision());
        log::trace!("redrew {:?} layer ({} overlays)", kind, layer.overlays.len());
        true
    }
}

enum Overlay {
    Marker(Marker),
    Polyline(Vec<LatLng>, PolylineStyle),
}
