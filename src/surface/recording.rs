//! An in-memory map which records what has been drawn on it.

use super::{HeatmapPoint, MapService, MapSurface, Marker, OverlayId, PolylineStyle};
use crate::config::MapConfig;
use crate::error::LoadError;
use crate::geo::LatLng;
use serde::Serialize;
use serde_json::json;
use slotmap::SlotMap;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordedOverlay {
    Marker(Marker),
    Polyline {
        path: Vec<LatLng>,
        style: PolylineStyle,
    },
    Heatmap {
        points: Vec<HeatmapPoint>,
        radius: f64,
        opacity: f64,
    },
}

/// A [MapSurface] which keeps its overlays in memory.
#[derive(Default)]
pub struct RecordingSurface {
    view: MapConfig,
    overlays: SlotMap<OverlayId, RecordedOverlay>,
    calls: usize,
}

impl RecordingSurface {
    pub fn new(view: MapConfig) -> Self {
        Self {
            view,
            ..Default::default()
        }
    }

    pub fn view(&self) -> &MapConfig {
        &self.view
    }

    /// Number of drawing calls made against the surface.
    pub fn calls(&self) -> usize {
        self.calls
    }

    pub fn get(&self, id: OverlayId) -> Option<&RecordedOverlay> {
        self.overlays.get(id)
    }

    pub fn contains(&self, id: OverlayId) -> bool {
        self.overlays.contains_key(id)
    }

    pub fn overlays(&self) -> impl Iterator<Item = &RecordedOverlay> {
        self.overlays.values()
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.overlays.values().filter_map(|overlay| match overlay {
            RecordedOverlay::Marker(marker) => Some(marker),
            _ => None,
        })
    }

    pub fn polylines(&self) -> impl Iterator<Item = (&[LatLng], &PolylineStyle)> {
        self.overlays.values().filter_map(|overlay| match overlay {
            RecordedOverlay::Polyline { path, style } => Some((path.as_slice(), style)),
            _ => None,
        })
    }

    pub fn heatmaps(&self) -> impl Iterator<Item = &[HeatmapPoint]> {
        self.overlays.values().filter_map(|overlay| match overlay {
            RecordedOverlay::Heatmap { points, .. } => Some(points.as_slice()),
            _ => None,
        })
    }

    /// Dumps the current contents of the map as JSON.
    pub fn snapshot(&self) -> serde_json::Value {
        json!({
            "center": [self.view.center.lat, self.view.center.lng],
            "zoom": self.view.zoom,
            "overlays": self.overlays.values().collect::<Vec<_>>(),
        })
    }
}

impl MapSurface for RecordingSurface {
    fn add_marker(&mut self, marker: Marker) -> OverlayId {
        self.calls += 1;
        self.overlays.insert(RecordedOverlay::Marker(marker))
    }

    fn add_polyline(&mut self, path: &[LatLng], style: PolylineStyle) -> OverlayId {
        self.calls += 1;
        self.overlays.insert(RecordedOverlay::Polyline {
            path: path.to_vec(),
            style,
        })
    }

    fn set_polyline_path(&mut self, id: OverlayId, new_path: &[LatLng]) {
        self.calls += 1;
        if let Some(RecordedOverlay::Polyline { path, .. }) = self.overlays.get_mut(id) {
            *path = new_path.to_vec();
        }
    }

    fn add_heatmap(&mut self, points: &[HeatmapPoint], radius: f64, opacity: f64) -> OverlayId {
        self.calls += 1;
        self.overlays.insert(RecordedOverlay::Heatmap {
            points: points.to_vec(),
            radius,
            opacity,
        })
    }

    fn remove(&mut self, id: OverlayId) {
        self.calls += 1;
        self.overlays.remove(id);
    }
}

/// A [MapService] producing [RecordingSurface]s.
///
/// Blank credentials are rejected, as is any credential listed with
/// [RecordingService::reject]. A service built with [RecordingService::offline]
/// fails every load.
#[derive(Default)]
pub struct RecordingService {
    rejected: Vec<String>,
    offline: bool,
    attempts: usize,
}

impl RecordingService {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Default::default()
        }
    }

    pub fn reject(mut self, credential: impl Into<String>) -> Self {
        self.rejected.push(credential.into());
        self
    }

    /// Number of times [MapService::initialize] has been called.
    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl MapService for RecordingService {
    type Surface = RecordingSurface;

    fn initialize(&mut self, credential: &str, view: &MapConfig) -> Result<RecordingSurface, LoadError> {
        self.attempts += 1;
        if self.offline {
            return Err(LoadError::Network("service unreachable".into()));
        }
        if credential.trim().is_empty() || self.rejected.iter().any(|c| c == credential) {
            return Err(LoadError::InvalidCredential(credential.to_string()));
        }
        Ok(RecordingSurface::new(view.clone()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::surface::MarkerIcon;

    #[test]
    fn removed_overlays_disappear() {
        let mut surface = RecordingSurface::default();
        let style = PolylineStyle {
            color: "#000000",
            opacity: 1.0,
            weight: 1.0,
            arrows: false,
        };
        let line = surface.add_polyline(&[LatLng::new(1.0, 2.0)], style);
        let marker = surface.add_marker(Marker {
            position: LatLng::new(1.0, 2.0),
            title: "x".into(),
            icon: MarkerIcon::Pin { fill: "#000000" },
            info: None,
            bounce: false,
        });
        surface.set_polyline_path(line, &[LatLng::new(1.0, 2.0), LatLng::new(3.0, 4.0)]);
        assert_eq!(surface.polylines().next().unwrap().0.len(), 2);

        surface.remove(line);
        surface.remove(line);
        assert!(!surface.contains(line));
        assert!(surface.contains(marker));
        assert_eq!(surface.calls(), 5);
    }

    #[test]
    fn service_rejects_listed_credentials() {
        let view = MapConfig::default();
        let mut service = RecordingService::new().reject("bad-key");
        assert!(service.initialize("good-key", &view).is_ok());
        assert_eq!(
            service.initialize("bad-key", &view).err(),
            Some(LoadError::InvalidCredential("bad-key".into()))
        );
        assert!(RecordingService::offline().initialize("good-key", &view).is_err());
        assert_eq!(service.attempts(), 2);
    }
}
