use crate::model::TrafficLight;
use chrono::{DateTime, Utc};

impl TrafficLight {
    /// Advances the light to its next status, red → yellow → green → red.
    pub fn toggle(&mut self, now: DateTime<Utc>) {
        self.status = self.status.next();
        self.last_updated = now;
    }

    /// Returns a copy of the light advanced to its next status.
    pub fn toggled(&self, now: DateTime<Utc>) -> Self {
        let mut light = self.clone();
        light.toggle(now);
        light
    }
}

/// Toggles the light with the given ID, leaving all others alone.
/// Returns `false` if no such light exists.
pub fn toggle_light(lights: &mut [TrafficLight], id: &str, now: DateTime<Utc>) -> bool {
    match lights.iter_mut().find(|light| light.id == id) {
        Some(light) => {
            light.toggle(now);
            log::debug!("{} ({}) is now {}", light.id, light.name, light.status);
            true
        }
        None => {
            log::trace!("toggle ignored for unknown light {}", id);
            false
        }
    }
}
