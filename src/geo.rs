//! Geographic coordinates.

use cgmath::{Angle, Deg, Rad};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Mean radius of the earth in m.
const EARTH_RADIUS: f64 = 6_371_008.8;

/// A position in decimal degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to another position in m.
    pub fn distance(&self, other: LatLng) -> f64 {
        let phi1 = Rad::from(Deg(self.lat));
        let phi2 = Rad::from(Deg(other.lat));
        let dphi = Rad::from(Deg(other.lat - self.lat));
        let dlambda = Rad::from(Deg(other.lng - self.lng));

        let a = (dphi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// Length of a polyline through `points` in m.
pub fn path_length(points: &[LatLng]) -> f64 {
    points
        .iter()
        .tuple_windows()
        .map(|(a, b)| a.distance(*b))
        .sum()
}
