//! The entities shown on the map and dashboard.

use crate::geo::LatLng;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Colour used for anything without a more specific one.
pub const DEFAULT_COLOR: &str = "#ef4444";

/// The state of a junction's signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightStatus {
    Red,
    Yellow,
    Green,
}

impl LightStatus {
    /// The status that follows this one in the red → yellow → green cycle.
    pub fn next(self) -> Self {
        use LightStatus::*;
        match self {
            Red => Yellow,
            Yellow => Green,
            Green => Red,
        }
    }

    /// Marker fill colour.
    pub fn color(self) -> &'static str {
        match self {
            LightStatus::Red => "#ef4444",
            LightStatus::Yellow => "#f59e0b",
            LightStatus::Green => "#22c55e",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LightStatus::Red => "red",
            LightStatus::Yellow => "yellow",
            LightStatus::Green => "green",
        }
    }
}

impl fmt::Display for LightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase durations of a signal, in s. Every phase is at least one second long.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTiming")]
pub struct LightTiming {
    red: u32,
    yellow: u32,
    green: u32,
}

#[derive(Deserialize)]
struct RawTiming {
    red: u32,
    yellow: u32,
    green: u32,
}

/// Error returned when a signal phase has zero length.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("light phases must be positive, got R:{0}s Y:{1}s G:{2}s")]
pub struct InvalidTiming(pub u32, pub u32, pub u32);

impl TryFrom<RawTiming> for LightTiming {
    type Error = InvalidTiming;

    fn try_from(raw: RawTiming) -> Result<Self, Self::Error> {
        LightTiming::new(raw.red, raw.yellow, raw.green)
            .ok_or(InvalidTiming(raw.red, raw.yellow, raw.green))
    }
}

impl LightTiming {
    /// Creates a timing triple, or `None` if any phase has zero length.
    pub fn new(red: u32, yellow: u32, green: u32) -> Option<Self> {
        (red > 0 && yellow > 0 && green > 0).then_some(Self { red, yellow, green })
    }

    /// Builds a timing for built-in data. Panics if any phase has zero length.
    pub(crate) const fn fixed(red: u32, yellow: u32, green: u32) -> Self {
        assert!(red > 0 && yellow > 0 && green > 0, "zero-length light phase");
        Self { red, yellow, green }
    }

    pub fn red(&self) -> u32 {
        self.red
    }

    pub fn yellow(&self) -> u32 {
        self.yellow
    }

    pub fn green(&self) -> u32 {
        self.green
    }

    /// Gets the duration of the given phase in s.
    pub fn duration(&self, status: LightStatus) -> u32 {
        match status {
            LightStatus::Red => self.red,
            LightStatus::Yellow => self.yellow,
            LightStatus::Green => self.green,
        }
    }
}

/// A signalised junction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficLight {
    pub id: String,
    pub name: String,
    pub position: LatLng,
    pub status: LightStatus,
    pub timing: LightTiming,
    pub last_updated: DateTime<Utc>,
}

impl TrafficLight {
    /// Gets the duration of the current phase in s.
    pub fn current_duration(&self) -> u32 {
        self.timing.duration(self.status)
    }

    /// Text shown when the junction's marker is opened.
    pub fn info_text(&self) -> String {
        format!(
            "{}\nStatus: {}\nTiming: R:{}s Y:{}s G:{}s",
            self.name,
            self.status.as_str().to_uppercase(),
            self.timing.red(),
            self.timing.yellow(),
            self.timing.green()
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Ambulance,
    Fire,
    Police,
}

impl VehicleType {
    pub const ALL: [VehicleType; 3] = [VehicleType::Ambulance, VehicleType::Fire, VehicleType::Police];

    /// Stroke colour of routes drawn for this kind of vehicle.
    pub fn color(self) -> &'static str {
        match self {
            VehicleType::Ambulance => "#ef4444",
            VehicleType::Fire => "#f97316",
            VehicleType::Police => "#3b82f6",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleType::Ambulance => "ambulance",
            VehicleType::Fire => "fire",
            VehicleType::Police => "police",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown vehicle type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown vehicle type `{0}`")]
pub struct UnknownVehicleType(pub String);

impl FromStr for VehicleType {
    type Err = UnknownVehicleType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ambulance" => Ok(VehicleType::Ambulance),
            "fire" => Ok(VehicleType::Fire),
            "police" => Ok(VehicleType::Police),
            other => Err(UnknownVehicleType(other.to_string())),
        }
    }
}

/// Route colour for a vehicle type given by name, falling back to red.
pub fn route_color(type_name: &str) -> &'static str {
    type_name
        .parse::<VehicleType>()
        .map(VehicleType::color)
        .unwrap_or(DEFAULT_COLOR)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Dispatched,
    EnRoute,
    Arrived,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// An emergency vehicle heading to an incident.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyVehicle {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: VehicleType,
    pub position: LatLng,
    pub destination: LatLng,
    pub status: VehicleStatus,
    pub priority: Priority,
    pub estimated_arrival: DateTime<Utc>,
}

impl EmergencyVehicle {
    /// Marker title, e.g. `AMBULANCE - amb-001`.
    pub fn title(&self) -> String {
        format!("{} - {}", self.kind.as_str().to_uppercase(), self.id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityLevel {
    Low,
    Medium,
    High,
}

/// A sampled traffic density reading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficDensity {
    pub position: LatLng,
    pub density: DensityLevel,
    pub vehicle_count: u32,
    /// Average speed in km/h.
    pub average_speed: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentType {
    Accident,
    Roadblock,
    Construction,
    Weather,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A reported disruption on the road network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficIncident {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: IncidentType,
    pub position: LatLng,
    pub severity: Severity,
    pub description: String,
    pub reported_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_clearance: Option<DateTime<Utc>>,
}

impl TrafficIncident {
    /// Whether the incident is still expected to be blocking at `now`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.estimated_clearance.map_or(true, |at| at > now)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_cycle_has_period_three() {
        for status in [LightStatus::Red, LightStatus::Yellow, LightStatus::Green] {
            assert_ne!(status.next(), status);
            assert_eq!(status.next().next().next(), status);
        }
        assert_eq!(LightStatus::Red.next(), LightStatus::Yellow);
        assert_eq!(LightStatus::Yellow.next(), LightStatus::Green);
        assert_eq!(LightStatus::Green.next(), LightStatus::Red);
    }

    #[test]
    fn timing_rejects_zero_phases() {
        assert!(LightTiming::new(60, 10, 90).is_some());
        assert!(LightTiming::new(0, 10, 90).is_none());
        assert!(LightTiming::new(60, 0, 90).is_none());
        assert!(LightTiming::new(60, 10, 0).is_none());
    }

    #[test]
    fn timing_deserialization_checks_phases() {
        let timing: LightTiming = serde_json::from_str(r#"{ "red": 60, "yellow": 10, "green": 90 }"#).unwrap();
        assert_eq!((timing.red(), timing.yellow(), timing.green()), (60, 10, 90));
        assert_eq!(serde_json::to_value(timing).unwrap()["green"], 90);

        let err = serde_json::from_str::<LightTiming>(r#"{ "red": 60, "yellow": 0, "green": 90 }"#).unwrap_err();
        assert!(err.to_string().contains("must be positive"));
    }

    #[test]
    fn route_colors() {
        assert_eq!(route_color("ambulance"), "#ef4444");
        assert_eq!(route_color("fire"), "#f97316");
        assert_eq!(route_color("police"), "#3b82f6");
        assert_eq!(route_color("hovercraft"), DEFAULT_COLOR);
    }

    #[test]
    fn vehicle_serializes_with_wire_names() {
        let now = Utc::now();
        let vehicle = EmergencyVehicle {
            id: "amb-001".into(),
            kind: VehicleType::Ambulance,
            position: LatLng::new(11.053, 75.9929),
            destination: LatLng::new(11.0495, 75.9965),
            status: VehicleStatus::EnRoute,
            priority: Priority::High,
            estimated_arrival: now,
        };
        let json = serde_json::to_value(&vehicle).unwrap();
        assert_eq!(json["type"], "ambulance");
        assert_eq!(json["status"], "en_route");
        assert_eq!(json["priority"], "high");
        assert!(json.get("estimatedArrival").is_some());
        assert_eq!(vehicle.title(), "AMBULANCE - amb-001");
    }
}
