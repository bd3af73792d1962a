//! Built-in sample data for Kottakal.

use crate::geo::LatLng;
use crate::model::{
    DensityLevel, EmergencyVehicle, IncidentType, LightStatus, LightTiming, Priority, Severity,
    TrafficDensity, TrafficIncident, TrafficLight, VehicleStatus, VehicleType,
};
use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;

struct Junction {
    id: &'static str,
    name: &'static str,
    position: LatLng,
    status: LightStatus,
    timing: LightTiming,
}

static JUNCTIONS: Lazy<Vec<Junction>> = Lazy::new(|| {
    use LightStatus::*;
    let junction = |id, name, lat, lng, status, (red, yellow, green): (u32, u32, u32)| Junction {
        id,
        name,
        position: LatLng::new(lat, lng),
        status,
        timing: LightTiming::fixed(red, yellow, green),
    };
    vec![
        junction("tl-001", "Arya Vaidya Sala Main Junction", 11.0510, 75.9949, Green, (60, 10, 90)),
        junction("tl-002", "NH-66 Kottakal Junction", 11.0495, 75.9932, Red, (75, 10, 105)),
        junction("tl-003", "Hospital Road-Market Junction", 11.0525, 75.9965, Yellow, (50, 8, 85)),
        junction("tl-004", "Malappuram-Tirur Road Junction", 11.0535, 75.9920, Green, (65, 10, 95)),
        junction("tl-005", "Railway Station Junction", 11.0480, 75.9955, Red, (55, 8, 80)),
        junction("tl-006", "Bus Stand Circle", 11.0515, 75.9975, Green, (45, 8, 75)),
        junction("tl-007", "College Road Junction", 11.0545, 75.9940, Yellow, (40, 8, 70)),
        junction("tl-008", "Industrial Area Junction", 11.0465, 75.9920, Green, (60, 10, 90)),
        junction("tl-009", "Bypass Road Entry", 11.0490, 75.9890, Red, (70, 10, 100)),
        junction("tl-010", "Police Station Junction", 11.0520, 75.9930, Green, (50, 8, 80)),
    ]
});

/// The signalised junctions of the town.
pub fn traffic_lights(now: DateTime<Utc>) -> Vec<TrafficLight> {
    JUNCTIONS
        .iter()
        .map(|j| TrafficLight {
            id: j.id.to_string(),
            name: j.name.to_string(),
            position: j.position,
            status: j.status,
            timing: j.timing,
            last_updated: now,
        })
        .collect()
}

pub fn emergency_vehicles(now: DateTime<Utc>) -> Vec<EmergencyVehicle> {
    vec![EmergencyVehicle {
        id: "amb-001".to_string(),
        kind: VehicleType::Ambulance,
        position: LatLng::new(11.0530, 75.9929),
        destination: LatLng::new(11.0495, 75.9965),
        status: VehicleStatus::EnRoute,
        priority: Priority::High,
        estimated_arrival: now + Duration::minutes(8),
    }]
}

pub fn traffic_density(now: DateTime<Utc>) -> Vec<TrafficDensity> {
    vec![
        TrafficDensity {
            position: LatLng::new(11.0510, 75.9949),
            density: DensityLevel::High,
            vehicle_count: 45,
            average_speed: 15.0,
            timestamp: now,
        },
        TrafficDensity {
            position: LatLng::new(11.0520, 75.9939),
            density: DensityLevel::Medium,
            vehicle_count: 28,
            average_speed: 25.0,
            timestamp: now,
        },
    ]
}

pub fn incidents(now: DateTime<Utc>) -> Vec<TrafficIncident> {
    vec![
        TrafficIncident {
            id: "inc-001".to_string(),
            kind: IncidentType::Accident,
            position: LatLng::new(11.0498, 75.9938),
            severity: Severity::High,
            description: "Two-vehicle collision on NH-66".to_string(),
            reported_at: now - Duration::minutes(12),
            estimated_clearance: Some(now + Duration::minutes(25)),
        },
        TrafficIncident {
            id: "inc-002".to_string(),
            kind: IncidentType::Accident,
            position: LatLng::new(11.0528, 75.9968),
            severity: Severity::Medium,
            description: "Minor collision near the market".to_string(),
            reported_at: now - Duration::minutes(5),
            estimated_clearance: Some(now + Duration::minutes(15)),
        },
        TrafficIncident {
            id: "inc-003".to_string(),
            kind: IncidentType::Construction,
            position: LatLng::new(11.0487, 75.9895),
            severity: Severity::Low,
            description: "Resurfacing at the bypass entry".to_string(),
            reported_at: now - Duration::hours(6),
            estimated_clearance: None,
        },
    ]
}
