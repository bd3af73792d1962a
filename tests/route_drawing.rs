//! Tests that drive route drawing through the map tab.

use chrono::{Duration, Utc};
use traffic_dashboard::surface::{RecordingService, RecordingSurface};
use traffic_dashboard::{LatLng, MapConfig, TrafficMap, VehicleStatus, VehicleType};

fn loaded_map() -> TrafficMap<RecordingSurface> {
    let mut map = TrafficMap::with_samples(MapConfig::default(), Duration::minutes(10), Utc::now());
    map.load(&mut RecordingService::new(), "key").unwrap();
    map
}

fn polyline_count(map: &TrafficMap<RecordingSurface>) -> usize {
    map.adapter().surface().unwrap().polylines().count()
}

/// Two clicks and finish dispatch one vehicle between them.
#[test]
fn two_point_route_dispatches_vehicle() {
    let now = Utc::now();
    let mut map = loaded_map();
    let vehicles_before = map.vehicles().len();

    map.start_drawing();
    assert!(map.click(LatLng::new(11.05, 75.99)));
    assert!(map.click(LatLng::new(11.06, 76.00)));
    let route_id = map.finish_drawing(now).unwrap();

    assert_eq!(map.routes().len(), 1);
    assert_eq!(map.routes()[0].id, route_id);
    assert_eq!(map.routes()[0].points.len(), 2);
    assert_eq!(map.vehicles().len(), vehicles_before + 1);

    let vehicle = map.vehicles().last().unwrap();
    assert_eq!(vehicle.position, LatLng::new(11.05, 75.99));
    assert_eq!(vehicle.destination, LatLng::new(11.06, 76.00));
    assert_eq!(vehicle.status, VehicleStatus::Dispatched);
    assert!(!map.drawer().is_drawing());
}

/// Long routes keep every point and dispatch between the ends.
#[test]
fn long_route_keeps_all_points() {
    let mut map = loaded_map();
    map.start_drawing();
    let points = (0..50)
        .map(|i| LatLng::new(11.04 + i as f64 * 0.0005, 75.99 + (i % 3) as f64 * 0.0002))
        .collect::<Vec<_>>();
    for p in &points {
        map.click(*p);
    }
    map.finish_drawing(Utc::now()).unwrap();

    assert_eq!(map.routes()[0].points, points);
    let vehicle = map.vehicles().last().unwrap();
    assert_eq!(vehicle.position, points[0]);
    assert_eq!(vehicle.destination, points[49]);
}

/// Clicks outside drawing mode are not forwarded.
#[test]
fn clicks_ignored_while_idle() {
    let mut map = loaded_map();
    let polylines = polyline_count(&map);
    assert!(!map.click(LatLng::new(11.05, 75.99)));
    assert_eq!(polyline_count(&map), polylines);
    assert!(map.routes().is_empty());
}

/// The in-progress polyline follows the clicks in the vehicle type's colour.
#[test]
fn in_progress_polyline_tracks_clicks() {
    let mut map = loaded_map();
    map.select_vehicle_type(VehicleType::Police);
    map.start_drawing();
    map.click(LatLng::new(11.05, 75.99));
    map.click(LatLng::new(11.051, 75.991));
    map.click(LatLng::new(11.052, 75.992));

    let session = map.drawer().session().unwrap();
    let id = session.polyline().unwrap();
    let surface = map.adapter().surface().unwrap();
    match surface.get(id).unwrap() {
        traffic_dashboard::surface::RecordedOverlay::Polyline { path, style } => {
            assert_eq!(path.len(), 3);
            assert_eq!(style.color, "#3b82f6");
            assert!(style.arrows);
        }
        other => panic!("expected polyline, got {:?}", other),
    }
}

/// Finishing with fewer than two points changes nothing.
#[test]
fn finish_too_early_is_a_no_op() {
    let mut map = loaded_map();
    let vehicles = map.vehicles().len();

    map.start_drawing();
    assert!(!map.can_finish_drawing());
    assert_eq!(map.finish_drawing(Utc::now()), None);

    map.click(LatLng::new(11.05, 75.99));
    assert!(!map.can_finish_drawing());
    assert_eq!(map.finish_drawing(Utc::now()), None);

    assert!(map.drawer().is_drawing());
    assert_eq!(map.drawer().session().unwrap().points().len(), 1);
    assert!(map.routes().is_empty());
    assert_eq!(map.vehicles().len(), vehicles);
}

/// Cancelling removes the in-progress polyline and creates nothing.
#[test]
fn cancel_removes_polyline() {
    let mut map = loaded_map();
    let vehicles = map.vehicles().len();
    let polylines = polyline_count(&map);

    map.start_drawing();
    for i in 0..4 {
        map.click(LatLng::new(11.05 + i as f64 * 0.001, 75.99));
    }
    assert_eq!(polyline_count(&map), polylines + 1);

    map.cancel_drawing();
    assert_eq!(polyline_count(&map), polylines);
    assert!(map.routes().is_empty());
    assert_eq!(map.vehicles().len(), vehicles);
    assert!(!map.drawer().is_drawing());
}

/// Restarting discards the stale polyline.
#[test]
fn restart_removes_stale_polyline() {
    let mut map = loaded_map();
    map.start_drawing();
    map.click(LatLng::new(11.05, 75.99));
    let stale = map.drawer().session().unwrap().polyline().unwrap();

    map.start_drawing();
    assert!(!map.adapter().surface().unwrap().contains(stale));
    assert!(map.drawer().session().unwrap().points().is_empty());
}

/// Clearing routes removes their polylines but keeps dispatched vehicles and lights.
#[test]
fn clear_routes_keeps_vehicles() {
    let now = Utc::now();
    let mut map = loaded_map();
    let mut route_lines = vec![];
    for i in 0..3 {
        map.start_drawing();
        map.click(LatLng::new(11.05, 75.99 + i as f64 * 0.001));
        map.click(LatLng::new(11.06, 76.00));
        route_lines.push(map.drawer().session().unwrap().polyline().unwrap());
        map.finish_drawing(now + Duration::milliseconds(i)).unwrap();
    }
    let lights = map.lights().to_vec();
    let vehicles = map.vehicles().to_vec();
    assert_eq!(map.routes().len(), 3);

    map.clear_routes();

    assert!(map.routes().is_empty());
    assert_eq!(map.lights(), lights.as_slice());
    assert_eq!(map.vehicles(), vehicles.as_slice());
    let surface = map.adapter().surface().unwrap();
    assert!(route_lines.iter().all(|id| !surface.contains(*id)));
}

/// A single route can be removed on its own.
#[test]
fn remove_one_route() {
    let mut map = loaded_map();
    let mut ids = vec![];
    for i in 0..2 {
        map.start_drawing();
        map.click(LatLng::new(11.05, 75.99));
        map.click(LatLng::new(11.06, 76.00));
        ids.push(map.finish_drawing(Utc::now() + Duration::seconds(i)).unwrap());
    }
    let line = map.routes()[0].polyline.unwrap();

    assert!(map.remove_route(&ids[0]));
    assert!(!map.remove_route(&ids[0]));
    assert_eq!(map.routes().len(), 1);
    assert_eq!(map.routes()[0].id, ids[1]);
    assert!(!map.adapter().surface().unwrap().contains(line));
}
