use chrono::{Duration, Utc};
use std::error::Error;
use traffic_dashboard::surface::RecordingService;
use traffic_dashboard::{App, Config, FileStore, LatLng, Tab, VehicleType};

const USAGE: &str = "usage: traffic-dashboard [--config PATH] [--store PATH] [--key CREDENTIAL]";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config_path = None;
    let mut store_path = String::from("traffic-dashboard.json");
    let mut credential = std::env::var("TRAFFIC_DASHBOARD_KEY").ok();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_path = args.next(),
            "--store" => store_path = args.next().ok_or(USAGE)?,
            "--key" => credential = args.next(),
            _ => return Err(USAGE.into()),
        }
    }

    let config = match config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let mut now = Utc::now();
    let mut app = App::new(config, FileStore::new(store_path), RecordingService::new(), now)?;
    if app.is_locked() {
        let credential = credential.ok_or("no saved credential; pass --key or set TRAFFIC_DASHBOARD_KEY")?;
        app.submit_credential(&credential)?;
    }
    if !app.map().is_ready() {
        return Err("map service did not load".into());
    }

    // A short scripted session.
    let map = app.map_mut();
    map.toggle_light("tl-002", now);
    map.select_vehicle_type(VehicleType::Fire);
    map.start_drawing();
    for point in [(11.0535, 75.9920), (11.0525, 75.9935), (11.0510, 75.9949)] {
        map.click(LatLng::from(point));
    }
    if let Some(route_id) = map.finish_drawing(now) {
        log::info!("dispatched along {}", route_id);
    }

    app.activate_emergency(now)?;
    app.select_tab(Tab::Dashboard);
    for _ in 0..12 {
        now = now + Duration::seconds(5);
        app.tick(now);
    }

    let stats = app.dashboard().stats();
    log::info!(
        "after 60s: {} vehicles, {} km/h, {}% congestion ({:?}), emergency {}",
        stats.total_vehicles,
        stats.average_speed,
        stats.congestion_level,
        stats.congestion(),
        app.dashboard().emergency_mode()
    );

    if let Some(surface) = app.map().adapter().surface() {
        println!("{}", serde_json::to_string_pretty(&surface.snapshot())?);
    }
    Ok(())
}
