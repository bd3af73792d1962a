pub use app::{App, Tab};
pub use config::{Config, MapConfig};
pub use dashboard::{Congestion, Dashboard, DashboardStats};
pub use error::{AppError, ConfigError, GateError, LoadError, ScheduleError, StoreError};
pub use gate::ApiKeyGate;
pub use geo::LatLng;
pub use light::toggle_light;
pub use map::TrafficMap;
pub use model::{
    EmergencyVehicle, InvalidTiming, LightStatus, LightTiming, Priority, TrafficDensity, TrafficIncident,
    TrafficLight, VehicleStatus, VehicleType,
};
pub use route::{DrawingSession, DrawingState, DrawnRoute, RouteDrawer};
pub use scheduler::{Scheduler, TaskId};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use surface::{MapAdapter, MapService, MapSurface, OverlayId};
pub use util::{Interval, Tracked};

mod app;
mod config;
mod dashboard;
mod error;
mod gate;
pub mod geo;
mod light;
mod map;
pub mod model;
pub mod route;
pub mod samples;
mod scheduler;
mod store;
pub mod surface;
mod util;
