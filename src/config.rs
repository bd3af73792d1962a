//! Runtime configuration.

use crate::dashboard::DashboardStats;
use crate::error::ConfigError;
use crate::geo::LatLng;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name under which the map credential is stored.
pub const DEFAULT_STORAGE_KEY: &str = "googleMapsApiKey";

/// Upper bound for the timer settings, in s.
pub const MAX_TIMER_SECS: i64 = 24 * 60 * 60;

/// Upper bound for the dispatch ETA, in minutes.
pub const MAX_ETA_MINUTES: i64 = 24 * 60;

/// How the map is initially shown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center: LatLng,
    pub zoom: u8,
    /// Radius of each heatmap sample in px.
    pub heatmap_radius: f64,
    pub heatmap_opacity: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: LatLng::new(11.0510, 75.9949),
            zoom: 16,
            heatmap_radius: 50.0,
            heatmap_opacity: 0.6,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage_key: String,
    pub map: MapConfig,
    /// Interval between dashboard stat updates in s.
    pub stats_interval_secs: u64,
    /// How long emergency mode stays on after being triggered, in s.
    pub emergency_duration_secs: u64,
    /// Expected travel time of a vehicle dispatched along a drawn route, in minutes.
    pub dispatch_eta_minutes: u32,
    pub initial_stats: DashboardStats,
    /// Fixed seed for the stat simulator. Random if absent.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            map: MapConfig::default(),
            stats_interval_secs: 5,
            emergency_duration_secs: 30,
            dispatch_eta_minutes: 10,
            initial_stats: DashboardStats::default(),
            seed: None,
        }
    }
}

impl Config {
    /// Parses a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Interval between dashboard stat updates.
    pub fn stats_interval(&self) -> Result<Duration, ConfigError> {
        bounded(
            "stats_interval_secs",
            self.stats_interval_secs,
            MAX_TIMER_SECS,
            Duration::try_seconds,
        )
    }

    /// How long emergency mode stays on after being triggered.
    pub fn emergency_duration(&self) -> Result<Duration, ConfigError> {
        bounded(
            "emergency_duration_secs",
            self.emergency_duration_secs,
            MAX_TIMER_SECS,
            Duration::try_seconds,
        )
    }

    /// Expected travel time of a vehicle dispatched along a drawn route.
    pub fn dispatch_eta(&self) -> Result<Duration, ConfigError> {
        bounded(
            "dispatch_eta_minutes",
            self.dispatch_eta_minutes,
            MAX_ETA_MINUTES,
            Duration::try_minutes,
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, msg: &str| Err(ConfigError::InvalidField(field, msg.to_string()));
        if self.storage_key.trim().is_empty() {
            return invalid("storage_key", "must not be empty");
        }
        self.stats_interval()?;
        self.emergency_duration()?;
        self.dispatch_eta()?;
        if self.map.zoom > 22 {
            return invalid("map.zoom", "must be at most 22");
        }
        if !(0.0..=1.0).contains(&self.map.heatmap_opacity) {
            return invalid("map.heatmap_opacity", "must be within [0, 1]");
        }
        if !(-90.0..=90.0).contains(&self.map.center.lat) || !(-180.0..=180.0).contains(&self.map.center.lng) {
            return invalid("map.center", "is not a valid position");
        }
        Ok(())
    }
}

/// Converts a configured amount to a duration, which must lie within `1..=max` units.
fn bounded(
    field: &'static str,
    value: impl TryInto<i64>,
    max: i64,
    unit: fn(i64) -> Option<Duration>,
) -> Result<Duration, ConfigError> {
    value
        .try_into()
        .ok()
        .filter(|v| (1..=max).contains(v))
        .and_then(unit)
        .ok_or_else(|| ConfigError::InvalidField(field, format!("must be within 1..={}", max)))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn partial_override() {
        let config = Config::from_json(r#"{ "stats_interval_secs": 2, "map": { "zoom": 14 }, "seed": 7 }"#).unwrap();
        assert_eq!(config.stats_interval_secs, 2);
        assert_eq!(config.map.zoom, 14);
        assert_eq!(config.map.center, MapConfig::default().center);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::from_json(r#"{ "stats_interval_secs": 0 }"#),
            Err(ConfigError::InvalidField("stats_interval_secs", _))
        ));
        assert!(matches!(
            Config::from_json(r#"{ "map": { "heatmap_opacity": 1.5 } }"#),
            Err(ConfigError::InvalidField("map.heatmap_opacity", _))
        ));
        assert!(matches!(Config::from_json("[1, 2"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn rejects_oversized_timers() {
        assert!(matches!(
            Config::from_json(r#"{ "emergency_duration_secs": 9000000000000 }"#),
            Err(ConfigError::InvalidField("emergency_duration_secs", _))
        ));
        assert!(matches!(
            Config::from_json(r#"{ "stats_interval_secs": 18446744073709551615 }"#),
            Err(ConfigError::InvalidField("stats_interval_secs", _))
        ));
        assert!(matches!(
            Config::from_json(r#"{ "dispatch_eta_minutes": 4294967295 }"#),
            Err(ConfigError::InvalidField("dispatch_eta_minutes", _))
        ));

        let config = Config::from_json(r#"{ "stats_interval_secs": 86400 }"#).unwrap();
        assert_eq!(config.stats_interval().unwrap(), Duration::days(1));
        assert!(Config::from_json(r#"{ "stats_interval_secs": 86401 }"#).is_err());
    }
}
