//! Aggregate counters shown on the dashboard tab.

use crate::util::Interval;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Average speed is kept within this range, in km/h.
pub const SPEED_RANGE: Interval<i32> = Interval::new(10, 60);

/// Congestion is kept within this range, in percent.
pub const CONGESTION_RANGE: Interval<i32> = Interval::new(0, 100);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    pub total_vehicles: u32,
    pub active_incidents: u32,
    pub emergency_vehicles: u32,
    pub traffic_lights: u32,
    pub average_speed: i32,
    pub congestion_level: i32,
}

impl Default for DashboardStats {
    fn default() -> Self {
        Self {
            total_vehicles: 1247,
            active_incidents: 3,
            emergency_vehicles: 2,
            traffic_lights: 10,
            average_speed: 23,
            congestion_level: 68,
        }
    }
}

impl DashboardStats {
    pub fn congestion(&self) -> Congestion {
        Congestion::classify(self.congestion_level)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Congestion {
    Low,
    Medium,
    High,
}

impl Congestion {
    pub fn classify(level: i32) -> Self {
        if level < 30 {
            Congestion::Low
        } else if level < 70 {
            Congestion::Medium
        } else {
            Congestion::High
        }
    }
}

/// The dashboard's counters and its emergency flag.
#[derive(Clone, Debug, Default)]
pub struct Dashboard {
    stats: DashboardStats,
    emergency: bool,
}

impl Dashboard {
    pub fn new(stats: DashboardStats) -> Self {
        let stats = DashboardStats {
            average_speed: SPEED_RANGE.clamp(stats.average_speed),
            congestion_level: CONGESTION_RANGE.clamp(stats.congestion_level),
            ..stats
        };
        Self {
            stats,
            emergency: false,
        }
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    /// Applies one random step to the counters.
    pub fn tick(&mut self, rng: &mut impl Rng) {
        let stats = &mut self.stats;
        let vehicles = stats.total_vehicles as i64 + rng.gen_range(-5..5);
        stats.total_vehicles = vehicles.clamp(0, u32::MAX as i64) as u32;
        stats.average_speed = SPEED_RANGE.clamp(stats.average_speed + rng.gen_range(-3..3));
        stats.congestion_level = CONGESTION_RANGE.clamp(stats.congestion_level + rng.gen_range(-5..5));
        log::trace!(
            "stats: {} vehicles, {} km/h, {}% congestion",
            stats.total_vehicles,
            stats.average_speed,
            stats.congestion_level
        );
    }

    pub fn emergency_mode(&self) -> bool {
        self.emergency
    }

    /// Sets the emergency flag. It is purely informational.
    pub fn set_emergency_mode(&mut self, active: bool) {
        if active != self.emergency {
            log::info!("emergency mode {}", if active { "on" } else { "off" });
        }
        self.emergency = active;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn stays_within_bounds() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut dashboard = Dashboard::default();
            for _ in 0..2000 {
                let before = dashboard.stats().clone();
                dashboard.tick(&mut rng);
                let after = dashboard.stats();
                assert!(SPEED_RANGE.contains(after.average_speed));
                assert!(CONGESTION_RANGE.contains(after.congestion_level));
                assert!((after.average_speed - before.average_speed).abs() <= 3);
                assert!((after.congestion_level - before.congestion_level).abs() <= 5);
                assert!((after.total_vehicles as i64 - before.total_vehicles as i64).abs() <= 5);
                assert_eq!(after.traffic_lights, before.traffic_lights);
            }
        }
    }

    #[test]
    fn pinned_at_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut dashboard = Dashboard::new(DashboardStats {
            total_vehicles: 0,
            average_speed: 10,
            congestion_level: 100,
            ..Default::default()
        });
        for _ in 0..500 {
            dashboard.tick(&mut rng);
            assert!(dashboard.stats().average_speed >= 10);
            assert!(dashboard.stats().congestion_level <= 100);
        }
    }

    #[test]
    fn out_of_range_initial_stats_are_clamped() {
        let dashboard = Dashboard::new(DashboardStats {
            average_speed: 120,
            congestion_level: -4,
            ..Default::default()
        });
        assert_eq!(dashboard.stats().average_speed, 60);
        assert_eq!(dashboard.stats().congestion_level, 0);
    }

    #[test]
    fn congestion_classes() {
        assert_eq!(Congestion::classify(0), Congestion::Low);
        assert_eq!(Congestion::classify(29), Congestion::Low);
        assert_eq!(Congestion::classify(30), Congestion::Medium);
        assert_eq!(Congestion::classify(69), Congestion::Medium);
        assert_eq!(Congestion::classify(70), Congestion::High);
        assert_eq!(DashboardStats::default().congestion(), Congestion::Medium);
    }
}
