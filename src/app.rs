//! Top-level composition: the credential gate, the two tabs and their timers.

use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::error::{AppError, GateError, ScheduleError};
use crate::gate::ApiKeyGate;
use crate::map::TrafficMap;
use crate::scheduler::{Scheduler, TaskId};
use crate::store::KeyValueStore;
use crate::surface::MapService;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Map,
    Dashboard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Timer {
    StatTick,
    EmergencyClear,
}

/// The whole dashboard.
///
/// Owns the stat and emergency timers; both are cancelled by
/// [App::teardown], which also runs on drop.
pub struct App<K, M: MapService> {
    config: Config,
    gate: ApiKeyGate<K>,
    service: M,
    map: TrafficMap<M::Surface>,
    dashboard: Dashboard,
    tab: Tab,
    rng: StdRng,
    timers: Scheduler<Timer>,
    emergency_timer: Option<TaskId>,
    emergency_duration: Duration,
}

impl<K: KeyValueStore, M: MapService> App<K, M> {
    /// Builds the app with the sample data, and loads the map straight away
    /// if a credential was saved previously.
    pub fn new(config: Config, store: K, service: M, now: DateTime<Utc>) -> Result<Self, AppError> {
        config.validate()?;
        let eta = config.dispatch_eta()?;
        let emergency_duration = config.emergency_duration()?;
        let gate = ApiKeyGate::load(store, config.storage_key.clone())?;
        let map = TrafficMap::with_samples(config.map.clone(), eta, now);
        let dashboard = Dashboard::new(config.initial_stats.clone());
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut timers = Scheduler::new();
        timers.every(Timer::StatTick, now, config.stats_interval()?)?;

        let mut app = Self {
            config,
            gate,
            service,
            map,
            dashboard,
            tab: Tab::default(),
            rng,
            timers,
            emergency_timer: None,
            emergency_duration,
        };
        app.load_map();
        Ok(app)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether a credential still has to be entered.
    pub fn is_locked(&self) -> bool {
        !self.gate.is_unlocked()
    }

    pub fn gate(&self) -> &ApiKeyGate<K> {
        &self.gate
    }

    /// Saves a credential and tries to bring up the map with it.
    /// A credential the map service rejects still unlocks the app;
    /// the map just stays not ready.
    pub fn submit_credential(&mut self, input: &str) -> Result<(), GateError> {
        self.gate.submit(input)?;
        self.load_map();
        Ok(())
    }

    pub fn service(&self) -> &M {
        &self.service
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn map(&self) -> &TrafficMap<M::Surface> {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut TrafficMap<M::Surface> {
        &mut self.map
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Turns emergency mode on. It switches itself off again after the
    /// configured duration, counted from the latest activation.
    ///
    /// If the switch-off cannot be scheduled nothing changes.
    pub fn activate_emergency(&mut self, now: DateTime<Utc>) -> Result<(), ScheduleError> {
        let clear = self
            .timers
            .once(Timer::EmergencyClear, now, self.emergency_duration)
            .map_err(|err| {
                log::warn!("emergency mode not activated: {}", err);
                err
            })?;
        if let Some(previous) = self.emergency_timer.replace(clear) {
            self.timers.cancel(previous);
        }
        self.dashboard.set_emergency_mode(true);
        Ok(())
    }

    /// Runs every timer due at or before `now`.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        for (id, timer) in self.timers.poll(now) {
            match timer {
                Timer::StatTick => self.dashboard.tick(&mut self.rng),
                Timer::EmergencyClear => {
                    if self.emergency_timer == Some(id) {
                        self.emergency_timer = None;
                        self.dashboard.set_emergency_mode(false);
                    }
                }
            }
        }
    }

    /// Number of timers still pending.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Cancels all timers. Nothing fires after this.
    pub fn teardown(&mut self) {
        if !self.timers.is_empty() {
            log::debug!("cancelling {} timers", self.timers.len());
        }
        self.timers.clear();
        self.emergency_timer = None;
    }

    fn load_map(&mut self) {
        let Some(credential) = self.gate.credential() else {
            return;
        };
        if self.map.is_ready() {
            return;
        }
        // Failures are logged by the adapter and leave the map not ready.
        let _ = self.map.load(&mut self.service, credential);
    }
}

impl<K, M: MapService> Drop for App<K, M> {
    fn drop(&mut self) {
        self.timers.clear();
    }
}
