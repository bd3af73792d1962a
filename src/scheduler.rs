//! Cancelable timers, polled against an external clock.

use crate::error::ScheduleError;
use chrono::{DateTime, Duration, Utc};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a scheduled task.
    pub struct TaskId;
}

struct Task<T> {
    label: T,
    due: DateTime<Utc>,
    /// Repeat interval; `None` for one-shot tasks.
    every: Option<Duration>,
}

/// A set of pending tasks, each identified by a label of type `T`.
pub struct Scheduler<T> {
    tasks: SlotMap<TaskId, Task<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            tasks: SlotMap::with_key(),
        }
    }
}

impl<T: Copy> Scheduler<T> {
    pub fn new() -> Self {
        Default::default()
    }

    /// Schedules `label` to fire once at `now + delay`.
    pub fn once(&mut self, label: T, now: DateTime<Utc>, delay: Duration) -> Result<TaskId, ScheduleError> {
        let due = now.checked_add_signed(delay).ok_or(ScheduleError::OutOfRange)?;
        Ok(self.tasks.insert(Task { label, due, every: None }))
    }

    /// Schedules `label` to fire every `interval`, starting one interval from `now`.
    pub fn every(&mut self, label: T, now: DateTime<Utc>, interval: Duration) -> Result<TaskId, ScheduleError> {
        if interval <= Duration::zero() {
            return Err(ScheduleError::NonPositiveInterval);
        }
        let due = now.checked_add_signed(interval).ok_or(ScheduleError::OutOfRange)?;
        Ok(self.tasks.insert(Task {
            label,
            due,
            every: Some(interval),
        }))
    }

    /// Cancels a task. Returns `false` if it had already fired or been cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.tasks.remove(id).is_some()
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Cancels every task.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Collects every firing due at or before `now`, in time order.
    ///
    /// Each task fires at most once per poll. A repeating task that has fallen
    /// behind skips the missed intervals and is next due on the first interval
    /// boundary after `now`.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Vec<(TaskId, T)> {
        let mut fired = vec![];
        let mut finished = vec![];
        for (id, task) in &mut self.tasks {
            if task.due > now {
                continue;
            }
            fired.push((task.due, id, task.label));
            match task.every.and_then(|interval| next_due(task.due, interval, now)) {
                Some(due) => task.due = due,
                None => {
                    if task.every.is_some() {
                        log::warn!("dropping repeating task whose next run is out of range");
                    }
                    finished.push(id);
                }
            }
        }
        for id in finished {
            self.tasks.remove(id);
        }
        fired.sort_by_key(|(due, _, _)| *due);
        fired.into_iter().map(|(_, id, label)| (id, label)).collect()
    }
}

/// The first multiple of `interval` after `due` that lies past `now`.
fn next_due(due: DateTime<Utc>, interval: Duration, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let interval_ms = interval.num_milliseconds().max(1);
    let steps = now.signed_duration_since(due).num_milliseconds() / interval_ms + 1;
    due.checked_add_signed(Duration::try_milliseconds(steps.checked_mul(interval_ms)?)?)
}
