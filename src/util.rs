//! Miscellaneous utility structs and functions.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A closed interval on the number line.
#[derive(Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval<T> {
    pub min: T,
    pub max: T,
}

impl<T> Interval<T> {
    /// Creates a new interval.
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: PartialOrd + Copy> Interval<T> {
    /// Returns true if this interval contains the value.
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }

    /// Restricts a value to the interval.
    pub fn clamp(&self, value: T) -> T {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }
}

impl<T: Debug> Debug for Interval<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interval({:?}, {:?})", &self.min, &self.max)
    }
}

/// A collection that counts its own modifications,
/// so that renderers can tell when it needs redrawing.
#[derive(Clone, Debug)]
pub struct Tracked<T> {
    items: Vec<T>,
    revision: u64,
}

impl<T> Default for Tracked<T> {
    fn default() -> Self {
        Self::new(vec![])
    }
}

impl<T> Tracked<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, revision: 1 }
    }

    /// Gets the current revision. Starts at 1 and increases on every modification.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn push(&mut self, item: T) {
        self.modify(|items| items.push(item));
    }

    /// Applies a modification and bumps the revision.
    pub fn modify<R>(&mut self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        self.revision += 1;
        f(&mut self.items)
    }
}

impl<'a, T> IntoIterator for &'a Tracked<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
