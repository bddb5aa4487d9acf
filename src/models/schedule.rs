//! Solution and projected schedule models.
//!
//! A [`Solution`] is what the solving engine produces: a total mapping from
//! populated slots to person ids. A [`ProjectedSchedule`] is the same
//! assignment resolved to names, ready for an output sink.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::grid::{Headers, SlotKey};
use super::person::PersonId;

/// Slot-to-person mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    values: BTreeMap<SlotKey, PersonId>,
}

impl Assignment {
    /// Creates an empty assignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a person to a slot, replacing any previous value.
    pub fn assign(&mut self, key: SlotKey, person: PersonId) {
        self.values.insert(key, person);
    }

    /// Builder form of [`Assignment::assign`].
    pub fn with(mut self, key: SlotKey, person: PersonId) -> Self {
        self.assign(key, person);
        self
    }

    /// Person assigned to a slot.
    pub fn get(&self, key: SlotKey) -> Option<PersonId> {
        self.values.get(&key).copied()
    }

    /// Iterates over `(slot, person)` in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotKey, PersonId)> + '_ {
        self.values.iter().map(|(k, p)| (*k, *p))
    }

    /// Number of assigned slots.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is assigned.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of slots assigned to `person`.
    pub fn load_of(&self, person: PersonId) -> usize {
        self.values.values().filter(|p| **p == person).count()
    }

    /// Whether the two assignments disagree on at least one slot.
    pub fn differs_from(&self, other: &Assignment) -> bool {
        self.values != other.values
    }
}

impl FromIterator<(SlotKey, PersonId)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (SlotKey, PersonId)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A model returned by the solving engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// The slot assignment.
    pub assignment: Assignment,
    /// Total weight of satisfied soft constraints.
    pub score: u64,
}

impl Solution {
    /// Creates a solution.
    pub fn new(assignment: Assignment, score: u64) -> Self {
        Self { assignment, score }
    }
}

/// A solution resolved to person names.
///
/// Only populated slots appear as keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedSchedule {
    /// Zero-based position in the order schedules were found.
    pub index: usize,
    /// Satisfied soft weight of the underlying solution.
    pub score: u64,
    /// `(day, time) → name`.
    pub cells: BTreeMap<SlotKey, String>,
}

impl ProjectedSchedule {
    /// Creates an empty projection.
    pub fn new(index: usize, score: u64) -> Self {
        Self {
            index,
            score,
            cells: BTreeMap::new(),
        }
    }

    /// Name assigned at `(day, time)`.
    pub fn get(&self, day: usize, time: usize) -> Option<&str> {
        self.cells.get(&SlotKey::new(day, time)).map(String::as_str)
    }

    /// Number of assigned cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Slot count per name.
    pub fn load_by_person(&self) -> BTreeMap<&str, usize> {
        let mut load = BTreeMap::new();
        for name in self.cells.values() {
            *load.entry(name.as_str()).or_insert(0) += 1;
        }
        load
    }

    /// `(day label, time label, name)` triples in slot order.
    ///
    /// Cells whose key falls outside `headers` are skipped.
    pub fn labelled<'a>(
        &'a self,
        headers: &'a Headers,
    ) -> impl Iterator<Item = (&'a str, &'a str, &'a str)> + 'a {
        self.cells.iter().filter_map(move |(key, name)| {
            let day = headers.days.get(key.day)?;
            let time = headers.times.get(key.time)?;
            Some((day.as_str(), time.as_str(), name.as_str()))
        })
    }
}
