//! Availability grid model.
//!
//! The grid is the raw input of a run: day and time headers plus one
//! availability set per `(day, time)` cell, laid out day-major. The cell
//! for `(day, time)` lives at index `day * times.len() + time`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::person::{PersonId, Roster};

/// Key of a time slot: `(day_index, time_index)`.
///
/// Ordering is day-major, then time-minor, which is the slot ordering used
/// for contiguity chunking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    /// Day index into the day headers.
    pub day: usize,
    /// Time index into the time headers.
    pub time: usize,
}

impl SlotKey {
    /// Creates a slot key.
    pub fn new(day: usize, time: usize) -> Self {
        Self { day, time }
    }

    /// Position of this slot in the day-major ordering.
    #[inline]
    pub fn ordinal(&self, times_per_day: usize) -> usize {
        self.day * times_per_day + self.time
    }

    /// Inverse of [`SlotKey::ordinal`].
    #[inline]
    pub fn from_ordinal(ordinal: usize, times_per_day: usize) -> Self {
        Self {
            day: ordinal / times_per_day,
            time: ordinal % times_per_day,
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}t{}", self.day, self.time)
    }
}

/// Day and time header lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headers {
    /// Day labels, in order.
    pub days: Vec<String>,
    /// Time labels within a day, in order.
    pub times: Vec<String>,
}

impl Headers {
    /// Creates headers from day and time labels.
    pub fn new<D, T>(days: impl IntoIterator<Item = D>, times: impl IntoIterator<Item = T>) -> Self
    where
        D: Into<String>,
        T: Into<String>,
    {
        Self {
            days: days.into_iter().map(Into::into).collect(),
            times: times.into_iter().map(Into::into).collect(),
        }
    }

    /// Monday to Saturday, quarter hours from 10:00 to 5:45.
    ///
    /// Times use a 12-hour clock without a meridiem, so the afternoon runs
    /// `12:00, 12:15, ..., 12:45, 1:00, ...`.
    pub fn business_week() -> Self {
        let days = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];
        let times = (10..18).flat_map(|hour: u32| {
            let clock = if hour > 12 { hour - 12 } else { hour };
            (0..4).map(move |quarter| format!("{}:{:02}", clock, quarter * 15))
        });
        Self::new(days, times)
    }

    /// Number of cells the headers describe.
    pub fn cell_count(&self) -> usize {
        self.days.len() * self.times.len()
    }

    /// Label of a slot, `"<day>_<time>"`.
    ///
    /// Returns `None` if the key is outside the headers.
    pub fn label(&self, key: SlotKey) -> Option<String> {
        let day = self.days.get(key.day)?;
        let time = self.times.get(key.time)?;
        Some(format!("{day}_{time}"))
    }
}

/// Raw availability input: people, headers, and one set per cell.
///
/// Construction performs no checks; run [`crate::validation::validate_grid`]
/// before building a model from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityGrid {
    /// Person table.
    pub roster: Roster,
    /// Day and time headers.
    pub headers: Headers,
    /// Availability sets, day-major.
    pub cells: Vec<BTreeSet<PersonId>>,
}

impl AvailabilityGrid {
    /// Creates a grid.
    pub fn new(roster: Roster, headers: Headers, cells: Vec<BTreeSet<PersonId>>) -> Self {
        Self {
            roster,
            headers,
            cells,
        }
    }

    /// Creates a grid where every listed person is available in every cell.
    pub fn fully_available(roster: Roster, headers: Headers) -> Self {
        let everyone: BTreeSet<PersonId> = roster.iter().map(|(id, _)| id).collect();
        let cells = vec![everyone; headers.cell_count()];
        Self::new(roster, headers, cells)
    }

    /// Number of days.
    pub fn day_count(&self) -> usize {
        self.headers.days.len()
    }

    /// Number of times per day.
    pub fn times_per_day(&self) -> usize {
        self.headers.times.len()
    }

    /// Whether the cell count matches the header cross product.
    pub fn is_well_formed(&self) -> bool {
        self.cells.len() == self.headers.cell_count()
    }

    /// Availability set of a slot.
    pub fn available_at(&self, key: SlotKey) -> Option<&BTreeSet<PersonId>> {
        if key.day >= self.day_count() || key.time >= self.times_per_day() {
            return None;
        }
        self.cells.get(key.ordinal(self.times_per_day()))
    }

    /// Replaces the availability set of a slot.
    ///
    /// Out-of-range keys are ignored.
    pub fn set_available(&mut self, key: SlotKey, people: impl IntoIterator<Item = PersonId>) {
        if key.day >= self.day_count() || key.time >= self.times_per_day() {
            return;
        }
        let ordinal = key.ordinal(self.times_per_day());
        if let Some(cell) = self.cells.get_mut(ordinal) {
            *cell = people.into_iter().collect();
        }
    }

    /// Iterates over `(key, availability)` in day-major order.
    pub fn slots(&self) -> impl Iterator<Item = (SlotKey, &BTreeSet<PersonId>)> {
        let times = self.times_per_day().max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (SlotKey::from_ordinal(i, times), cell))
    }
}
