//! Constraint derivation over slot variables.
//!
//! # Contiguity groups
//!
//! The full `(day, time)` ordering (day-major) is cut into consecutive
//! chunks of `L` slots. Inside a chunk, the populated slots form a chain and
//! each neighbouring pair in that chain must share an assignee, so a chunk
//! constraint holds iff every populated slot of the chunk goes to the same
//! person. Unpopulated slots are skipped over, never split a chain, and
//! never shift chunk boundaries. Chunks with fewer than two populated slots
//! yield no constraint.
//!
//! # Load bounds
//!
//! One soft constraint per candidate person bounding the number of slots
//! assigned to them.
//!
//! # Weights
//!
//! The intended ordering is `load bound ≫ long contiguity > short
//! contiguity`: balancing load wins over keeping blocks together, and longer
//! blocks are worth more than shorter ones. See
//! [`crate::config::ScheduleConfig`] for the defaults.

use log::debug;

use super::model::{Constraint, ConstraintModel, LoadBoundKind};
use crate::models::SlotKey;

/// Adds constraints to a [`ConstraintModel`].
///
/// # Example
/// ```
/// use u_shift::cp::{ConstraintBuilder, ConstraintModel, LoadBoundKind};
/// use u_shift::models::{PersonId, SlotKey};
///
/// let mut model = ConstraintModel::new(1, 4);
/// for t in 0..4 {
///     model.add_slot(SlotKey::new(0, t), [PersonId(1), PersonId(2)]);
/// }
/// let mut builder = ConstraintBuilder::new(&mut model);
/// assert_eq!(builder.hard_contiguity(2), 2);
/// assert_eq!(builder.soft_contiguity(4, 10), 1);
/// assert_eq!(builder.load_bound(LoadBoundKind::Max, 3, 100), 2);
/// assert_eq!(model.constraint_count(), 5);
/// ```
pub struct ConstraintBuilder<'m> {
    model: &'m mut ConstraintModel,
}

impl<'m> ConstraintBuilder<'m> {
    /// Creates a builder that extends `model`.
    pub fn new(model: &'m mut ConstraintModel) -> Self {
        Self { model }
    }

    /// Requires each `length`-slot chunk to go to a single person.
    ///
    /// Returns the number of constraints added.
    pub fn hard_contiguity(&mut self, length: usize) -> usize {
        let groups = contiguity_groups(self.model, length);
        let added = groups.len();
        for pairs in groups {
            self.model.add_hard(Constraint::Contiguous { pairs });
        }
        debug!("hard contiguity L={}: {} chunk constraints", length, added);
        added
    }

    /// Prefers each `length`-slot chunk to go to a single person.
    ///
    /// Each satisfied chunk earns `weight`. Returns the number of
    /// constraints added.
    pub fn soft_contiguity(&mut self, length: usize, weight: u32) -> usize {
        let groups = contiguity_groups(self.model, length);
        let added = groups.len();
        for pairs in groups {
            self.model.add_soft(Constraint::Contiguous { pairs }, weight);
        }
        debug!(
            "soft contiguity L={} w={}: {} chunk constraints",
            length, weight, added
        );
        added
    }

    /// Prefers every candidate person's slot count to respect `threshold`.
    ///
    /// Returns the number of constraints added (one per person).
    pub fn load_bound(&mut self, kind: LoadBoundKind, threshold: usize, weight: u32) -> usize {
        let people: Vec<_> = self.model.people().collect();
        for &person in &people {
            self.model.add_soft(
                Constraint::Load {
                    person,
                    kind,
                    threshold,
                },
                weight,
            );
        }
        debug!(
            "{:?} load bound {} w={}: {} person constraints",
            kind,
            threshold,
            weight,
            people.len()
        );
        people.len()
    }
}

/// Adjacent populated pairs per `length`-slot chunk.
///
/// Only chunks with at least one pair are returned.
pub fn contiguity_groups(model: &ConstraintModel, length: usize) -> Vec<Vec<(SlotKey, SlotKey)>> {
    let times = model.times_per_day();
    let total = model.days() * times;
    if length < 2 || total == 0 {
        return Vec::new();
    }

    let mut groups = Vec::new();
    for start in (0..total).step_by(length) {
        let end = (start + length).min(total);
        let populated: Vec<SlotKey> = (start..end)
            .map(|ordinal| SlotKey::from_ordinal(ordinal, times))
            .filter(|key| model.slot(*key).is_some())
            .collect();
        let pairs: Vec<(SlotKey, SlotKey)> = populated.windows(2).map(|w| (w[0], w[1])).collect();
        if !pairs.is_empty() {
            groups.push(pairs);
        }
    }
    groups
}
