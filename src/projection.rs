//! Projection of solutions onto person names.
//!
//! Maps each solved slot back to its `(day, time)` position and the name of
//! the assigned person. Only slots that were populated (and therefore have
//! a variable) can appear; a slot nobody was available for never does.

use thiserror::Error;

use crate::models::{PersonId, ProjectedSchedule, Roster, SlotKey, Solution};

/// A solution could not be projected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// The solution assigns a person the roster does not know.
    #[error("slot {slot} is assigned to unknown person {person}")]
    UnknownPerson {
        /// Offending slot.
        slot: SlotKey,
        /// Person id with no name.
        person: PersonId,
    },
}

/// Resolves solutions to `(day, time) → name`.
#[derive(Debug, Clone)]
pub struct ResultProjector<'a> {
    roster: &'a Roster,
}

impl<'a> ResultProjector<'a> {
    /// Creates a projector over the run's person table.
    pub fn new(roster: &'a Roster) -> Self {
        Self { roster }
    }

    /// Projects one solution.
    ///
    /// `index` is the position of the solution in the order found.
    pub fn project(
        &self,
        index: usize,
        solution: &Solution,
    ) -> Result<ProjectedSchedule, ProjectionError> {
        let mut projected = ProjectedSchedule::new(index, solution.score);
        for (slot, person) in solution.assignment.iter() {
            let name = self
                .roster
                .name(person)
                .ok_or(ProjectionError::UnknownPerson { slot, person })?;
            projected.cells.insert(slot, name.to_string());
        }
        Ok(projected)
    }
}
