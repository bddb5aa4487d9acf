//! Slot domain construction.
//!
//! Turns an availability grid into the slot universe of a
//! [`ConstraintModel`]: one variable per slot with at least one eligible
//! person available, whose domain is exactly those people.

use log::{debug, info};

use super::model::ConstraintModel;
use crate::models::{AvailabilityGrid, Roster};
use crate::validation::{validate_grid, ValidationError};

/// Builds slot variables from an availability grid.
///
/// # Example
/// ```
/// use u_shift::cp::SlotDomainBuilder;
/// use u_shift::models::{AvailabilityGrid, Headers, Person, Roster};
///
/// let roster = Roster::new(vec![Person::new(1, "Ada"), Person::new(2, "Brook")]);
/// let grid = AvailabilityGrid::fully_available(roster, Headers::new(["Mon"], ["9:00", "9:15"]));
/// let model = SlotDomainBuilder::new(&grid).excluding(&["Brook"]).build().unwrap();
/// assert_eq!(model.slot_count(), 2);
/// assert_eq!(model.person_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SlotDomainBuilder<'a> {
    grid: &'a AvailabilityGrid,
    excluded: Vec<String>,
}

impl<'a> SlotDomainBuilder<'a> {
    /// Creates a builder over `grid`.
    pub fn new(grid: &'a AvailabilityGrid) -> Self {
        Self {
            grid,
            excluded: Vec::new(),
        }
    }

    /// Excludes people by name before variables are built.
    ///
    /// Excluded people are removed from every domain. A slot whose only
    /// available people are excluded becomes unpopulated; it keeps its
    /// position in the slot ordering.
    pub fn excluding<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.excluded
            .extend(names.iter().map(|n| n.as_ref().to_string()));
        self
    }

    /// Validates the grid and builds the model's slot universe.
    ///
    /// # Errors
    /// Returns every problem found by [`validate_grid`]; in particular a
    /// cell count that differs from `days × times`.
    pub fn build(&self) -> Result<ConstraintModel, Vec<ValidationError>> {
        validate_grid(self.grid)?;

        let roster: Roster = self.grid.roster.clone().excluding(&self.excluded);
        let mut model = ConstraintModel::new(self.grid.day_count(), self.grid.times_per_day());
        for id in roster.eligible_ids() {
            model.add_person(id);
        }

        let mut skipped = 0usize;
        for (key, available) in self.grid.slots() {
            let domain = available.iter().copied().filter(|id| roster.is_eligible(*id));
            if !model.add_slot(key, domain) {
                skipped += 1;
            }
        }

        debug!("{} slots have nobody available and get no variable", skipped);
        info!(
            "built {} slot variables over {} people ({} excluded by name)",
            model.slot_count(),
            model.person_count(),
            roster.len() - roster.eligible_ids().len()
        );
        Ok(model)
    }
}
