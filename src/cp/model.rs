//! Constraint model over slot variables.
//!
//! A [`ConstraintModel`] owns the slot universe of a run (one variable per
//! populated slot, each with its availability domain) and the constraints
//! accumulated over it. It is the single value that builders extend and
//! that every engine call receives; nothing is kept in global state.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Assignment, PersonId, SlotKey};

/// A slot variable: one per populated slot.
///
/// The domain is the set of people who may be assigned to the slot and is
/// never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotVar {
    key: SlotKey,
    domain: BTreeSet<PersonId>,
}

impl SlotVar {
    /// Slot key of this variable.
    pub fn key(&self) -> SlotKey {
        self.key
    }

    /// People the slot may be assigned to.
    pub fn domain(&self) -> &BTreeSet<PersonId> {
        &self.domain
    }

    /// Whether `person` is in the domain.
    pub fn allows(&self, person: PersonId) -> bool {
        self.domain.contains(&person)
    }
}

/// Direction of a per-person load bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadBoundKind {
    /// Assigned slot count must not exceed the threshold.
    Max,
    /// Assigned slot count must reach the threshold.
    Min,
}

/// A constraint over slot variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Every listed pair of slots is assigned the same person.
    ///
    /// Holds trivially when `pairs` is empty.
    Contiguous {
        /// Slot pairs that must share an assignee.
        pairs: Vec<(SlotKey, SlotKey)>,
    },

    /// The number of slots assigned to `person` respects `threshold`.
    Load {
        /// Person whose load is bounded.
        person: PersonId,
        /// Upper or lower bound.
        kind: LoadBoundKind,
        /// Slot count threshold (inclusive).
        threshold: usize,
    },

    /// At least one slot of `previous` is assigned differently.
    ///
    /// Never holds when `previous` is empty.
    Distinct {
        /// The assignment to exclude.
        previous: Assignment,
    },
}

impl Constraint {
    /// Slot keys the constraint refers to.
    pub fn slot_keys(&self) -> Vec<SlotKey> {
        match self {
            Constraint::Contiguous { pairs } => {
                pairs.iter().flat_map(|(a, b)| [*a, *b]).collect()
            }
            Constraint::Load { .. } => Vec::new(),
            Constraint::Distinct { previous } => previous.iter().map(|(k, _)| k).collect(),
        }
    }
}

/// Whether a constraint must hold or is only preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    /// Must hold in every accepted model.
    Hard,
    /// Preferred; satisfying it earns the given weight.
    Soft(u32),
}

/// A constraint together with its strength.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedConstraint {
    /// The constraint.
    pub constraint: Constraint,
    /// Hard or soft with weight.
    pub strength: Strength,
}

/// The constraint model of one scheduling run.
///
/// Constraints only accumulate; there is no removal.
///
/// # Examples
///
/// ```
/// use u_shift::cp::{Constraint, ConstraintModel};
/// use u_shift::models::{PersonId, SlotKey};
///
/// let mut model = ConstraintModel::new(1, 2);
/// model.add_slot(SlotKey::new(0, 0), [PersonId(1), PersonId(2)]);
/// model.add_slot(SlotKey::new(0, 1), [PersonId(2)]);
/// model.add_hard(Constraint::Contiguous {
///     pairs: vec![(SlotKey::new(0, 0), SlotKey::new(0, 1))],
/// });
/// assert_eq!(model.slot_count(), 2);
/// assert!(model.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConstraintModel {
    days: usize,
    times: usize,
    slots: BTreeMap<SlotKey, SlotVar>,
    people: BTreeSet<PersonId>,
    constraints: Vec<WeightedConstraint>,
}

impl ConstraintModel {
    /// Creates an empty model over a `days × times` grid.
    pub fn new(days: usize, times: usize) -> Self {
        Self {
            days,
            times,
            ..Default::default()
        }
    }

    /// Number of days in the underlying grid.
    pub fn days(&self) -> usize {
        self.days
    }

    /// Number of times per day in the underlying grid.
    pub fn times_per_day(&self) -> usize {
        self.times
    }

    /// Adds a slot variable with the given domain.
    ///
    /// Every person in the domain becomes a candidate person of the model.
    /// Returns `false` (and adds nothing) when the domain is empty.
    pub fn add_slot(&mut self, key: SlotKey, domain: impl IntoIterator<Item = PersonId>) -> bool {
        let domain: BTreeSet<PersonId> = domain.into_iter().collect();
        if domain.is_empty() {
            return false;
        }
        self.people.extend(domain.iter().copied());
        self.slots.insert(key, SlotVar { key, domain });
        true
    }

    /// Registers a candidate person even if no slot allows them yet.
    ///
    /// Load bounds are posted for every candidate person.
    pub fn add_person(&mut self, person: PersonId) {
        self.people.insert(person);
    }

    /// Slot variable at `key`, if the slot is populated.
    pub fn slot(&self, key: SlotKey) -> Option<&SlotVar> {
        self.slots.get(&key)
    }

    /// Slot variables in day-major order.
    pub fn slots(&self) -> impl Iterator<Item = &SlotVar> {
        self.slots.values()
    }

    /// Number of slot variables.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Candidate people in ascending id order.
    pub fn people(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.people.iter().copied()
    }

    /// Number of candidate people.
    pub fn person_count(&self) -> usize {
        self.people.len()
    }

    /// Adds a hard constraint.
    pub fn add_hard(&mut self, constraint: Constraint) {
        self.constraints.push(WeightedConstraint {
            constraint,
            strength: Strength::Hard,
        });
    }

    /// Adds a soft constraint with the given weight.
    pub fn add_soft(&mut self, constraint: Constraint, weight: u32) {
        self.constraints.push(WeightedConstraint {
            constraint,
            strength: Strength::Soft(weight),
        });
    }

    /// Forbids reproducing `assignment` exactly.
    pub fn block(&mut self, assignment: &Assignment) {
        self.add_hard(Constraint::Distinct {
            previous: assignment.clone(),
        });
    }

    /// All constraints in insertion order.
    pub fn constraints(&self) -> &[WeightedConstraint] {
        &self.constraints
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Hard constraints.
    pub fn hard_constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints
            .iter()
            .filter(|c| c.strength == Strength::Hard)
            .map(|c| &c.constraint)
    }

    /// Soft constraints with their weights.
    pub fn soft_constraints(&self) -> impl Iterator<Item = (&Constraint, u32)> {
        self.constraints.iter().filter_map(|c| match c.strength {
            Strength::Soft(w) => Some((&c.constraint, w)),
            Strength::Hard => None,
        })
    }

    /// Sum of all soft weights: the best score any model could reach.
    pub fn max_score(&self) -> u64 {
        self.soft_constraints().map(|(_, w)| u64::from(w)).sum()
    }

    /// Validates the model for consistency.
    ///
    /// Checks that every referenced slot is a populated slot of the model.
    pub fn validate(&self) -> Result<(), String> {
        for wc in &self.constraints {
            for key in wc.constraint.slot_keys() {
                if !self.slots.contains_key(&key) {
                    return Err(format!("constraint references unpopulated slot {key}"));
                }
            }
        }
        Ok(())
    }

    /// Whether `assignment` satisfies `constraint`.
    pub fn holds(&self, constraint: &Constraint, assignment: &Assignment) -> bool {
        match constraint {
            Constraint::Contiguous { pairs } => pairs.iter().all(|(a, b)| {
                matches!((assignment.get(*a), assignment.get(*b)), (Some(x), Some(y)) if x == y)
            }),
            Constraint::Load {
                person,
                kind,
                threshold,
            } => {
                let load = assignment.load_of(*person);
                match kind {
                    LoadBoundKind::Max => load <= *threshold,
                    LoadBoundKind::Min => load >= *threshold,
                }
            }
            Constraint::Distinct { previous } => previous
                .iter()
                .any(|(key, person)| assignment.get(key) != Some(person)),
        }
    }

    /// Whether `assignment` is a valid model: total over the slot
    /// variables, inside every domain, and satisfying all hard constraints.
    pub fn is_feasible(&self, assignment: &Assignment) -> bool {
        let total = assignment.len() == self.slots.len()
            && self
                .slots
                .values()
                .all(|var| assignment.get(var.key).is_some_and(|p| var.allows(p)));
        total && self.hard_constraints().all(|c| self.holds(c, assignment))
    }

    /// Total weight of the soft constraints `assignment` satisfies.
    pub fn soft_score(&self, assignment: &Assignment) -> u64 {
        self.soft_constraints()
            .filter(|(c, _)| self.holds(c, assignment))
            .map(|(_, w)| u64::from(w))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k(day: usize, time: usize) -> SlotKey {
        SlotKey::new(day, time)
    }

    fn sample_model() -> ConstraintModel {
        let mut model = ConstraintModel::new(1, 3);
        model.add_slot(k(0, 0), [PersonId(1), PersonId(2)]);
        model.add_slot(k(0, 1), [PersonId(1), PersonId(2)]);
        model.add_slot(k(0, 2), [PersonId(2)]);
        model
    }

    #[test]
    fn test_empty_domain_is_not_a_variable() {
        let mut model = ConstraintModel::new(1, 1);
        assert!(!model.add_slot(k(0, 0), []));
        assert_eq!(model.slot_count(), 0);
        assert!(model.slot(k(0, 0)).is_none());
    }

    #[test]
    fn test_people_collected_from_domains() {
        let model = sample_model();
        assert_eq!(model.people().collect::<Vec<_>>(), vec![PersonId(1), PersonId(2)]);
    }

    #[test]
    fn test_contiguous_holds() {
        let model = sample_model();
        let c = Constraint::Contiguous {
            pairs: vec![(k(0, 0), k(0, 1))],
        };
        let same = Assignment::new().with(k(0, 0), PersonId(1)).with(k(0, 1), PersonId(1));
        let split = Assignment::new().with(k(0, 0), PersonId(1)).with(k(0, 1), PersonId(2));
        assert!(model.holds(&c, &same));
        assert!(!model.holds(&c, &split));
        assert!(model.holds(&Constraint::Contiguous { pairs: vec![] }, &split));
    }

    #[test]
    fn test_load_holds() {
        let model = sample_model();
        let a = Assignment::new()
            .with(k(0, 0), PersonId(2))
            .with(k(0, 1), PersonId(2))
            .with(k(0, 2), PersonId(2));
        let max2 = Constraint::Load {
            person: PersonId(2),
            kind: LoadBoundKind::Max,
            threshold: 2,
        };
        let min3 = Constraint::Load {
            person: PersonId(2),
            kind: LoadBoundKind::Min,
            threshold: 3,
        };
        assert!(!model.holds(&max2, &a));
        assert!(model.holds(&min3, &a));
    }

    #[test]
    fn test_distinct_of_empty_never_holds() {
        let model = ConstraintModel::new(0, 0);
        let c = Constraint::Distinct {
            previous: Assignment::new(),
        };
        assert!(!model.holds(&c, &Assignment::new()));
    }

    #[test]
    fn test_feasibility_checks_domains_and_hard_constraints() {
        let mut model = sample_model();
        let good = Assignment::new()
            .with(k(0, 0), PersonId(1))
            .with(k(0, 1), PersonId(1))
            .with(k(0, 2), PersonId(2));
        let outside_domain = good.clone().with(k(0, 2), PersonId(1));
        let partial = Assignment::new().with(k(0, 0), PersonId(1));

        assert!(model.is_feasible(&good));
        assert!(!model.is_feasible(&outside_domain));
        assert!(!model.is_feasible(&partial));

        model.block(&good);
        assert!(!model.is_feasible(&good));
    }

    #[test]
    fn test_soft_score() {
        let mut model = sample_model();
        model.add_soft(
            Constraint::Contiguous {
                pairs: vec![(k(0, 1), k(0, 2))],
            },
            10,
        );
        model.add_soft(
            Constraint::Load {
                person: PersonId(1),
                kind: LoadBoundKind::Min,
                threshold: 1,
            },
            100,
        );
        assert_eq!(model.max_score(), 110);

        let a = Assignment::new()
            .with(k(0, 0), PersonId(1))
            .with(k(0, 1), PersonId(2))
            .with(k(0, 2), PersonId(2));
        assert_eq!(model.soft_score(&a), 110);

        let b = a.clone().with(k(0, 0), PersonId(2));
        assert_eq!(model.soft_score(&b), 10);
    }

    #[test]
    fn test_validate_unknown_slot() {
        let mut model = sample_model();
        model.add_hard(Constraint::Contiguous {
            pairs: vec![(k(0, 0), k(0, 5))],
        });
        assert!(model.validate().is_err());
    }
}
