//! Constraint formulation of the shift scheduling problem.
//!
//! Bridges the availability grid to a solving engine:
//!
//! - **Model**: [`ConstraintModel`] — slot variables plus accumulated hard
//!   and weighted soft [`Constraint`]s
//! - **Domains**: [`SlotDomainBuilder`] — one variable per populated slot
//! - **Constraints**: [`ConstraintBuilder`] — contiguity chunks and
//!   per-person load bounds
//! - **Engine**: [`SolvingEngine`] trait, with [`MilpEngine`] as the
//!   bundled implementation over `good_lp`
//!
//! # Design
//!
//! The model is an explicit value. Builders take it by mutable reference,
//! and engines receive it on every call, so the constraint set can keep
//! growing between calls (blocking constraints) without any engine-side
//! state.
//!
//! # References
//!
//! - Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"
//! - Meseguer, Rossi & Schiex (2006), "Soft Constraints", ibid. Ch. 3

mod builder;
mod domain;
mod engine;
mod milp;
mod model;

pub use builder::{contiguity_groups, ConstraintBuilder};
pub use domain::SlotDomainBuilder;
pub use engine::{SolveOutcome, SolverError, SolvingEngine};
pub use milp::MilpEngine;
pub use model::{Constraint, ConstraintModel, LoadBoundKind, SlotVar, Strength, WeightedConstraint};
