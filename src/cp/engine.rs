//! Solving engine interface.

use thiserror::Error;

use super::model::ConstraintModel;
use crate::models::Solution;

/// Result of one engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// A model satisfying every hard constraint, maximizing soft weight.
    Sat(Solution),
    /// No model satisfies the hard constraints.
    Unsat,
}

impl SolveOutcome {
    /// Whether a model was found.
    pub fn is_sat(&self) -> bool {
        matches!(self, SolveOutcome::Sat(_))
    }
}

/// Failure of the solving engine itself (as opposed to infeasibility).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    /// The engine could not be reached or started.
    #[error("solver unavailable: {0}")]
    Unavailable(String),
    /// The engine failed while solving.
    #[error("solver failed: {0}")]
    Backend(String),
    /// The model handed to the engine references unknown slots.
    #[error("invalid constraint model: {0}")]
    InvalidModel(String),
    /// The engine returned an assignment that breaks a hard constraint.
    #[error("solver returned an infeasible assignment")]
    InfeasibleModel,
}

/// Trait for solving engine implementations.
///
/// Each call receives the full, current [`ConstraintModel`]; constraints
/// added between calls are therefore cumulative. An implementation returns
/// one optimal model or [`SolveOutcome::Unsat`]. Tie-breaking among equally
/// good models is up to the implementation.
pub trait SolvingEngine {
    /// Solves the model.
    fn solve(&mut self, model: &ConstraintModel) -> Result<SolveOutcome, SolverError>;

    /// Short engine name for log output.
    fn name(&self) -> &str {
        "engine"
    }
}

impl<E: SolvingEngine + ?Sized> SolvingEngine for &mut E {
    fn solve(&mut self, model: &ConstraintModel) -> Result<SolveOutcome, SolverError> {
        (**self).solve(model)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<E: SolvingEngine + ?Sized> SolvingEngine for Box<E> {
    fn solve(&mut self, model: &ConstraintModel) -> Result<SolveOutcome, SolverError> {
        (**self).solve(model)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
