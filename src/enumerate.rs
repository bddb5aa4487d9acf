//! Distinct solution enumeration.
//!
//! # Algorithm
//!
//! 1. Ask the engine for an optimal model of the current constraint set.
//! 2. If there is none, the space is exhausted.
//! 3. Otherwise emit it, then add a blocking constraint requiring at least
//!    one slot to differ from it, and repeat until `N` models are emitted.
//!
//! Because constraints only accumulate, each emitted model is the best one
//! remaining at that point: scores are non-increasing in emission order,
//! and no two emitted models agree on every slot.
//!
//! # States
//!
//! ```text
//! Searching ──sat──▶ Emit ──▶ Searching | Complete
//!     │
//!     ├──unsat──────▶ Exhausted
//!     ├──deadline───▶ BudgetExceeded
//!     └──error──────▶ Failed
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::cp::{ConstraintModel, SolveOutcome, SolverError, SolvingEngine};
use crate::models::Solution;

/// Enumerator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumerationState {
    /// Ready to ask the engine for the next model.
    Searching,
    /// A model was found and is being emitted and blocked.
    Emit,
    /// The requested number of models was emitted.
    Complete,
    /// The engine reported no further model.
    Exhausted,
    /// The time budget ran out before the next solve.
    BudgetExceeded,
    /// The engine failed.
    Failed,
}

impl EnumerationState {
    /// Whether no further models will be produced.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, EnumerationState::Searching | EnumerationState::Emit)
    }
}

/// Fewer distinct models were produced than requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    /// Models requested.
    pub requested: usize,
    /// Models produced.
    pub produced: usize,
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "couldn't generate {} unique assignments (produced {})",
            self.requested, self.produced
        )
    }
}

/// Outcome of an enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumerationReport {
    /// Models requested.
    pub requested: usize,
    /// Models emitted.
    pub produced: usize,
    /// State the enumerator stopped in.
    pub state: EnumerationState,
}

impl EnumerationReport {
    /// The shortfall, if fewer models than requested were produced.
    pub fn shortfall(&self) -> Option<Shortfall> {
        (self.produced < self.requested).then_some(Shortfall {
            requested: self.requested,
            produced: self.produced,
        })
    }

    /// Whether every requested model was produced.
    pub fn is_complete(&self) -> bool {
        self.shortfall().is_none()
    }
}

/// Produces up to `N` pairwise distinct models of a constraint model.
///
/// The enumerator extends the model with one blocking constraint per
/// emitted solution; the model is left in that state afterwards.
///
/// # Example
/// ```
/// use u_shift::cp::{ConstraintBuilder, ConstraintModel, MilpEngine};
/// use u_shift::enumerate::{DistinctSolutionEnumerator, EnumerationState};
/// use u_shift::models::{PersonId, SlotKey};
///
/// let mut model = ConstraintModel::new(1, 2);
/// model.add_slot(SlotKey::new(0, 0), [PersonId(1), PersonId(2)]);
/// model.add_slot(SlotKey::new(0, 1), [PersonId(1), PersonId(2)]);
/// ConstraintBuilder::new(&mut model).hard_contiguity(2);
///
/// let mut enumerator = DistinctSolutionEnumerator::new(&mut model, MilpEngine::new(), 5);
/// let solutions = enumerator.collect_solutions().unwrap();
/// assert_eq!(solutions.len(), 2);
/// assert_eq!(enumerator.state(), EnumerationState::Exhausted);
/// assert!(enumerator.report().shortfall().is_some());
/// ```
pub struct DistinctSolutionEnumerator<'m, E> {
    model: &'m mut ConstraintModel,
    engine: E,
    requested: usize,
    emitted: usize,
    state: EnumerationState,
    time_limit: Option<Duration>,
    started: Option<Instant>,
}

impl<'m, E: SolvingEngine> DistinctSolutionEnumerator<'m, E> {
    /// Creates an enumerator asking for `requested` models.
    pub fn new(model: &'m mut ConstraintModel, engine: E, requested: usize) -> Self {
        Self {
            model,
            engine,
            requested,
            emitted: 0,
            state: EnumerationState::Searching,
            time_limit: None,
            started: None,
        }
    }

    /// Limits the wall-clock time spent enumerating.
    ///
    /// The budget is checked before each solve; a solve already running is
    /// not interrupted.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Current state.
    pub fn state(&self) -> EnumerationState {
        self.state
    }

    /// Number of models emitted so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Summary of the enumeration so far.
    pub fn report(&self) -> EnumerationReport {
        EnumerationReport {
            requested: self.requested,
            produced: self.emitted,
            state: self.state,
        }
    }

    /// Produces the next distinct model.
    ///
    /// Returns `Ok(None)` once the enumerator is in a terminal state.
    ///
    /// # Errors
    /// Propagates engine failures; the enumerator then moves to
    /// [`EnumerationState::Failed`] and does not retry.
    pub fn next_solution(&mut self) -> Result<Option<Solution>, SolverError> {
        if self.state.is_terminal() {
            return Ok(None);
        }
        if self.emitted >= self.requested {
            self.state = EnumerationState::Complete;
            return Ok(None);
        }

        let started = *self.started.get_or_insert_with(Instant::now);
        if let Some(limit) = self.time_limit {
            if started.elapsed() >= limit {
                warn!(
                    "time budget of {:?} spent after {} of {} schedules",
                    limit, self.emitted, self.requested
                );
                self.state = EnumerationState::BudgetExceeded;
                return Ok(None);
            }
        }

        debug!(
            "solving for schedule {} with {} ({} constraints)",
            self.emitted + 1,
            self.engine.name(),
            self.model.constraint_count()
        );
        let outcome = match self.engine.solve(self.model) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.state = EnumerationState::Failed;
                return Err(e);
            }
        };

        match outcome {
            SolveOutcome::Unsat => {
                debug!("no further distinct model after {}", self.emitted);
                self.state = EnumerationState::Exhausted;
                Ok(None)
            }
            SolveOutcome::Sat(solution) => {
                self.state = EnumerationState::Emit;
                self.model.block(&solution.assignment);
                self.emitted += 1;
                info!(
                    "found schedule {} (score {})",
                    self.emitted, solution.score
                );
                self.state = if self.emitted == self.requested {
                    EnumerationState::Complete
                } else {
                    EnumerationState::Searching
                };
                Ok(Some(solution))
            }
        }
    }

    /// Runs to a terminal state and returns every emitted model.
    pub fn collect_solutions(&mut self) -> Result<Vec<Solution>, SolverError> {
        let mut solutions = Vec::new();
        while let Some(solution) = self.next_solution()? {
            solutions.push(solution);
        }
        Ok(solutions)
    }
}

impl<E: SolvingEngine> Iterator for DistinctSolutionEnumerator<'_, E> {
    type Item = Result<Solution, SolverError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_solution().transpose()
    }
}
