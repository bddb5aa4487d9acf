//! Mixed-integer encoding of the constraint model, solved with `good_lp`.
//!
//! # Encoding
//!
//! - `x[s,p] ∈ {0,1}` for every slot `s` and person `p` in its domain, with
//!   `Σ_p x[s,p] = 1`.
//! - Equality of slots `a`, `b` (hard): `x[a,p] = x[b,p]` for every `p` in
//!   either domain (a missing column counts as 0).
//! - Every soft constraint gets an indicator `y ∈ {0,1}` whose weight enters
//!   the maximized objective; `y = 1` forces the constraint through big-M
//!   rows:
//!   - contiguity: `x[a,p] − x[b,p] + y ≤ 1` and `x[b,p] − x[a,p] + y ≤ 1`
//!   - max load `T`: `Σ_s x[s,p] + (n_p − T)·y ≤ n_p`
//!   - min load `T`: `Σ_s x[s,p] ≥ T·y`
//! - Blocking a previous model `m`: `Σ_s x[s,m(s)] ≤ |m| − 1`.
//!
//! `n_p` is the number of slots whose domain contains `p`.
//!
//! The reported score is recomputed from the decoded assignment, not read
//! from the LP objective.
//!
//! # Reference
//! Williams (2013), "Model Building in Mathematical Programming", Ch. 9

use std::collections::HashMap;
use std::time::Instant;

use good_lp::{
    constraint, default_solver, variable, Expression, ProblemVariables, ResolutionError,
    Solution as _, SolverModel, Variable,
};
use log::trace;

use super::engine::{SolveOutcome, SolverError, SolvingEngine};
use super::model::{Constraint, ConstraintModel, LoadBoundKind, Strength};
use crate::models::{Assignment, PersonId, SlotKey, Solution};

/// Solving engine backed by a MILP solver (`good_lp` + `microlp`).
///
/// Stateless between calls: the whole model is re-encoded on every solve.
#[derive(Debug, Clone, Default)]
pub struct MilpEngine {
    solves: usize,
}

impl MilpEngine {
    /// Creates a new engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `solve` calls made so far.
    pub fn solve_count(&self) -> usize {
        self.solves
    }
}

impl SolvingEngine for MilpEngine {
    fn solve(&mut self, model: &ConstraintModel) -> Result<SolveOutcome, SolverError> {
        self.solves += 1;
        model.validate().map_err(SolverError::InvalidModel)?;

        if let Some(outcome) = trivial_outcome(model) {
            return Ok(outcome);
        }

        let started = Instant::now();
        let encoding = Encoding::build(model);
        trace!(
            "encoded {} columns and {} rows",
            encoding.column_count,
            encoding.rows.len()
        );

        let Encoding {
            vars,
            choice,
            rows,
            objective,
            ..
        } = encoding;
        let problem = vars.maximise(objective).using(default_solver);
        let problem = rows.into_iter().fold(problem, |p, row| p.with(row));

        let solved = match problem.solve() {
            Ok(solved) => solved,
            Err(ResolutionError::Infeasible) => {
                trace!("infeasible after {:.2?}", started.elapsed());
                return Ok(SolveOutcome::Unsat);
            }
            Err(e) => return Err(SolverError::Backend(e.to_string())),
        };

        let mut assignment = Assignment::new();
        for slot in model.slots() {
            let key = slot.key();
            let chosen = slot
                .domain()
                .iter()
                .filter_map(|p| choice.get(&(key, *p)).map(|v| (*p, solved.value(*v))))
                .max_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(p, _)| p);
            match chosen {
                Some(person) => assignment.assign(key, person),
                None => return Err(SolverError::InfeasibleModel),
            }
        }

        if !model.is_feasible(&assignment) {
            return Err(SolverError::InfeasibleModel);
        }
        let score = model.soft_score(&assignment);
        trace!("solved in {:.2?}, score {}", started.elapsed(), score);
        Ok(SolveOutcome::Sat(Solution::new(assignment, score)))
    }

    fn name(&self) -> &str {
        "microlp"
    }
}

/// Decides models the MILP cannot express without constant-only rows.
fn trivial_outcome(model: &ConstraintModel) -> Option<SolveOutcome> {
    if model.slot_count() == 0 {
        let empty = Assignment::new();
        return Some(if model.is_feasible(&empty) {
            let score = model.soft_score(&empty);
            SolveOutcome::Sat(Solution::new(empty, score))
        } else {
            SolveOutcome::Unsat
        });
    }

    let impossible = model.hard_constraints().any(|c| match c {
        Constraint::Distinct { previous } => previous.is_empty(),
        Constraint::Load {
            person,
            kind: LoadBoundKind::Min,
            threshold,
        } => coverage(model, *person) < *threshold,
        _ => false,
    });
    impossible.then_some(SolveOutcome::Unsat)
}

/// Number of slots whose domain contains `person`.
fn coverage(model: &ConstraintModel, person: PersonId) -> usize {
    model.slots().filter(|s| s.allows(person)).count()
}

struct Encoding {
    vars: ProblemVariables,
    choice: HashMap<(SlotKey, PersonId), Variable>,
    rows: Vec<good_lp::Constraint>,
    objective: Expression,
    column_count: usize,
}

impl Encoding {
    fn build(model: &ConstraintModel) -> Self {
        let mut enc = Self {
            vars: ProblemVariables::new(),
            choice: HashMap::new(),
            rows: Vec::new(),
            objective: Expression::from(0.0),
            column_count: 0,
        };

        for slot in model.slots() {
            let mut one_of = Expression::from(0.0);
            for &person in slot.domain() {
                let x = enc.binary();
                enc.choice.insert((slot.key(), person), x);
                one_of += x;
            }
            enc.rows.push(constraint!(one_of == 1.0));
        }

        for wc in model.constraints() {
            match wc.strength {
                Strength::Hard => enc.post_hard(model, &wc.constraint),
                Strength::Soft(weight) => enc.post_soft(model, &wc.constraint, weight),
            }
        }
        enc
    }

    fn binary(&mut self) -> Variable {
        self.column_count += 1;
        self.vars.add(variable().binary())
    }

    fn column(&self, key: SlotKey, person: PersonId) -> Expression {
        match self.choice.get(&(key, person)) {
            Some(x) => Expression::from(*x),
            None => Expression::from(0.0),
        }
    }

    /// `x[a,p] − x[b,p]` for every person in either domain.
    fn differences(&self, model: &ConstraintModel, a: SlotKey, b: SlotKey) -> Vec<Expression> {
        let mut people: Vec<PersonId> = Vec::new();
        for key in [a, b] {
            if let Some(slot) = model.slot(key) {
                people.extend(slot.domain().iter().copied());
            }
        }
        people.sort_unstable();
        people.dedup();
        people
            .into_iter()
            .map(|p| self.column(a, p) - self.column(b, p))
            .collect()
    }

    fn load(&self, model: &ConstraintModel, person: PersonId) -> Expression {
        let mut count = Expression::from(0.0);
        for slot in model.slots() {
            if let Some(x) = self.choice.get(&(slot.key(), person)) {
                count += *x;
            }
        }
        count
    }

    fn matched(&self, previous: &Assignment) -> Expression {
        let mut matched = Expression::from(0.0);
        for (key, person) in previous.iter() {
            if let Some(x) = self.choice.get(&(key, person)) {
                matched += *x;
            }
        }
        matched
    }

    fn post_hard(&mut self, model: &ConstraintModel, constraint: &Constraint) {
        match constraint {
            Constraint::Contiguous { pairs } => {
                for (a, b) in pairs {
                    for diff in self.differences(model, *a, *b) {
                        self.rows.push(constraint!(diff == 0.0));
                    }
                }
            }
            Constraint::Load {
                person,
                kind,
                threshold,
            } => {
                let count = self.load(model, *person);
                let bound = *threshold as f64;
                match kind {
                    LoadBoundKind::Max => {
                        if coverage(model, *person) > *threshold {
                            self.rows.push(constraint!(count <= bound));
                        }
                    }
                    LoadBoundKind::Min => {
                        if *threshold > 0 {
                            self.rows.push(constraint!(count >= bound));
                        }
                    }
                }
            }
            Constraint::Distinct { previous } => {
                let matched = self.matched(previous);
                let limit = previous.len() as f64 - 1.0;
                self.rows.push(constraint!(matched <= limit));
            }
        }
    }

    fn post_soft(&mut self, model: &ConstraintModel, constraint: &Constraint, weight: u32) {
        match constraint {
            Constraint::Contiguous { pairs } => {
                if pairs.is_empty() {
                    return;
                }
                let y = self.reward(weight);
                for (a, b) in pairs {
                    for diff in self.differences(model, *a, *b) {
                        let up = diff.clone() + y;
                        let down = Expression::from(y) - diff;
                        self.rows.push(constraint!(up <= 1.0));
                        self.rows.push(constraint!(down <= 1.0));
                    }
                }
            }
            Constraint::Load {
                person,
                kind,
                threshold,
            } => {
                let covered = coverage(model, *person);
                let count = self.load(model, *person);
                match kind {
                    LoadBoundKind::Max => {
                        // Unreachable bounds hold in every model.
                        if covered <= *threshold {
                            return;
                        }
                        let y = self.reward(weight);
                        let slack = (covered - *threshold) as f64;
                        let lhs = count + slack * y;
                        let rhs = covered as f64;
                        self.rows.push(constraint!(lhs <= rhs));
                    }
                    LoadBoundKind::Min => {
                        if *threshold == 0 {
                            return;
                        }
                        let y = self.reward(weight);
                        let rhs = (*threshold as f64) * y;
                        self.rows.push(constraint!(count >= rhs));
                    }
                }
            }
            Constraint::Distinct { previous } => {
                if previous.is_empty() {
                    return;
                }
                let y = self.reward(weight);
                let lhs = self.matched(previous) + y;
                let rhs = previous.len() as f64;
                self.rows.push(constraint!(lhs <= rhs));
            }
        }
    }

    /// New indicator carrying `weight` in the objective.
    fn reward(&mut self, weight: u32) -> Variable {
        let y = self.binary();
        self.objective += f64::from(weight) * y;
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::{ConstraintBuilder, ConstraintModel};

    fn k(day: usize, time: usize) -> SlotKey {
        SlotKey::new(day, time)
    }

    fn grid_model(days: usize, times: usize, people: &[i64]) -> ConstraintModel {
        let mut model = ConstraintModel::new(days, times);
        for day in 0..days {
            for time in 0..times {
                model.add_slot(k(day, time), people.iter().map(|&p| PersonId(p)));
            }
        }
        model
    }

    fn expect_sat(outcome: SolveOutcome) -> Solution {
        match outcome {
            SolveOutcome::Sat(solution) => solution,
            SolveOutcome::Unsat => panic!("expected a model"),
        }
    }

    #[test]
    fn test_solution_respects_domains() {
        let mut model = ConstraintModel::new(1, 3);
        model.add_slot(k(0, 0), [PersonId(1)]);
        model.add_slot(k(0, 1), [PersonId(2)]);
        model.add_slot(k(0, 2), [PersonId(1), PersonId(3)]);

        let solution = expect_sat(MilpEngine::new().solve(&model).unwrap());
        assert_eq!(solution.assignment.get(k(0, 0)), Some(PersonId(1)));
        assert_eq!(solution.assignment.get(k(0, 1)), Some(PersonId(2)));
        assert!(model.is_feasible(&solution.assignment));
    }

    #[test]
    fn test_hard_contiguity_with_disjoint_domains_is_unsat() {
        let mut model = ConstraintModel::new(1, 2);
        model.add_slot(k(0, 0), [PersonId(1)]);
        model.add_slot(k(0, 1), [PersonId(2)]);
        ConstraintBuilder::new(&mut model).hard_contiguity(2);

        assert_eq!(MilpEngine::new().solve(&model).unwrap(), SolveOutcome::Unsat);
    }

    #[test]
    fn test_soft_contiguity_is_maximized() {
        let mut model = ConstraintModel::new(1, 4);
        model.add_slot(k(0, 0), [PersonId(1)]);
        model.add_slot(k(0, 1), [PersonId(1), PersonId(2)]);
        model.add_slot(k(0, 2), [PersonId(1), PersonId(2)]);
        model.add_slot(k(0, 3), [PersonId(2)]);
        let mut builder = ConstraintBuilder::new(&mut model);
        builder.soft_contiguity(2, 10);

        // Chunks [0,1] and [2,3] can both be kept whole.
        let solution = expect_sat(MilpEngine::new().solve(&model).unwrap());
        assert_eq!(solution.score, 20);
        assert_eq!(solution.assignment.get(k(0, 1)), Some(PersonId(1)));
        assert_eq!(solution.assignment.get(k(0, 2)), Some(PersonId(2)));
    }

    #[test]
    fn test_load_bounds_outweigh_contiguity() {
        let mut model = grid_model(1, 4, &[1, 2]);
        let mut builder = ConstraintBuilder::new(&mut model);
        builder.soft_contiguity(4, 10);
        builder.load_bound(LoadBoundKind::Max, 2, 100);

        // Keeping all four slots together breaks one person's max load.
        let solution = expect_sat(MilpEngine::new().solve(&model).unwrap());
        assert_eq!(solution.score, 200);
        assert_eq!(solution.assignment.load_of(PersonId(1)), 2);
        assert_eq!(solution.assignment.load_of(PersonId(2)), 2);
    }

    #[test]
    fn test_min_load_bound() {
        let mut model = grid_model(1, 3, &[1, 2]);
        ConstraintBuilder::new(&mut model).load_bound(LoadBoundKind::Min, 2, 100);

        // Only one of the two people can reach two of three slots.
        let solution = expect_sat(MilpEngine::new().solve(&model).unwrap());
        assert_eq!(solution.score, 100);
    }

    #[test]
    fn test_blocking_excludes_previous_model() {
        let mut model = grid_model(1, 2, &[1, 2]);
        ConstraintBuilder::new(&mut model).hard_contiguity(2);
        let mut engine = MilpEngine::new();

        let first = expect_sat(engine.solve(&model).unwrap());
        model.block(&first.assignment);
        let second = expect_sat(engine.solve(&model).unwrap());
        assert!(second.assignment.differs_from(&first.assignment));
        model.block(&second.assignment);

        assert_eq!(engine.solve(&model).unwrap(), SolveOutcome::Unsat);
        assert_eq!(engine.solve_count(), 3);
    }

    #[test]
    fn test_empty_model() {
        let mut model = ConstraintModel::new(2, 2);
        let mut engine = MilpEngine::new();

        let first = expect_sat(engine.solve(&model).unwrap());
        assert!(first.assignment.is_empty());
        model.block(&first.assignment);
        assert_eq!(engine.solve(&model).unwrap(), SolveOutcome::Unsat);
    }

    #[test]
    fn test_invalid_model_is_an_error() {
        let mut model = grid_model(1, 1, &[1]);
        model.add_hard(Constraint::Contiguous {
            pairs: vec![(k(0, 0), k(3, 3))],
        });
        let err = MilpEngine::new().solve(&model).unwrap_err();
        assert!(matches!(err, SolverError::InvalidModel(_)));
    }
}
