//! Randomized checks of the MILP engine against exhaustive search.

use std::collections::BTreeSet;

use proptest::prelude::*;
use u_shift::config::{ScheduleConfig, SoftBlock};
use u_shift::cp::{
    contiguity_groups, ConstraintModel, MilpEngine, SlotVar, SolveOutcome, SolverError,
    SolvingEngine,
};
use u_shift::enumerate::{DistinctSolutionEnumerator, EnumerationState};
use u_shift::models::{
    Assignment, AvailabilityGrid, Headers, Person, PersonId, ProjectedSchedule, Roster, Solution,
};
use u_shift::scheduler::ShiftScheduler;

const NAMES: [&str; 3] = ["Ada", "Brook", "Cyd"];

/// Every feasible assignment of `model`.
fn all_feasible(model: &ConstraintModel) -> Vec<Assignment> {
    let slots: Vec<&SlotVar> = model.slots().collect();
    let mut out = Vec::new();
    extend(model, &slots, Assignment::new(), &mut out);
    out
}

fn extend(model: &ConstraintModel, slots: &[&SlotVar], partial: Assignment, out: &mut Vec<Assignment>) {
    match slots.split_first() {
        None => {
            if model.is_feasible(&partial) {
                out.push(partial);
            }
        }
        Some((var, rest)) => {
            for &person in var.domain() {
                extend(model, rest, partial.clone().with(var.key(), person), out);
            }
        }
    }
}

/// Brute-force engine returning a best-scoring feasible assignment.
struct ExhaustiveEngine;

impl SolvingEngine for ExhaustiveEngine {
    fn solve(&mut self, model: &ConstraintModel) -> Result<SolveOutcome, SolverError> {
        let best = all_feasible(model)
            .into_iter()
            .map(|a| {
                let score = model.soft_score(&a);
                Solution::new(a, score)
            })
            .max_by_key(|s| s.score);
        Ok(best.map_or(SolveOutcome::Unsat, SolveOutcome::Sat))
    }

    fn name(&self) -> &str {
        "exhaustive"
    }
}

fn scenario() -> impl Strategy<Value = (AvailabilityGrid, ScheduleConfig)> {
    (1usize..=2, 1usize..=3, 1usize..=3)
        .prop_flat_map(|(days, times, people)| {
            (
                Just((days, times, people)),
                prop::collection::vec(0u8..(1u8 << people), days * times),
                1usize..=3,
                0usize..=3,
                0usize..=3,
                1usize..=4,
            )
        })
        .prop_map(|((days, times, people), masks, hard, lower, spread, count)| {
            let roster = Roster::new(
                NAMES[..people]
                    .iter()
                    .enumerate()
                    .map(|(i, n)| Person::new(i as i64, *n)),
            );
            let cells: Vec<BTreeSet<PersonId>> = masks
                .iter()
                .map(|mask| {
                    (0..people)
                        .filter(|bit| mask & (1 << bit) != 0)
                        .map(|bit| PersonId(bit as i64))
                        .collect()
                })
                .collect();
            let headers = Headers::new(
                (0..days).map(|d| format!("D{d}")),
                (0..times).map(|t| format!("T{t}")),
            );
            let config = ScheduleConfig::new()
                .with_bounds(lower, lower + spread)
                .with_hard_block(hard)
                .with_soft_blocks(vec![SoftBlock::new(2, 10), SoftBlock::new(4, 15)])
                .with_schedule_count(count);
            (AvailabilityGrid::new(roster, headers, cells), config)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_enumeration_matches_exhaustive_search((grid, config) in scenario()) {
        let base = ShiftScheduler::new(config.clone()).build_model(&grid).unwrap();
        let mut remaining: Vec<(Assignment, u64)> = all_feasible(&base)
            .into_iter()
            .map(|a| {
                let score = base.soft_score(&a);
                (a, score)
            })
            .collect();
        let expected = remaining.len().min(config.schedule_count);

        let mut model = base.clone();
        let mut enumerator =
            DistinctSolutionEnumerator::new(&mut model, MilpEngine::new(), config.schedule_count);
        let mut seen: Vec<Assignment> = Vec::new();
        while let Some(solution) = enumerator.next_solution().unwrap() {
            prop_assert!(base.is_feasible(&solution.assignment));
            prop_assert!(!seen.contains(&solution.assignment));
            prop_assert_eq!(solution.score, base.soft_score(&solution.assignment));

            let best = remaining.iter().map(|(_, s)| *s).max().unwrap();
            prop_assert_eq!(solution.score, best);
            remaining.retain(|(a, _)| *a != solution.assignment);
            seen.push(solution.assignment);
        }

        prop_assert_eq!(seen.len(), expected);
        let state = enumerator.state();
        if expected == config.schedule_count {
            prop_assert_eq!(state, EnumerationState::Complete);
            prop_assert!(enumerator.report().shortfall().is_none());
        } else {
            prop_assert_eq!(state, EnumerationState::Exhausted);
            prop_assert!(enumerator.report().shortfall().is_some());
        }
    }

    #[test]
    fn test_projected_schedules_respect_availability((grid, config) in scenario()) {
        let scheduler = ShiftScheduler::new(config.clone());
        let model = scheduler.build_model(&grid).unwrap();
        let chunks = contiguity_groups(&model, config.hard_block);

        let mut schedules: Vec<ProjectedSchedule> = Vec::new();
        let report = scheduler.run(&grid, ExhaustiveEngine, &mut schedules).unwrap();

        prop_assert!(schedules.len() <= config.schedule_count);
        prop_assert_eq!(schedules.len(), report.produced());
        for schedule in &schedules {
            prop_assert_eq!(schedule.cell_count(), model.slot_count());
            for (key, name) in &schedule.cells {
                let available = grid.available_at(*key).unwrap();
                prop_assert!(!available.is_empty());
                prop_assert!(available
                    .iter()
                    .any(|id| grid.roster.name(*id) == Some(name.as_str())));
            }
            for pairs in &chunks {
                for (a, b) in pairs {
                    prop_assert_eq!(schedule.cells.get(a), schedule.cells.get(b));
                }
            }
        }
        for (i, a) in schedules.iter().enumerate() {
            for b in &schedules[i + 1..] {
                prop_assert_ne!(&a.cells, &b.cells);
            }
        }
    }
}
