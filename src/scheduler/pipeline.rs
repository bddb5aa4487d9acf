//! End-to-end scheduling run.
//!
//! # Algorithm
//!
//! 1. Validate the configuration and the availability grid.
//! 2. Build one variable per populated slot, minus excluded people.
//! 3. Add the hard block constraint, the soft contiguity tiers, and the
//!    min/max load bounds.
//! 4. Enumerate distinct schedules, projecting each one and handing it to
//!    the sink as soon as it is found.
//! 5. Report how many were produced; a shortfall is logged and returned
//!    as status, never as an error.

use log::{error, info};

use super::sink::ScheduleSink;
use crate::config::ScheduleConfig;
use crate::cp::{ConstraintBuilder, ConstraintModel, LoadBoundKind, SlotDomainBuilder, SolvingEngine};
use crate::enumerate::{DistinctSolutionEnumerator, EnumerationReport, EnumerationState, Shortfall};
use crate::error::SchedulerError;
use crate::models::AvailabilityGrid;
use crate::projection::ResultProjector;

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleReport {
    /// Enumeration outcome.
    pub enumeration: EnumerationReport,
    /// Populated slots in the model.
    pub slot_count: usize,
    /// Scores of the delivered schedules, in order.
    pub scores: Vec<u64>,
}

impl ScheduleReport {
    /// Schedules requested.
    pub fn requested(&self) -> usize {
        self.enumeration.requested
    }

    /// Schedules delivered to the sink.
    pub fn produced(&self) -> usize {
        self.enumeration.produced
    }

    /// Why enumeration stopped.
    pub fn state(&self) -> EnumerationState {
        self.enumeration.state
    }

    /// The shortfall, if fewer schedules than requested were produced.
    pub fn shortfall(&self) -> Option<Shortfall> {
        self.enumeration.shortfall()
    }
}

/// Runs the full availability → schedules pipeline.
///
/// # Example
///
/// ```
/// use u_shift::config::ScheduleConfig;
/// use u_shift::cp::MilpEngine;
/// use u_shift::models::{AvailabilityGrid, Headers, Person, ProjectedSchedule, Roster};
/// use u_shift::scheduler::ShiftScheduler;
///
/// let roster = Roster::new(vec![Person::new(1, "Ada"), Person::new(2, "Brook")]);
/// let grid = AvailabilityGrid::fully_available(roster, Headers::new(["Mon", "Tue"], ["9:00", "9:15"]));
///
/// let scheduler = ShiftScheduler::new(ScheduleConfig::new().with_schedule_count(2));
/// let mut schedules: Vec<ProjectedSchedule> = Vec::new();
/// let report = scheduler.run(&grid, MilpEngine::new(), &mut schedules).unwrap();
///
/// assert_eq!(report.produced(), 2);
/// assert!(report.shortfall().is_none());
/// assert_ne!(schedules[0].cells, schedules[1].cells);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShiftScheduler {
    config: ScheduleConfig,
}

impl ShiftScheduler {
    /// Creates a scheduler with the given configuration.
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config }
    }

    /// The run configuration.
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Validates inputs and builds the full constraint model.
    ///
    /// # Errors
    /// [`SchedulerError::Configuration`] for invalid parameters or a
    /// malformed grid.
    pub fn build_model(&self, grid: &AvailabilityGrid) -> Result<ConstraintModel, SchedulerError> {
        self.config.validate()?;

        let mut model = SlotDomainBuilder::new(grid)
            .excluding(&self.config.excluded)
            .build()?;

        let mut builder = ConstraintBuilder::new(&mut model);
        let mut added = builder.hard_contiguity(self.config.hard_block);
        for block in &self.config.soft_blocks {
            added += builder.soft_contiguity(block.length, block.weight);
        }
        added += builder.load_bound(
            LoadBoundKind::Max,
            self.config.upper_bound,
            self.config.load_weight,
        );
        added += builder.load_bound(
            LoadBoundKind::Min,
            self.config.lower_bound,
            self.config.load_weight,
        );
        info!("added {} constraints, solving", added);

        Ok(model)
    }

    /// Runs the pipeline, delivering each schedule to `sink` as it is found.
    ///
    /// Schedules already delivered stay delivered if a later step fails.
    ///
    /// # Errors
    /// - [`SchedulerError::Configuration`] before any solving
    /// - [`SchedulerError::Solver`] if the engine fails
    /// - [`SchedulerError::Projection`] / [`SchedulerError::Sink`] if a
    ///   schedule cannot be delivered
    pub fn run<E, S>(
        &self,
        grid: &AvailabilityGrid,
        engine: E,
        mut sink: S,
    ) -> Result<ScheduleReport, SchedulerError>
    where
        E: SolvingEngine,
        S: ScheduleSink,
    {
        let mut model = self.build_model(grid)?;
        let slot_count = model.slot_count();
        let projector = ResultProjector::new(&grid.roster);

        let mut enumerator =
            DistinctSolutionEnumerator::new(&mut model, engine, self.config.schedule_count);
        if let Some(budget) = self.config.time_budget() {
            enumerator = enumerator.with_time_limit(budget);
        }

        let mut scores = Vec::new();
        while let Some(solution) = enumerator.next_solution()? {
            let projected = projector.project(scores.len(), &solution)?;
            scores.push(solution.score);
            sink.accept(projected).map_err(SchedulerError::Sink)?;
        }

        let report = ScheduleReport {
            enumeration: enumerator.report(),
            slot_count,
            scores,
        };
        if let Some(shortfall) = report.shortfall() {
            error!("{} ({:?})", shortfall, report.state());
        }
        Ok(report)
    }
}
