//! Run-level errors.

use thiserror::Error;

use crate::cp::SolverError;
use crate::projection::ProjectionError;
use crate::validation::ValidationError;

/// Error returned by an output sink.
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Fatal failure of a scheduling run.
///
/// Running out of distinct schedules is not an error; see
/// [`crate::scheduler::ScheduleReport::shortfall`].
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Invalid grid or parameters; nothing was solved.
    #[error("invalid configuration: {}", describe(.0))]
    Configuration(Vec<ValidationError>),
    /// The solving engine failed.
    #[error(transparent)]
    Solver(#[from] SolverError),
    /// A solution could not be resolved to names.
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    /// The output sink rejected a schedule.
    #[error("output sink failed: {0}")]
    Sink(#[source] SinkError),
}

impl From<Vec<ValidationError>> for SchedulerError {
    fn from(errors: Vec<ValidationError>) -> Self {
        SchedulerError::Configuration(errors)
    }
}

fn describe(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
