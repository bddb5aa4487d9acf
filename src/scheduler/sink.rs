//! Output sinks for projected schedules.

use crate::error::SinkError;
use crate::models::ProjectedSchedule;

/// Receives projected schedules one at a time, in the order found.
///
/// Presentation (layout, colours, file format) is entirely the sink's
/// concern.
pub trait ScheduleSink {
    /// Accepts the next schedule.
    fn accept(&mut self, schedule: ProjectedSchedule) -> Result<(), SinkError>;
}

impl ScheduleSink for Vec<ProjectedSchedule> {
    fn accept(&mut self, schedule: ProjectedSchedule) -> Result<(), SinkError> {
        self.push(schedule);
        Ok(())
    }
}

impl<S: ScheduleSink + ?Sized> ScheduleSink for &mut S {
    fn accept(&mut self, schedule: ProjectedSchedule) -> Result<(), SinkError> {
        (**self).accept(schedule)
    }
}
