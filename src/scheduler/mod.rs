//! Scheduling runs and output sinks.
//!
//! [`ShiftScheduler`] wires the whole pipeline together: validation, slot
//! domains, constraints, distinct enumeration, and projection. Projected
//! schedules are handed to a [`ScheduleSink`] one at a time.

mod pipeline;
mod sink;

pub use pipeline::{ScheduleReport, ShiftScheduler};
pub use sink::ScheduleSink;
