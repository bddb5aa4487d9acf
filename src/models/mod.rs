//! Shift scheduling domain models.
//!
//! Provides the data types that flow through a scheduling run: the people
//! who can be assigned, the availability grid they reported, and the
//! solutions and projected schedules that come out.
//!
//! # Domain Mappings
//!
//! | u-shift | Meetings | Staffing | Tutoring |
//! |---------|----------|----------|----------|
//! | Person | Attendee | Employee | Tutor |
//! | Slot | Time block | Shift unit | Session slot |
//! | Solution | Agenda | Rota | Timetable |

mod grid;
mod person;
mod schedule;

pub use grid::{AvailabilityGrid, Headers, SlotKey};
pub use person::{Person, PersonId, Roster};
pub use schedule::{Assignment, ProjectedSchedule, Solution};
