//! Availability-driven shift scheduling.
//!
//! Turns a per-slot availability table (who can attend at each discrete
//! time slot) into one or more complete, pairwise distinct person-to-slot
//! assignments that keep people in contiguous blocks and respect
//! per-person load bounds.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Person`, `Roster`, `AvailabilityGrid`,
//!   `SlotKey`, `Assignment`, `Solution`, `ProjectedSchedule`
//! - **`validation`**: Input integrity checks (grid dimensions, unknown
//!   people, duplicate headers)
//! - **`config`**: Run parameters and constraint weights
//! - **`cp`**: Constraint model, slot domains, constraint derivation, and
//!   the solving engine interface with a MILP-backed implementation
//! - **`enumerate`**: Distinct solution enumeration via blocking constraints
//! - **`projection`**: Solutions resolved to `(day, time) → name`
//! - **`scheduler`**: The end-to-end run and output sinks
//!
//! # Architecture
//!
//! Acquiring availability data and rendering schedules are left to the
//! caller; this crate starts at a deserialized [`models::AvailabilityGrid`]
//! and ends at a [`scheduler::ScheduleSink`]. Log records are emitted
//! through the `log` facade; installing a logger is the binary's job.
//!
//! # References
//!
//! - Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"

pub mod config;
pub mod cp;
pub mod enumerate;
pub mod error;
pub mod models;
pub mod projection;
pub mod scheduler;
pub mod validation;

pub use error::SchedulerError;
