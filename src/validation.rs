//! Input validation for shift scheduling runs.
//!
//! Checks structural integrity of the availability grid before any model
//! is built. Detects:
//! - Cell count that does not match the day × time headers
//! - Availability entries naming people missing from the roster
//! - Duplicate day or time labels
//!
//! Every problem is collected; callers get the full list rather than the
//! first failure.

use crate::models::AvailabilityGrid;
use std::collections::HashSet;
use std::fmt;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Cell count differs from `days × times`.
    DimensionMismatch,
    /// A cell references a person id absent from the roster.
    UnknownPerson,
    /// Two day labels or two time labels are equal.
    DuplicateHeader,
    /// A run parameter is out of range.
    InvalidParameter,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validates an availability grid.
///
/// Checks:
/// 1. `cells.len() == days.len() * times.len()`
/// 2. No duplicate day labels, no duplicate time labels
/// 3. Every person id in a cell is known to the roster
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_grid(grid: &AvailabilityGrid) -> ValidationResult {
    let mut errors = Vec::new();

    let expected = grid.headers.cell_count();
    if grid.cells.len() != expected {
        errors.push(ValidationError::new(
            ValidationErrorKind::DimensionMismatch,
            format!(
                "headers describe {} slots ({} days x {} times) but {} availability slots were given",
                expected,
                grid.day_count(),
                grid.times_per_day(),
                grid.cells.len()
            ),
        ));
    }

    check_unique("day", &grid.headers.days, &mut errors);
    check_unique("time", &grid.headers.times, &mut errors);

    let mut reported = HashSet::new();
    for (index, cell) in grid.cells.iter().enumerate() {
        for id in cell {
            if !grid.roster.contains(*id) && reported.insert(*id) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownPerson,
                    format!("Slot {index} references unknown person id {id}"),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_unique(what: &str, labels: &[String], errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for label in labels {
        if !seen.insert(label.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateHeader,
                format!("Duplicate {what} header: {label}"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AvailabilityGrid, Headers, Person, PersonId, Roster};
    use std::collections::BTreeSet;

    fn roster() -> Roster {
        Roster::new(vec![Person::new(1, "Ada"), Person::new(2, "Brook")])
    }

    fn cells(n: usize) -> Vec<BTreeSet<PersonId>> {
        vec![[PersonId(1), PersonId(2)].into_iter().collect(); n]
    }

    #[test]
    fn test_valid_grid() {
        let grid = AvailabilityGrid::new(roster(), Headers::new(["Mon", "Tue"], ["9", "10"]), cells(4));
        assert!(validate_grid(&grid).is_ok());
    }

    #[test]
    fn test_dimension_mismatch() {
        let grid = AvailabilityGrid::new(roster(), Headers::new(["Mon", "Tue"], ["9", "10"]), cells(3));
        let errors = validate_grid(&grid).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DimensionMismatch && e.message.contains("4")));
    }

    #[test]
    fn test_unknown_person_reported_once() {
        let mut c = cells(2);
        c[0].insert(PersonId(9));
        c[1].insert(PersonId(9));
        let grid = AvailabilityGrid::new(roster(), Headers::new(["Mon"], ["9", "10"]), c);

        let errors = validate_grid(&grid).unwrap_err();
        let unknown: Vec<_> = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::UnknownPerson)
            .collect();
        assert_eq!(unknown.len(), 1);
    }

    #[test]
    fn test_duplicate_headers() {
        let grid = AvailabilityGrid::new(roster(), Headers::new(["Mon", "Mon"], ["9"]), cells(2));
        let errors = validate_grid(&grid).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateHeader && e.message.contains("day")));
    }

    #[test]
    fn test_multiple_errors() {
        let mut c = cells(1);
        c[0].insert(PersonId(7));
        let grid = AvailabilityGrid::new(roster(), Headers::new(["Mon"], ["9", "9"]), c);

        let errors = validate_grid(&grid).unwrap_err();
        assert!(errors.len() >= 3);
    }

    #[test]
    fn test_error_display() {
        let e = ValidationError::new(ValidationErrorKind::InvalidParameter, "count must be >= 1");
        assert_eq!(e.to_string(), "InvalidParameter: count must be >= 1");
    }
}
