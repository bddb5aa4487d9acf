//! Run configuration.
//!
//! # Weight ordering
//!
//! The default weights encode a deliberate priority:
//!
//! | Constraint | Default weight |
//! |------------|----------------|
//! | Per-person load bound (min and max) | 100 |
//! | Soft contiguity, 16-slot chunks | 15 |
//! | Soft contiguity, 8-slot chunks | 10 |
//!
//! Load bounds must dominate every contiguity preference, and a longer
//! contiguity tier must weigh at least as much as a shorter one. The exact
//! numbers are tunable; [`ScheduleConfig::validate`] logs a warning when a
//! configuration breaks the ordering.

use log::warn;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::validation::{ValidationError, ValidationErrorKind, ValidationResult};

/// A soft contiguity tier: chunk length and reward per kept chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftBlock {
    /// Chunk length in slots.
    pub length: usize,
    /// Weight earned by each chunk kept with one person.
    pub weight: u32,
}

impl SoftBlock {
    /// Creates a tier.
    pub fn new(length: usize, weight: u32) -> Self {
        Self { length, weight }
    }
}

/// Parameters of a scheduling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Preferred minimum number of slots per person.
    pub lower_bound: usize,
    /// Preferred maximum number of slots per person.
    pub upper_bound: usize,
    /// Number of distinct schedules to produce.
    pub schedule_count: usize,
    /// Names of people never to assign.
    pub excluded: Vec<String>,
    /// Chunk length that must stay with one person.
    pub hard_block: usize,
    /// Preferred chunk lengths and their weights.
    pub soft_blocks: Vec<SoftBlock>,
    /// Weight of each per-person load bound.
    pub load_weight: u32,
    /// Wall-clock budget for the whole enumeration, in milliseconds.
    pub time_budget_ms: Option<u64>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            lower_bound: 4,
            upper_bound: 16,
            schedule_count: 1,
            excluded: Vec::new(),
            hard_block: 4,
            soft_blocks: vec![SoftBlock::new(8, 10), SoftBlock::new(16, 15)],
            load_weight: 100,
            time_budget_ms: None,
        }
    }
}

impl ScheduleConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the preferred per-person slot range.
    pub fn with_bounds(mut self, lower: usize, upper: usize) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    /// Sets the number of schedules to produce.
    pub fn with_schedule_count(mut self, count: usize) -> Self {
        self.schedule_count = count;
        self
    }

    /// Sets the names to exclude.
    pub fn with_excluded<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.excluded = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the hard block length.
    pub fn with_hard_block(mut self, length: usize) -> Self {
        self.hard_block = length;
        self
    }

    /// Replaces the soft contiguity tiers.
    pub fn with_soft_blocks(mut self, blocks: Vec<SoftBlock>) -> Self {
        self.soft_blocks = blocks;
        self
    }

    /// Sets the load bound weight.
    pub fn with_load_weight(mut self, weight: u32) -> Self {
        self.load_weight = weight;
        self
    }

    /// Sets the enumeration time budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget_ms = Some(u64::try_from(budget.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// The enumeration time budget, if any.
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }

    /// Validates parameter ranges.
    ///
    /// Out-of-range values are errors. A weight ordering that contradicts
    /// the documented priority is only logged.
    pub fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();

        if self.schedule_count == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidParameter,
                "schedule count must be at least 1",
            ));
        }
        if self.hard_block == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidParameter,
                "hard block length must be at least 1",
            ));
        }
        for block in &self.soft_blocks {
            if block.length == 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidParameter,
                    "soft block length must be at least 1",
                ));
            }
        }

        for issue in self.weight_order_issues() {
            warn!("{issue}");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Every place the weights break the intended ordering, plus an
    /// inverted min/max load range.
    pub fn weight_order_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if let Some(max_soft) = self.soft_blocks.iter().map(|b| b.weight).max() {
            if self.load_weight <= max_soft {
                issues.push(format!(
                    "load weight {} does not dominate contiguity weight {}",
                    self.load_weight, max_soft
                ));
            }
        }

        let mut tiers = self.soft_blocks.clone();
        tiers.sort_by_key(|b| b.length);
        for pair in tiers.windows(2) {
            if pair[1].length > pair[0].length && pair[1].weight < pair[0].weight {
                issues.push(format!(
                    "contiguity tier L={} (w={}) weighs less than shorter tier L={} (w={})",
                    pair[1].length, pair[1].weight, pair[0].length, pair[0].weight
                ));
            }
        }

        if self.lower_bound > self.upper_bound {
            issues.push(format!(
                "lower bound {} exceeds upper bound {}; both cannot hold",
                self.lower_bound, self.upper_bound
            ));
        }
        issues
    }
}
