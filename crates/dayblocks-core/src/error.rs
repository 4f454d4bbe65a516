//! Error types for the scheduling engine.
//!
//! Validation failures are data, not panics: every rule violation is
//! returned inside a [`crate::ScheduleResult`] so the caller can surface
//! or regenerate. Only malformed input shape is treated as a programming
//! error and fails fast with [`EngineError`].

use chrono::NaiveTime;
use thiserror::Error;

use crate::block::TimeBlock;
use crate::extract::FixedCommitment;

/// A named rule violation for one candidate placement.
///
/// The `Display` form is the human-readable `reason` string carried in
/// rejection diagnostics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Snapped start or end falls outside the day window.
    #[error("block {}-{} is outside working hours", start.format("%H:%M"), end.format("%H:%M"))]
    OutOfBounds { start: NaiveTime, end: NaiveTime },

    /// The candidate intersects an already accepted block.
    #[error("overlaps with {} ({}-{})", conflicting.task, conflicting.start_time.format("%H:%M"), conflicting.end_time().format("%H:%M"))]
    Overlap { conflicting: TimeBlock },

    /// Duration outside the range allowed for the block's category.
    #[error("{}", duration_message(*min, *max, *actual))]
    InvalidDuration {
        min: i64,
        /// Upper bound, or `None` when only a minimum applies.
        max: Option<i64>,
        actual: i64,
    },

    /// The candidate is not fully contained in any availability window.
    #[error("{}", availability_message(conflicting.as_ref()))]
    OutOfAvailability {
        /// The fixed commitment the candidate runs into, when one exists.
        conflicting: Option<FixedCommitment>,
    },

    /// The task label appears more than once among the candidates.
    #[error("task appears {count} times in the schedule; each task must be scheduled exactly once")]
    DuplicateTask { count: usize },
}

fn duration_message(min: i64, max: Option<i64>, actual: i64) -> String {
    match max {
        Some(max) if max == min => format!("duration must be exactly {min} minutes (got {actual})"),
        Some(max) => format!("duration must be between {min} and {max} minutes (got {actual})"),
        None => format!("duration must be at least {min} minutes (got {actual})"),
    }
}

fn availability_message(conflicting: Option<&FixedCommitment>) -> String {
    match conflicting {
        Some(fixed) => format!(
            "overlaps with fixed commitment: {} ({}-{})",
            fixed.task,
            fixed.time.format("%H:%M"),
            fixed.end_time().format("%H:%M"),
        ),
        None => "does not fit in any available time block".to_string(),
    }
}

/// Caller programming errors. These fail fast instead of becoming
/// schedulable rejections.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A candidate is missing required shape (empty label, inverted times).
    #[error("invalid candidate '{task}': {message}")]
    InvalidCandidate { task: String, message: String },

    /// The grid configuration does not describe a usable day window.
    #[error("invalid grid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for EngineError.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
