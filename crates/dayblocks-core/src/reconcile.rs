//! Two-pass schedule reconciliation.
//!
//! Pass 1 materializes every fixed commitment as a trusted block; those
//! are never re-validated. Pass 2 walks the untrusted candidate
//! placements in arrival order, checking availability containment and
//! then the block validator. One failing candidate fails the whole
//! batch -- callers are expected to regenerate a corrected proposal --
//! so a successful result is always a complete, non-overlapping day.

use std::collections::HashMap;

use chrono::NaiveTime;

use crate::availability::{compute_windows, AvailabilityWindow};
use crate::block::{
    BlockCategory, CandidatePlacement, InvalidBlock, RejectedBlock, ScheduleResult, TimeBlock,
};
use crate::error::{EngineError, ValidationError};
use crate::extract::{CommitmentExtractor, FixedCommitment, RegexTokenizer, TimeTokenizer};
use crate::grid::{minutes_from_midnight, GridConfig};
use crate::propose::ProposalGenerator;
use crate::validate::{BlockValidator, KeywordDurations};

/// Reason attached to every trusted block from pass 1.
pub const FIXED_BLOCK_REASON: &str = "Fixed commitment as scheduled";

/// Orchestrates extraction, availability, and validation for one request.
///
/// Holds only immutable configuration; every call is independent and the
/// same reconciler can serve parallel requests without coordination.
#[derive(Debug, Clone)]
pub struct Reconciler<T: TimeTokenizer = RegexTokenizer> {
    grid: GridConfig,
    extractor: CommitmentExtractor<T>,
    validator: BlockValidator,
}

impl Reconciler<RegexTokenizer> {
    /// Create a reconciler with the default tokenizer and keyword table.
    pub fn new(grid: GridConfig) -> Self {
        Self {
            grid,
            extractor: CommitmentExtractor::new(grid),
            validator: BlockValidator::new(grid),
        }
    }
}

impl<T: TimeTokenizer> Reconciler<T> {
    /// Create a reconciler with a custom time tokenizer.
    pub fn with_tokenizer(grid: GridConfig, tokenizer: T) -> Self {
        Self {
            grid,
            extractor: CommitmentExtractor::with_tokenizer(grid, tokenizer),
            validator: BlockValidator::new(grid),
        }
    }

    /// Replace the validator's keyword duration table.
    pub fn with_keywords(mut self, keywords: KeywordDurations) -> Self {
        self.validator = self.validator.with_keywords(keywords);
        self
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    /// Reconcile raw brain-dump text with externally produced candidate
    /// placements.
    ///
    /// Returns `Err` only for malformed candidate shape; every
    /// schedulable outcome, including rejection, is a [`ScheduleResult`].
    pub fn reconcile(
        &self,
        raw_text: &str,
        candidates: &[CandidatePlacement],
    ) -> Result<ScheduleResult, EngineError> {
        let extraction = self.extractor.extract(raw_text);
        let windows = compute_windows(&extraction.commitments, &self.grid);
        self.reconcile_candidates(&extraction.commitments, &windows, candidates)
    }

    /// Plan a whole day: extract commitments, ask the proposal generator
    /// to place the flexible tasks, then reconcile its answer.
    pub fn plan_day(
        &self,
        raw_text: &str,
        proposer: &dyn ProposalGenerator,
    ) -> Result<ScheduleResult, EngineError> {
        let extraction = self.extractor.extract(raw_text);
        let windows = compute_windows(&extraction.commitments, &self.grid);
        let candidates = proposer.propose(&extraction.flexible, &extraction.commitments, &windows);
        self.reconcile_candidates(&extraction.commitments, &windows, &candidates)
    }

    /// Core two-pass reconciliation over pre-computed commitments and
    /// windows.
    pub fn reconcile_candidates(
        &self,
        commitments: &[FixedCommitment],
        windows: &[AvailabilityWindow],
        candidates: &[CandidatePlacement],
    ) -> Result<ScheduleResult, EngineError> {
        check_candidate_shapes(candidates)?;

        // Pass 1: commitments become accepted blocks directly. They come
        // from distinct lines at distinct times, so they are not checked
        // against each other.
        let mut accepted: Vec<TimeBlock> = commitments.iter().map(fixed_block).collect();

        // Duplicate detection runs over the whole batch up front so every
        // occurrence is flagged, not just the second.
        if let Some(result) = detect_duplicates(candidates) {
            return Ok(result);
        }

        // Pass 2: validate each candidate in arrival order.
        for candidate in candidates {
            let start = self.grid.snap(candidate.start_time);
            let end = self.grid.snap(candidate.end_time);
            let duration = minutes_from_midnight(end) - minutes_from_midnight(start);

            if !windows.iter().any(|w| w.contains(start, end)) {
                let conflicting = commitments.iter().find(|f| f.overlaps(start, end)).cloned();
                let err = ValidationError::OutOfAvailability { conflicting };
                return Ok(reject(candidate, Some(start), Some(duration), &err));
            }

            let block = TimeBlock::new(
                start,
                duration,
                candidate.task.trim(),
                candidate.category,
                candidate.reason.clone(),
            );

            if let Err(err) = self.validator.validate(&block, &accepted) {
                return Ok(reject(candidate, Some(start), Some(duration), &err));
            }

            accepted.push(block);
        }

        accepted.sort_by_key(|b| b.start_time);
        Ok(ScheduleResult::success(accepted))
    }
}

/// Materialize a trusted block for a fixed commitment.
fn fixed_block(commitment: &FixedCommitment) -> TimeBlock {
    TimeBlock::new(
        commitment.time,
        commitment.duration_minutes,
        commitment.task.clone(),
        fixed_category(&commitment.task),
        Some(FIXED_BLOCK_REASON.to_string()),
    )
}

/// Category heuristic for trusted blocks.
fn fixed_category(task: &str) -> BlockCategory {
    let lower = task.to_lowercase();
    if lower.contains("design") || lower.contains("review") {
        BlockCategory::Deep
    } else {
        BlockCategory::Shallow
    }
}

/// Fail fast on candidates that are structurally malformed; these are
/// caller bugs, not schedulable rejections.
fn check_candidate_shapes(candidates: &[CandidatePlacement]) -> Result<(), EngineError> {
    for candidate in candidates {
        if candidate.task.trim().is_empty() {
            return Err(EngineError::InvalidCandidate {
                task: candidate.task.clone(),
                message: "task label must not be empty".to_string(),
            });
        }
        if candidate.end_time <= candidate.start_time {
            return Err(EngineError::InvalidCandidate {
                task: candidate.task.clone(),
                message: format!(
                    "end time {} must be after start time {}",
                    candidate.end_time.format("%H:%M"),
                    candidate.start_time.format("%H:%M"),
                ),
            });
        }
    }
    Ok(())
}

/// Pre-pass over the whole batch; flags every occurrence of a duplicated
/// label.
fn detect_duplicates(candidates: &[CandidatePlacement]) -> Option<ScheduleResult> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for candidate in candidates {
        *counts.entry(candidate.normalized_task()).or_insert(0) += 1;
    }

    let invalid: Vec<InvalidBlock> = candidates
        .iter()
        .filter_map(|candidate| {
            let count = counts[&candidate.normalized_task()];
            if count < 2 {
                return None;
            }
            let err = ValidationError::DuplicateTask { count };
            Some(InvalidBlock {
                block: rejected_block(candidate, Some(candidate.start_time), None),
                reason: err.to_string(),
            })
        })
        .collect();

    if invalid.is_empty() {
        None
    } else {
        Some(ScheduleResult::failure(
            "Invalid schedule with duplicate tasks",
            invalid,
        ))
    }
}

/// Build the failure result for one rejected candidate.
fn reject(
    candidate: &CandidatePlacement,
    start: Option<NaiveTime>,
    duration: Option<i64>,
    err: &ValidationError,
) -> ScheduleResult {
    ScheduleResult::failure(
        batch_error(err),
        vec![InvalidBlock {
            block: rejected_block(candidate, start, duration),
            reason: err.to_string(),
        }],
    )
}

fn rejected_block(
    candidate: &CandidatePlacement,
    start: Option<NaiveTime>,
    duration: Option<i64>,
) -> RejectedBlock {
    RejectedBlock {
        start_time: start,
        duration,
        task: candidate.task.clone(),
        category: candidate.category,
    }
}

/// Short top-level error string naming the violated rule.
fn batch_error(err: &ValidationError) -> &'static str {
    match err {
        ValidationError::OutOfAvailability { .. } => "Task scheduled outside available time blocks",
        ValidationError::Overlap { .. } => "Invalid block allocation",
        ValidationError::InvalidDuration { .. } => "Block duration outside allowed range",
        ValidationError::OutOfBounds { .. } => "Block outside working hours",
        ValidationError::DuplicateTask { .. } => "Invalid schedule with duplicate tasks",
    }
}
