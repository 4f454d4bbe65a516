//! Block types and the result contract returned to callers.
//!
//! Field names follow the JSON wire shape consumed by the UI layer
//! (`startTime`, `type`, camelCase throughout). Accepted blocks are
//! immutable once the reconciler has produced them.

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::grid::{hhmm, hhmm_opt};

/// Category of work a block holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockCategory {
    /// Focused work requiring a 60-120 minute session.
    Deep,
    /// Routine work and communication, 30 minutes or more.
    Shallow,
    /// Rest block.
    Break,
}

impl BlockCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deep => "deep",
            Self::Shallow => "shallow",
            Self::Break => "break",
        }
    }
}

/// An accepted block on the day plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBlock {
    pub id: String,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    /// Duration in minutes, always positive.
    #[serde(rename = "duration")]
    pub duration_minutes: i64,
    pub task: String,
    #[serde(rename = "type")]
    pub category: BlockCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl TimeBlock {
    /// Create a block with a fresh id.
    pub fn new(
        start_time: NaiveTime,
        duration_minutes: i64,
        task: impl Into<String>,
        category: BlockCategory,
        reason: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            start_time,
            duration_minutes,
            task: task.into(),
            category,
            reason,
        }
    }

    /// End of the block. Wraps at midnight; the validator rejects any
    /// block whose span would cross it.
    pub fn end_time(&self) -> NaiveTime {
        self.start_time + Duration::minutes(self.duration_minutes)
    }

    /// Half-open interval overlap test against another span.
    pub fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.start_time < end && self.end_time() > start
    }

    /// Task label normalized for uniqueness comparison.
    pub fn normalized_task(&self) -> String {
        self.task.trim().to_lowercase()
    }
}

/// An unvalidated placement proposed for a flexible task.
///
/// Produced by an external, possibly non-deterministic generator; nothing
/// here is trusted until the reconciler has validated it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePlacement {
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub task: String,
    #[serde(rename = "type")]
    pub category: BlockCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CandidatePlacement {
    pub fn new(
        start_time: NaiveTime,
        end_time: NaiveTime,
        task: impl Into<String>,
        category: BlockCategory,
    ) -> Self {
        Self {
            start_time,
            end_time,
            task: task.into(),
            category,
            reason: None,
        }
    }

    /// Attach the generator's explanation for this placement.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Task label normalized for duplicate detection.
    pub fn normalized_task(&self) -> String {
        self.task.trim().to_lowercase()
    }
}

/// The fields of a rejected candidate that are worth echoing back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedBlock {
    #[serde(default, with = "hhmm_opt", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    pub task: String,
    #[serde(rename = "type")]
    pub category: BlockCategory,
}

/// One rejected candidate with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidBlock {
    pub block: RejectedBlock,
    pub reason: String,
}

/// Outcome of one reconciliation request.
///
/// A successful result carries every accepted block in chronological
/// order. A failed result names each rejected candidate and the rule it
/// violated; the batch is never partially accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<TimeBlock>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_blocks: Option<Vec<InvalidBlock>>,
}

impl ScheduleResult {
    /// A fully accepted plan.
    pub fn success(blocks: Vec<TimeBlock>) -> Self {
        Self {
            success: true,
            data: Some(blocks),
            error: None,
            invalid_blocks: None,
        }
    }

    /// A rejected batch with per-candidate diagnostics.
    pub fn failure(error: impl Into<String>, invalid_blocks: Vec<InvalidBlock>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            invalid_blocks: Some(invalid_blocks),
        }
    }

    /// Accepted blocks, empty when the request failed.
    pub fn blocks(&self) -> &[TimeBlock] {
        self.data.as_deref().unwrap_or(&[])
    }
}
