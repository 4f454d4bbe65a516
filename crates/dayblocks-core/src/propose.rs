//! Candidate placement generation.
//!
//! The reconciler does not care how placements are produced; any source
//! (an LLM, a heuristic, manual entry) plugs in behind
//! [`ProposalGenerator`]. [`FirstFitProposer`] is the built-in
//! deterministic implementation: it classifies flexible tasks by keyword
//! and fills availability windows front to back, deep work first.

use crate::availability::{AvailabilityWindow, MAX_DEEP_WORK_MINUTES, MIN_DEEP_WORK_MINUTES};
use crate::block::{BlockCategory, CandidatePlacement};
use crate::extract::FixedCommitment;
use crate::grid::{minutes_from_midnight, time_from_minutes, GridConfig};
use crate::validate::KeywordDurations;

/// Keywords suggesting a task needs a long, focused session.
const DEEP_WORK_PATTERNS: &[&str] = &[
    "deep",
    "focus",
    "complex",
    "design review",
    "architecture",
    "develop",
    "write",
    "research",
    "plan",
    "tech spec",
    "system",
    "refactor",
    "auth",
];

/// Keywords suggesting routine or communication work.
const SHALLOW_WORK_PATTERNS: &[&str] = &[
    "standup",
    "sync",
    "check",
    "reply",
    "email",
    "slack",
    "catch up",
    "update",
    "status",
];

/// Default duration for a flexible shallow task, in minutes.
pub const SHALLOW_TASK_MINUTES: i64 = 30;

/// Classify a flexible task label as deep or shallow work.
///
/// Deep patterns win over shallow ones; unrecognized labels default to
/// shallow so they never monopolize a window.
pub fn classify_task(label: &str) -> BlockCategory {
    let lower = label.to_lowercase();
    if DEEP_WORK_PATTERNS.iter().any(|p| lower.contains(p)) {
        return BlockCategory::Deep;
    }
    if SHALLOW_WORK_PATTERNS.iter().any(|p| lower.contains(p)) {
        return BlockCategory::Shallow;
    }
    BlockCategory::Shallow
}

/// Source of candidate placements for flexible tasks.
///
/// Implementations may be non-deterministic; everything they return is
/// re-validated by the reconciler before acceptance.
pub trait ProposalGenerator {
    /// Propose a placement for each flexible task, given the trusted
    /// commitments and the open windows around them.
    fn propose(
        &self,
        flexible_tasks: &[String],
        commitments: &[FixedCommitment],
        windows: &[AvailabilityWindow],
    ) -> Vec<CandidatePlacement>;
}

/// Deterministic greedy proposer.
///
/// Deep tasks are placed first into the earliest window that still has
/// deep-work capacity, taking as much of it as allowed (at most
/// [`MAX_DEEP_WORK_MINUTES`]); shallow tasks then fill what remains.
/// Tasks that fit nowhere are left unplaced rather than forced.
#[derive(Debug, Clone)]
pub struct FirstFitProposer {
    grid: GridConfig,
    keywords: KeywordDurations,
}

impl FirstFitProposer {
    pub fn new(grid: GridConfig) -> Self {
        Self {
            grid,
            keywords: KeywordDurations::default(),
        }
    }

    /// Replace the keyword duration table used for shallow tasks.
    pub fn with_keywords(mut self, keywords: KeywordDurations) -> Self {
        self.keywords = keywords;
        self
    }

    /// Duration for one shallow task, honoring canonical keyword
    /// durations ("lunch" stays 60 minutes).
    fn shallow_duration(&self, task: &str) -> i64 {
        self.keywords.lookup(task).unwrap_or(SHALLOW_TASK_MINUTES)
    }
}

impl ProposalGenerator for FirstFitProposer {
    fn propose(
        &self,
        flexible_tasks: &[String],
        _commitments: &[FixedCommitment],
        windows: &[AvailabilityWindow],
    ) -> Vec<CandidatePlacement> {
        let inc = self.grid.increment_minutes;
        // Remaining open span per window, consumed front to back.
        let mut remaining: Vec<(i64, i64)> = windows
            .iter()
            .map(|w| (minutes_from_midnight(w.start), minutes_from_midnight(w.end)))
            .collect();

        let (deep_tasks, shallow_tasks): (Vec<&String>, Vec<&String>) = flexible_tasks
            .iter()
            .partition(|t| classify_task(t.as_str()) == BlockCategory::Deep);

        let mut placements = Vec::new();

        for task in deep_tasks {
            for slot in remaining.iter_mut() {
                let open = slot.1 - slot.0;
                let session = (open.min(MAX_DEEP_WORK_MINUTES) / inc) * inc;
                if session < MIN_DEEP_WORK_MINUTES {
                    continue;
                }
                placements.push(
                    CandidatePlacement::new(
                        time_from_minutes(slot.0),
                        time_from_minutes(slot.0 + session),
                        task.clone(),
                        BlockCategory::Deep,
                    )
                    .with_reason("Deep work in the earliest open window"),
                );
                slot.0 += session;
                break;
            }
        }

        for task in shallow_tasks {
            let duration = self.shallow_duration(task);
            for slot in remaining.iter_mut() {
                if slot.1 - slot.0 < duration {
                    continue;
                }
                placements.push(
                    CandidatePlacement::new(
                        time_from_minutes(slot.0),
                        time_from_minutes(slot.0 + duration),
                        task.clone(),
                        BlockCategory::Shallow,
                    )
                    .with_reason("Shallow work fills the remaining gap"),
                );
                slot.0 += duration;
                break;
            }
        }

        placements
    }
}
