//! Availability window calculation.
//!
//! Walks the chronologically sorted fixed commitments and derives the
//! free windows around them: one before the first commitment, one between
//! each adjacent pair, and one after the last. Windows are ephemeral --
//! recomputed per request and never stored.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::extract::FixedCommitment;
use crate::grid::{hhmm, minutes_from_midnight, GridConfig};

/// Longest single deep-work session, regardless of window size.
pub const MAX_DEEP_WORK_MINUTES: i64 = 120;

/// Shortest duration that counts as a deep-work session.
pub const MIN_DEEP_WORK_MINUTES: i64 = 60;

/// A contiguous span of unscheduled time between or around commitments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityWindow {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    /// Width of the window in minutes.
    pub minutes: i64,
    /// Deep-work minutes this window can host, capped at
    /// [`MAX_DEEP_WORK_MINUTES`] to bound single-session length.
    pub max_deep_work_capacity: i64,
}

impl AvailabilityWindow {
    /// Build a window from its endpoints, deriving the capacity fields.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        let minutes = minutes_from_midnight(end) - minutes_from_midnight(start);
        Self {
            start,
            end,
            minutes,
            max_deep_work_capacity: minutes.min(MAX_DEEP_WORK_MINUTES),
        }
    }

    /// Whether a span is fully contained in this window.
    pub fn contains(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start >= self.start && end <= self.end
    }

    /// Whether the window is wide enough for any deep work.
    pub fn fits_deep_work(&self) -> bool {
        self.minutes >= MIN_DEEP_WORK_MINUTES
    }
}

/// Derive free windows between the day bounds and the given commitments.
///
/// The leading window is kept at any positive width; windows between and
/// after commitments are kept only when at least one grid increment wide,
/// so sub-increment remainders are dropped rather than offered. With no
/// commitments the whole day is one window.
pub fn compute_windows(commitments: &[FixedCommitment], grid: &GridConfig) -> Vec<AvailabilityWindow> {
    let day_start = grid.day_start();
    let day_end = grid.day_end();

    if commitments.is_empty() {
        return vec![AvailabilityWindow::new(day_start, day_end)];
    }

    let mut sorted: Vec<&FixedCommitment> = commitments.iter().collect();
    sorted.sort_by_key(|c| c.time);

    let mut windows = Vec::new();

    let first = sorted[0];
    if first.time > day_start {
        windows.push(AvailabilityWindow::new(day_start, first.time));
    }

    for pair in sorted.windows(2) {
        let gap_start = pair[0].end_time();
        let gap_end = pair[1].time;
        let width = minutes_from_midnight(gap_end) - minutes_from_midnight(gap_start);
        if width >= grid.increment_minutes {
            windows.push(AvailabilityWindow::new(gap_start, gap_end));
        }
    }

    let last_end = sorted[sorted.len() - 1].end_time();
    let trailing = minutes_from_midnight(day_end) - minutes_from_midnight(last_end);
    if trailing >= grid.increment_minutes {
        windows.push(AvailabilityWindow::new(last_end, day_end));
    }

    windows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn commitment(h: u32, m: u32, duration: i64, task: &str) -> FixedCommitment {
        FixedCommitment {
            time: t(h, m),
            task: task.to_string(),
            duration_minutes: duration,
            is_deadline: false,
        }
    }

    #[test]
    fn test_empty_day_is_one_window() {
        let windows = compute_windows(&[], &GridConfig::default());
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].start, t(8, 0));
        assert_eq!(windows[0].end, t(20, 0));
        assert_eq!(windows[0].minutes, 720);
        assert_eq!(windows[0].max_deep_work_capacity, 120);
    }

    #[test]
    fn test_windows_around_single_commitment() {
        let standup = commitment(10, 0, 30, "standup");
        let windows = compute_windows(&[standup], &GridConfig::default());
        assert_eq!(windows.len(), 2);

        assert_eq!(windows[0].start, t(8, 0));
        assert_eq!(windows[0].end, t(10, 0));
        assert_eq!(windows[0].minutes, 120);

        assert_eq!(windows[1].start, t(10, 30));
        assert_eq!(windows[1].end, t(20, 0));
        assert_eq!(windows[1].minutes, 570);
        assert_eq!(windows[1].max_deep_work_capacity, 120);
    }

    #[test]
    fn test_no_leading_window_when_commitment_at_day_start() {
        let early = commitment(8, 0, 30, "standup");
        let windows = compute_windows(&[early], &GridConfig::default());
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].start, t(8, 30));
    }

    #[test]
    fn test_adjacent_commitments_leave_no_window() {
        let a = commitment(10, 0, 30, "standup");
        let b = commitment(10, 30, 30, "sync");
        let windows = compute_windows(&[a, b], &GridConfig::default());
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].end, t(10, 0));
        assert_eq!(windows[1].start, t(11, 0));
    }

    #[test]
    fn test_commitment_at_day_end_drops_trailing_window() {
        let late = commitment(19, 30, 30, "wrap-up");
        let windows = compute_windows(&[late], &GridConfig::default());
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].end, t(19, 30));
    }

    #[test]
    fn test_unsorted_input_is_handled() {
        let a = commitment(15, 0, 30, "meeting");
        let b = commitment(10, 0, 30, "standup");
        let windows = compute_windows(&[a, b], &GridConfig::default());
        assert_eq!(windows[0].end, t(10, 0));
        assert_eq!(windows[1].start, t(10, 30));
        assert_eq!(windows[1].end, t(15, 0));
    }

    #[test]
    fn test_contains_uses_closed_containment() {
        let window = AvailabilityWindow::new(t(8, 0), t(10, 0));
        assert!(window.contains(t(8, 0), t(10, 0)));
        assert!(window.contains(t(8, 30), t(9, 30)));
        assert!(!window.contains(t(7, 30), t(9, 0)));
        assert!(!window.contains(t(9, 0), t(10, 30)));
    }

    #[test]
    fn test_coverage_of_day() {
        // Windows plus commitment spans cover the day, modulo
        // sub-increment remainders that are deliberately dropped.
        let grid = GridConfig::default();
        let commitments = vec![
            commitment(9, 0, 30, "standup"),
            commitment(12, 0, 60, "lunch"),
            commitment(16, 30, 30, "sync"),
        ];
        let windows = compute_windows(&commitments, &grid);

        let window_minutes: i64 = windows.iter().map(|w| w.minutes).sum();
        let committed: i64 = commitments.iter().map(|c| c.duration_minutes).sum();
        assert_eq!(window_minutes + committed, grid.total_minutes());
    }
}
