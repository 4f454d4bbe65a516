//! Fixed-commitment extraction from free-form brain-dump text.
//!
//! Each non-empty line is scanned for one time-like token ("10am",
//! "11:30am", "by 5pm", "14:00"). Lines with a token become trusted
//! [`FixedCommitment`]s; lines without one are returned as flexible tasks
//! for the proposal generator to place. Only the first valid token per
//! line is used.
//!
//! Tokenizing is pluggable via [`TimeTokenizer`] so the parsing strategy
//! can be swapped without touching downstream logic; [`RegexTokenizer`]
//! is the default.

use std::ops::Range;
use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::grid::{hhmm, GridConfig};

/// Default duration for a fixed commitment, in minutes.
pub const DEFAULT_COMMITMENT_MINUTES: i64 = 30;

/// Duration for commitments whose label mentions lunch.
pub const LUNCH_COMMITMENT_MINUTES: i64 = 60;

static TIME_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\b(?P<marker>by|before|at)\s+)?\b(?P<hour>\d{1,2})(?::(?P<minute>\d{2}))?\s*(?P<meridiem>am|pm)?\b")
        .expect("time token pattern is valid")
});

static DEADLINE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:by|before)\b").expect("deadline pattern is valid"));

/// AM/PM suffix on a time token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

/// One raw time-like token found in a line, before grid conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeToken {
    /// Hour as written (1-12 with a meridiem, 0-23 without).
    pub hour: u32,
    pub minute: u32,
    pub meridiem: Option<Meridiem>,
    /// Byte range of the token within the line, for label removal.
    pub span: Range<usize>,
}

/// Strategy for finding one time token in a line of text.
pub trait TimeTokenizer {
    /// Return the first valid time token in the line, if any.
    fn tokenize(&self, line: &str) -> Option<TimeToken>;
}

/// Default tokenizer: regex scan, first match with a plausible hour and
/// minute wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexTokenizer;

impl TimeTokenizer for RegexTokenizer {
    fn tokenize(&self, line: &str) -> Option<TimeToken> {
        for caps in TIME_TOKEN.captures_iter(line) {
            let hour: u32 = caps.name("hour")?.as_str().parse().ok()?;
            let minute: u32 = match caps.name("minute") {
                Some(m) => m.as_str().parse().ok()?,
                None => 0,
            };
            let meridiem = caps.name("meridiem").map(|m| {
                if m.as_str().eq_ignore_ascii_case("pm") {
                    Meridiem::Pm
                } else {
                    Meridiem::Am
                }
            });

            // Reject tokens that cannot be clock times ("45 minutes").
            let hour_ok = match meridiem {
                Some(_) => (1..=12).contains(&hour),
                None => hour <= 23,
            };
            if !hour_ok || minute >= 60 {
                continue;
            }

            let whole = caps.get(0)?;
            return Some(TimeToken {
                hour,
                minute,
                meridiem,
                span: whole.range(),
            });
        }
        None
    }
}

/// A task anchored to an explicit time, trusted and never rejected.
///
/// Derived per request and discarded after reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedCommitment {
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub task: String,
    #[serde(rename = "duration")]
    pub duration_minutes: i64,
    pub is_deadline: bool,
}

impl FixedCommitment {
    /// End of the commitment span.
    pub fn end_time(&self) -> NaiveTime {
        self.time + chrono::Duration::minutes(self.duration_minutes)
    }

    /// Half-open interval overlap test against a span.
    pub fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.time < end && self.end_time() > start
    }
}

/// Result of scanning one brain dump: anchored commitments plus the
/// lines left over for flexible placement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extraction {
    /// Commitments in chronological order.
    pub commitments: Vec<FixedCommitment>,
    /// Lines with no recognizable time token, in input order.
    pub flexible: Vec<String>,
}

/// Parses brain-dump text into fixed commitments.
#[derive(Debug, Clone)]
pub struct CommitmentExtractor<T: TimeTokenizer = RegexTokenizer> {
    grid: GridConfig,
    tokenizer: T,
}

impl CommitmentExtractor<RegexTokenizer> {
    /// Create an extractor with the default regex tokenizer.
    pub fn new(grid: GridConfig) -> Self {
        Self {
            grid,
            tokenizer: RegexTokenizer,
        }
    }
}

impl<T: TimeTokenizer> CommitmentExtractor<T> {
    /// Create an extractor with a custom tokenizer.
    pub fn with_tokenizer(grid: GridConfig, tokenizer: T) -> Self {
        Self { grid, tokenizer }
    }

    /// Scan every non-empty line of the input.
    ///
    /// Lines with a valid time token become commitments, sorted
    /// chronologically; the rest are returned as flexible tasks. A line
    /// that is nothing but a time carries no task and is dropped.
    pub fn extract(&self, text: &str) -> Extraction {
        let mut commitments = Vec::new();
        let mut flexible = Vec::new();

        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            let Some(token) = self.tokenizer.tokenize(line) else {
                flexible.push(line.to_string());
                continue;
            };

            let task = strip_token(line, &token.span);
            if task.is_empty() {
                continue;
            }

            let Some(time) = self.token_to_time(&token, line) else {
                flexible.push(line.to_string());
                continue;
            };

            let duration_minutes = if task.to_lowercase().contains("lunch") {
                LUNCH_COMMITMENT_MINUTES
            } else {
                DEFAULT_COMMITMENT_MINUTES
            };

            commitments.push(FixedCommitment {
                time,
                task,
                duration_minutes,
                is_deadline: DEADLINE_WORD.is_match(line),
            });
        }

        commitments.sort_by_key(|c| c.time);
        Extraction {
            commitments,
            flexible,
        }
    }

    /// Convert a raw token to a grid-aligned time of day.
    fn token_to_time(&self, token: &TimeToken, line: &str) -> Option<NaiveTime> {
        let hour = match token.meridiem {
            Some(Meridiem::Pm) => {
                if token.hour == 12 {
                    12
                } else {
                    token.hour + 12
                }
            }
            Some(Meridiem::Am) => {
                if token.hour == 12 {
                    0
                } else {
                    token.hour
                }
            }
            // No meridiem defaults to AM unless the line implies PM.
            None => {
                if token.hour < 12 && implies_pm(line) {
                    token.hour + 12
                } else {
                    token.hour
                }
            }
        };

        NaiveTime::from_hms_opt(hour, token.minute, 0).map(|t| self.grid.snap(t))
    }
}

/// Words that shift a bare hour into the afternoon.
fn implies_pm(line: &str) -> bool {
    let lower = line.to_lowercase();
    ["afternoon", "evening", "night"].iter().any(|w| lower.contains(w))
}

/// Remove the token span from the line and tidy up what remains.
fn strip_token(line: &str, span: &Range<usize>) -> String {
    let mut remainder = String::with_capacity(line.len());
    remainder.push_str(&line[..span.start]);
    remainder.push(' ');
    remainder.push_str(&line[span.end..]);

    let cleaned: Vec<&str> = remainder.split_whitespace().collect();
    cleaned
        .join(" ")
        .trim_matches(|c: char| c == ',' || c == '-' || c == ':' || c == '@' || c.is_whitespace())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn extract(text: &str) -> Extraction {
        CommitmentExtractor::new(GridConfig::default()).extract(text)
    }

    #[test]
    fn test_simple_commitment() {
        let result = extract("10am standup");
        assert_eq!(result.commitments.len(), 1);
        let c = &result.commitments[0];
        assert_eq!(c.time, t(10, 0));
        assert_eq!(c.task, "standup");
        assert_eq!(c.duration_minutes, 30);
        assert!(!c.is_deadline);
        assert!(result.flexible.is_empty());
    }

    #[test]
    fn test_minutes_snap_to_grid() {
        let result = extract("10:07am review");
        assert_eq!(result.commitments[0].time, t(10, 0));
        let result = extract("10:20am review");
        assert_eq!(result.commitments[0].time, t(10, 30));
    }

    #[test]
    fn test_pm_meridiem_and_label_cleanup() {
        let result = extract("team sync at 2pm");
        let c = &result.commitments[0];
        assert_eq!(c.time, t(14, 0));
        assert_eq!(c.task, "team sync");
    }

    #[test]
    fn test_noon_and_midnight() {
        let result = extract("12pm lunch with team\n12am backup check");
        assert_eq!(result.commitments[0].time, t(0, 0));
        assert_eq!(result.commitments[0].task, "backup check");
        assert_eq!(result.commitments[1].time, t(12, 0));
        assert_eq!(result.commitments[1].task, "lunch with team");
        assert_eq!(result.commitments[1].duration_minutes, 60);
    }

    #[test]
    fn test_bare_hour_defaults_to_am() {
        let result = extract("11 planning");
        assert_eq!(result.commitments[0].time, t(11, 0));
    }

    #[test]
    fn test_context_words_imply_pm() {
        let result = extract("3 retro in the afternoon");
        assert_eq!(result.commitments[0].time, t(15, 0));

        let result = extract("8 wrap-up tonight");
        assert_eq!(result.commitments[0].time, t(20, 0));
    }

    #[test]
    fn test_deadline_marker() {
        let result = extract("finish report by 5pm");
        let c = &result.commitments[0];
        assert_eq!(c.time, t(17, 0));
        assert_eq!(c.task, "finish report");
        assert!(c.is_deadline);

        let result = extract("submit expenses before 4pm");
        assert!(result.commitments[0].is_deadline);
    }

    #[test]
    fn test_only_first_token_per_line() {
        let result = extract("9am sync then 3pm review");
        assert_eq!(result.commitments.len(), 1);
        assert_eq!(result.commitments[0].time, t(9, 0));
        assert_eq!(result.commitments[0].task, "sync then 3pm review");
    }

    #[test]
    fn test_lines_without_time_are_flexible() {
        let result = extract(indoc! {"
            deep coding project
            10am standup
            catch up on emails
        "});
        assert_eq!(result.commitments.len(), 1);
        assert_eq!(
            result.flexible,
            vec!["deep coding project".to_string(), "catch up on emails".to_string()]
        );
    }

    #[test]
    fn test_implausible_numbers_are_not_times() {
        let result = extract("45 minutes of reading");
        assert!(result.commitments.is_empty());
        assert_eq!(result.flexible.len(), 1);
    }

    #[test]
    fn test_time_only_line_is_dropped() {
        let result = extract("10am");
        assert!(result.commitments.is_empty());
        assert!(result.flexible.is_empty());
    }

    #[test]
    fn test_output_sorted_chronologically() {
        let result = extract(indoc! {"
            3pm team meeting
            10am standup
            11:30am client meeting
        "});
        let times: Vec<NaiveTime> = result.commitments.iter().map(|c| c.time).collect();
        assert_eq!(times, vec![t(10, 0), t(11, 30), t(15, 0)]);
    }

    #[test]
    fn test_twenty_four_hour_token() {
        let result = extract("14:00 planning");
        assert_eq!(result.commitments[0].time, t(14, 0));
    }
}
