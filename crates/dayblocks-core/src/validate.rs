//! Stateless block validation.
//!
//! [`BlockValidator::validate`] runs the rule checks in a fixed order --
//! duration, bounds, overlap -- and reports the first failure. It takes
//! no engine-global state, so it is safe to call on its own with
//! synthetic accepted-block lists.

use crate::block::{BlockCategory, TimeBlock};
use crate::error::ValidationError;
use crate::grid::{minutes_from_midnight, time_from_minutes, GridConfig};

/// Minimum deep-work block duration in minutes.
pub const DEEP_MIN_MINUTES: i64 = 60;

/// Maximum deep-work block duration in minutes.
pub const DEEP_MAX_MINUTES: i64 = 120;

/// Minimum duration for any non-deep block.
pub const SHALLOW_MIN_MINUTES: i64 = 30;

/// Canonical durations for well-known fixed tasks.
///
/// A block whose label mentions one of these keywords must use exactly
/// the keyword's duration.
#[derive(Debug, Clone)]
pub struct KeywordDurations(Vec<(String, i64)>);

impl Default for KeywordDurations {
    fn default() -> Self {
        Self(vec![("standup".to_string(), 30), ("lunch".to_string(), 60)])
    }
}

impl KeywordDurations {
    /// An empty table (no keyword rules).
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// Add or replace a keyword's canonical duration.
    pub fn with_keyword(mut self, keyword: impl Into<String>, minutes: i64) -> Self {
        let keyword = keyword.into().to_lowercase();
        self.0.retain(|(k, _)| *k != keyword);
        self.0.push((keyword, minutes));
        self
    }

    /// Canonical duration for a task label, if any keyword matches.
    pub fn lookup(&self, task: &str) -> Option<i64> {
        let lower = task.to_lowercase();
        self.0
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|(_, minutes)| *minutes)
    }
}

/// Pure rule checks for one candidate block against the accepted set.
#[derive(Debug, Clone)]
pub struct BlockValidator {
    grid: GridConfig,
    keywords: KeywordDurations,
}

impl BlockValidator {
    /// Create a validator with the default keyword table.
    pub fn new(grid: GridConfig) -> Self {
        Self {
            grid,
            keywords: KeywordDurations::default(),
        }
    }

    /// Replace the keyword duration table.
    pub fn with_keywords(mut self, keywords: KeywordDurations) -> Self {
        self.keywords = keywords;
        self
    }

    /// Validate one block. First failing rule wins; `Ok(())` means the
    /// block may be accepted.
    pub fn validate(&self, block: &TimeBlock, accepted: &[TimeBlock]) -> Result<(), ValidationError> {
        self.check_duration(block)?;
        self.check_bounds(block)?;
        self.check_overlap(block, accepted)?;
        Ok(())
    }

    /// Duration rule, selected by category and keyword match.
    fn check_duration(&self, block: &TimeBlock) -> Result<(), ValidationError> {
        let actual = block.duration_minutes;

        if block.category == BlockCategory::Deep {
            if !(DEEP_MIN_MINUTES..=DEEP_MAX_MINUTES).contains(&actual) {
                return Err(ValidationError::InvalidDuration {
                    min: DEEP_MIN_MINUTES,
                    max: Some(DEEP_MAX_MINUTES),
                    actual,
                });
            }
            return Ok(());
        }

        if let Some(canonical) = self.keywords.lookup(&block.task) {
            if actual != canonical {
                return Err(ValidationError::InvalidDuration {
                    min: canonical,
                    max: Some(canonical),
                    actual,
                });
            }
            return Ok(());
        }

        if actual < SHALLOW_MIN_MINUTES {
            return Err(ValidationError::InvalidDuration {
                min: SHALLOW_MIN_MINUTES,
                max: None,
                actual,
            });
        }
        Ok(())
    }

    /// Bounds rule: the whole span must lie inside the day window.
    fn check_bounds(&self, block: &TimeBlock) -> Result<(), ValidationError> {
        let start_m = minutes_from_midnight(block.start_time);
        let end_m = start_m + block.duration_minutes;

        let in_bounds = start_m >= self.grid.day_start_minutes()
            && start_m < self.grid.day_end_minutes()
            && end_m <= self.grid.day_end_minutes();

        if !in_bounds {
            return Err(ValidationError::OutOfBounds {
                start: block.start_time,
                end: time_from_minutes(end_m),
            });
        }
        Ok(())
    }

    /// Overlap rule: first conflicting accepted block wins, in
    /// acceptance order.
    fn check_overlap(&self, block: &TimeBlock, accepted: &[TimeBlock]) -> Result<(), ValidationError> {
        let start = block.start_time;
        let end = block.end_time();
        if let Some(conflicting) = accepted.iter().find(|b| b.overlaps(start, end)) {
            return Err(ValidationError::Overlap {
                conflicting: conflicting.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn block(h: u32, m: u32, duration: i64, task: &str, category: BlockCategory) -> TimeBlock {
        TimeBlock::new(t(h, m), duration, task, category, None)
    }

    fn validator() -> BlockValidator {
        BlockValidator::new(GridConfig::default())
    }

    #[test]
    fn test_deep_duration_range() {
        let v = validator();
        assert!(v.validate(&block(8, 0, 60, "write", BlockCategory::Deep), &[]).is_ok());
        assert!(v.validate(&block(8, 0, 120, "write", BlockCategory::Deep), &[]).is_ok());

        let short = v.validate(&block(8, 0, 30, "write", BlockCategory::Deep), &[]);
        assert!(matches!(
            short,
            Err(ValidationError::InvalidDuration { min: 60, max: Some(120), actual: 30 })
        ));

        let long = v.validate(&block(8, 0, 150, "write", BlockCategory::Deep), &[]);
        assert!(matches!(
            long,
            Err(ValidationError::InvalidDuration { min: 60, max: Some(120), actual: 150 })
        ));
    }

    #[test]
    fn test_shallow_minimum() {
        let v = validator();
        assert!(v.validate(&block(8, 0, 30, "email", BlockCategory::Shallow), &[]).is_ok());

        let tiny = v.validate(&block(8, 0, 15, "email", BlockCategory::Shallow), &[]);
        assert!(matches!(
            tiny,
            Err(ValidationError::InvalidDuration { min: 30, max: None, actual: 15 })
        ));
    }

    #[test]
    fn test_keyword_duration_is_exact() {
        let v = validator();
        assert!(v.validate(&block(10, 0, 30, "standup", BlockCategory::Shallow), &[]).is_ok());
        assert!(v.validate(&block(12, 0, 60, "lunch", BlockCategory::Shallow), &[]).is_ok());

        let stretched = v.validate(&block(10, 0, 60, "standup", BlockCategory::Shallow), &[]);
        assert!(matches!(
            stretched,
            Err(ValidationError::InvalidDuration { min: 30, max: Some(30), actual: 60 })
        ));
    }

    #[test]
    fn test_custom_keyword_table() {
        let v = validator().with_keywords(KeywordDurations::none().with_keyword("retro", 45));
        assert!(v.validate(&block(10, 0, 45, "sprint retro", BlockCategory::Shallow), &[]).is_ok());
        assert!(v.validate(&block(10, 0, 60, "standup", BlockCategory::Shallow), &[]).is_ok());
    }

    #[test]
    fn test_bounds() {
        let v = validator();
        let early = v.validate(&block(7, 0, 60, "write", BlockCategory::Deep), &[]);
        assert!(matches!(early, Err(ValidationError::OutOfBounds { .. })));

        let late = v.validate(&block(19, 30, 60, "write", BlockCategory::Deep), &[]);
        assert!(matches!(late, Err(ValidationError::OutOfBounds { .. })));

        // A block ending exactly at day end is allowed.
        assert!(v.validate(&block(19, 0, 60, "write", BlockCategory::Deep), &[]).is_ok());
    }

    #[test]
    fn test_overlap_reports_first_conflict_in_acceptance_order() {
        let v = validator();
        let a = block(9, 0, 60, "first", BlockCategory::Deep);
        let b = block(10, 0, 60, "second", BlockCategory::Deep);
        let accepted = vec![a, b];

        let spanning = block(9, 30, 60, "third", BlockCategory::Deep);
        match v.validate(&spanning, &accepted) {
            Err(ValidationError::Overlap { conflicting }) => assert_eq!(conflicting.task, "first"),
            other => panic!("expected overlap, got {other:?}"),
        }
    }

    #[test]
    fn test_touching_blocks_do_not_overlap() {
        let v = validator();
        let accepted = vec![block(9, 0, 60, "first", BlockCategory::Deep)];
        assert!(v.validate(&block(10, 0, 60, "second", BlockCategory::Deep), &accepted).is_ok());
        assert!(v.validate(&block(8, 0, 60, "zeroth", BlockCategory::Deep), &accepted).is_ok());
    }

    #[test]
    fn test_rule_order_duration_before_bounds() {
        let v = validator();
        // Both duration and bounds are wrong; duration is reported.
        let result = v.validate(&block(6, 0, 10, "email", BlockCategory::Shallow), &[]);
        assert!(matches!(result, Err(ValidationError::InvalidDuration { .. })));
    }
}
