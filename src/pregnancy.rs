// 🤰 Pregnancy Progress Calculator
//
// Pure functions over dates and weights. "now" is always injected so that
// nothing here reads the wall clock.
//
// - days_until_due: ceiling of whole days, negative once overdue
// - progress_percentage: elapsed fraction of the term, clamped to [0, 100]
// - weight_gain_status: under / normal / over, bounds inclusive of normal

use crate::error::{Error, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Length of a full term counted from the last menstrual period
pub const FULL_TERM_DAYS: i64 = 280;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

// ============================================================================
// DATE HELPERS
// ============================================================================

/// Anchor a calendar date at midnight UTC
pub fn date_at_midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Naegele's rule: due date is LMP + 280 days
pub fn estimated_due_date(lmp: DateTime<Utc>) -> DateTime<Utc> {
    lmp + Duration::days(FULL_TERM_DAYS)
}

fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_DAY
}

// ============================================================================
// CORE CALCULATIONS
// ============================================================================

/// Whole days from `now` until `due`, rounded up.
///
/// Negative once the due date has passed; no clamping at this layer.
pub fn days_until_due(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    days_between(now, due).ceil() as i64
}

/// Percent of the term elapsed, clamped to [0, 100]
pub fn progress_percentage(start: DateTime<Utc>, due: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let term = days_between(start, due);
    if term <= 0.0 {
        // Degenerate term: treat as complete once started
        return if now >= start { 100.0 } else { 0.0 };
    }

    let elapsed = days_between(start, now);
    (elapsed / term * 100.0).clamp(0.0, 100.0)
}

/// Weight-gain band against a target range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightGainStatus {
    Under,
    Normal,
    Over,
}

impl WeightGainStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightGainStatus::Under => "under",
            WeightGainStatus::Normal => "normal",
            WeightGainStatus::Over => "over",
        }
    }
}

/// Classify cumulative gain; both bounds count as normal
pub fn weight_gain_status(gain: f64, target_min: f64, target_max: f64) -> WeightGainStatus {
    if gain < target_min {
        WeightGainStatus::Under
    } else if gain > target_max {
        WeightGainStatus::Over
    } else {
        WeightGainStatus::Normal
    }
}

// ============================================================================
// GESTATIONAL AGE
// ============================================================================

/// Elapsed time since start as (week, day-within-week)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestationalAge {
    pub weeks: i64,
    pub days: i64,
}

impl GestationalAge {
    pub fn total_days(&self) -> i64 {
        self.weeks * 7 + self.days
    }
}

impl std::fmt::Display for GestationalAge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}w{}d", self.weeks, self.days)
    }
}

/// Gestational age at `now`. Clamped at zero before the start date.
pub fn gestational_age(start: DateTime<Utc>, now: DateTime<Utc>) -> GestationalAge {
    let elapsed = days_between(start, now).floor().max(0.0) as i64;
    GestationalAge {
        weeks: elapsed / 7,
        days: elapsed % 7,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trimester {
    First,
    Second,
    Third,
}

impl Trimester {
    pub fn from_week(weeks: i64) -> Self {
        if weeks < 14 {
            Trimester::First
        } else if weeks < 28 {
            Trimester::Second
        } else {
            Trimester::Third
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Trimester::First => 1,
            Trimester::Second => 2,
            Trimester::Third => 3,
        }
    }
}

// ============================================================================
// PREGNANCY INFO
// ============================================================================

/// Start/due dates plus the injected "current" date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PregnancyInfo {
    pub start: DateTime<Utc>,
    pub due: DateTime<Utc>,
    pub now: DateTime<Utc>,
}

/// Everything the dashboard shows about progress, in one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PregnancyProgress {
    pub gestational_age: GestationalAge,
    pub trimester: Trimester,
    pub days_until_due: i64,
    pub progress_percentage: f64,
    pub overdue: bool,
}

impl PregnancyInfo {
    /// Due date must fall strictly after the start date
    pub fn new(start: DateTime<Utc>, due: DateTime<Utc>, now: DateTime<Utc>) -> Result<Self> {
        if due <= start {
            return Err(Error::InvalidInput(format!(
                "due date {} must be after start date {}",
                due.date_naive(),
                start.date_naive()
            )));
        }
        Ok(PregnancyInfo { start, due, now })
    }

    /// Build from an LMP date, deriving the due date with Naegele's rule
    pub fn from_lmp(lmp: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        PregnancyInfo {
            start: lmp,
            due: estimated_due_date(lmp),
            now,
        }
    }

    pub fn days_until_due(&self) -> i64 {
        days_until_due(self.due, self.now)
    }

    pub fn progress_percentage(&self) -> f64 {
        progress_percentage(self.start, self.due, self.now)
    }

    pub fn gestational_age(&self) -> GestationalAge {
        gestational_age(self.start, self.now)
    }

    pub fn trimester(&self) -> Trimester {
        Trimester::from_week(self.gestational_age().weeks)
    }

    pub fn progress(&self) -> PregnancyProgress {
        let days_until_due = self.days_until_due();
        PregnancyProgress {
            gestational_age: self.gestational_age(),
            trimester: self.trimester(),
            days_until_due,
            progress_percentage: self.progress_percentage(),
            overdue: days_until_due < 0,
        }
    }
}

// ============================================================================
// MATERNAL HEALTH
// ============================================================================

/// Cumulative gain with the target range supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaternalHealth {
    pub weight_gain_kg: f64,
    pub target_min_kg: f64,
    pub target_max_kg: f64,
}

impl MaternalHealth {
    pub fn new(weight_gain_kg: f64, target_min_kg: f64, target_max_kg: f64) -> Result<Self> {
        if !(weight_gain_kg >= 0.0) {
            return Err(Error::InvalidInput(format!(
                "weight gain must be >= 0 kg, got {}",
                weight_gain_kg
            )));
        }
        if !(target_min_kg <= target_max_kg) {
            return Err(Error::InvalidInput(format!(
                "target range [{}, {}] is inverted",
                target_min_kg, target_max_kg
            )));
        }

        Ok(MaternalHealth {
            weight_gain_kg,
            target_min_kg,
            target_max_kg,
        })
    }

    pub fn status(&self) -> WeightGainStatus {
        weight_gain_status(self.weight_gain_kg, self.target_min_kg, self.target_max_kg)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        date_at_midnight(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_days_until_due_on_due_date() {
        let due = day(2024, 10, 1);
        assert_eq!(days_until_due(due, due), 0);
    }

    #[test]
    fn test_days_until_due_overdue() {
        let due = day(2024, 10, 1);
        assert_eq!(days_until_due(due, due + Duration::days(1)), -1);
        assert_eq!(days_until_due(due, due + Duration::days(10)), -10);
    }

    #[test]
    fn test_days_until_due_rounds_up_partial_days() {
        let due = day(2024, 10, 1);
        let now = due - Duration::hours(36);
        assert_eq!(days_until_due(due, now), 2);

        // Half a day late still reads as zero
        assert_eq!(days_until_due(due, due + Duration::hours(12)), 0);
    }

    #[test]
    fn test_days_until_due_counts_sub_second_remainder() {
        let due = day(2024, 10, 1);
        assert_eq!(days_until_due(due, due - Duration::milliseconds(500)), 1);
        assert_eq!(days_until_due(due, due + Duration::milliseconds(500)), 0);
    }

    #[test]
    fn test_progress_clamped_before_start() {
        let start = day(2024, 1, 1);
        let due = day(2024, 10, 1);

        assert_eq!(progress_percentage(start, due, start), 0.0);
        assert_eq!(progress_percentage(start, due, start - Duration::days(30)), 0.0);
    }

    #[test]
    fn test_progress_clamped_after_due() {
        let start = day(2024, 1, 1);
        let due = day(2024, 10, 1);

        assert_eq!(progress_percentage(start, due, due), 100.0);
        assert_eq!(progress_percentage(start, due, due + Duration::days(14)), 100.0);
    }

    #[test]
    fn test_progress_midterm() {
        let start = day(2024, 1, 1);
        let due = day(2024, 10, 1);
        let now = day(2024, 7, 1);

        let pct = progress_percentage(start, due, now);
        // 182 of 274 days in a leap year
        assert!(pct > 66.0 && pct < 67.5, "got {}", pct);
    }

    #[test]
    fn test_weight_gain_bands() {
        assert_eq!(weight_gain_status(8.0, 10.0, 15.0), WeightGainStatus::Under);
        assert_eq!(weight_gain_status(12.0, 10.0, 15.0), WeightGainStatus::Normal);
        assert_eq!(weight_gain_status(16.5, 10.0, 15.0), WeightGainStatus::Over);
    }

    #[test]
    fn test_weight_gain_bounds_are_normal() {
        assert_eq!(weight_gain_status(10.0, 10.0, 15.0), WeightGainStatus::Normal);
        assert_eq!(weight_gain_status(15.0, 10.0, 15.0), WeightGainStatus::Normal);
    }

    #[test]
    fn test_weight_gain_exactly_one_band() {
        for tenth in 0..250 {
            let gain = tenth as f64 / 10.0;
            let status = weight_gain_status(gain, 10.0, 15.0);
            let under = gain < 10.0;
            let over = gain > 15.0;
            match status {
                WeightGainStatus::Under => assert!(under && !over),
                WeightGainStatus::Over => assert!(over && !under),
                WeightGainStatus::Normal => assert!(!under && !over),
            }
        }
    }

    #[test]
    fn test_gestational_age() {
        let start = day(2024, 1, 1);

        let age = gestational_age(start, day(2024, 1, 18));
        assert_eq!(age, GestationalAge { weeks: 2, days: 3 });
        assert_eq!(age.total_days(), 17);
        assert_eq!(age.to_string(), "2w3d");

        // Before the start date the age reads as zero
        let before = gestational_age(start, day(2023, 12, 1));
        assert_eq!(before, GestationalAge { weeks: 0, days: 0 });
    }

    #[test]
    fn test_trimester_boundaries() {
        assert_eq!(Trimester::from_week(0), Trimester::First);
        assert_eq!(Trimester::from_week(13), Trimester::First);
        assert_eq!(Trimester::from_week(14), Trimester::Second);
        assert_eq!(Trimester::from_week(27), Trimester::Second);
        assert_eq!(Trimester::from_week(28), Trimester::Third);
        assert_eq!(Trimester::from_week(41).number(), 3);
    }

    #[test]
    fn test_estimated_due_date() {
        let lmp = day(2024, 1, 1);
        assert_eq!(estimated_due_date(lmp), day(2024, 10, 7));

        let info = PregnancyInfo::from_lmp(lmp, lmp);
        assert_eq!(info.days_until_due(), FULL_TERM_DAYS);
    }

    #[test]
    fn test_pregnancy_info_rejects_inverted_dates() {
        let start = day(2024, 1, 1);
        assert!(PregnancyInfo::new(start, start, start).is_err());
        assert!(PregnancyInfo::new(start, start - Duration::days(1), start).is_err());
        assert!(PregnancyInfo::new(start, start + Duration::days(1), start).is_ok());
    }

    #[test]
    fn test_progress_snapshot() {
        let info = PregnancyInfo::new(day(2024, 1, 1), day(2024, 10, 1), day(2024, 7, 1)).unwrap();
        let progress = info.progress();

        assert_eq!(progress.gestational_age.weeks, 26);
        assert_eq!(progress.trimester, Trimester::Second);
        assert_eq!(progress.days_until_due, 92);
        assert!(!progress.overdue);

        let late = PregnancyInfo::new(day(2024, 1, 1), day(2024, 10, 1), day(2024, 10, 5)).unwrap();
        let progress = late.progress();
        assert!(progress.overdue);
        assert_eq!(progress.progress_percentage, 100.0);
    }

    #[test]
    fn test_maternal_health_validation() {
        assert!(MaternalHealth::new(-1.0, 10.0, 15.0).is_err());
        assert!(MaternalHealth::new(5.0, 15.0, 10.0).is_err());
        assert!(MaternalHealth::new(f64::NAN, 10.0, 15.0).is_err());

        let health = MaternalHealth::new(8.0, 10.0, 15.0).unwrap();
        assert_eq!(health.status(), WeightGainStatus::Under);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&WeightGainStatus::Over).unwrap();
        assert_eq!(json, "\"over\"");
        assert_eq!(WeightGainStatus::Normal.as_str(), "normal");
    }
}
