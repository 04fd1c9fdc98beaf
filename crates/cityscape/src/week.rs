//! Day samples and the ordered week that drives one render.

use bevy::log::{info, warn};
use chrono::{Datelike, Days, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CityError;
use crate::tier::Tier;

/// Weekday names indexed by `weekday` (0 = Sunday).
pub const WEEKDAY_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Counts of the built-in sample week, oldest first.
pub const SAMPLE_COUNTS: [u32; 7] = [3, 4, 1, 10, 6, 5, 11];

/// Long-window total reported alongside the sample week.
pub const SAMPLE_TOTAL: u64 = 1234;

/// Upper bound (inclusive) of counts drawn for a random fallback week.
const RANDOM_MAX_COUNT: u32 = 12;

/// Weeks per year, used to scale a random week into a plausible yearly total.
const RANDOM_TOTAL_WEEKS: u64 = 52;

// ---------------------------------------------------------------------------
// DaySample
// ---------------------------------------------------------------------------

/// One validated day of activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySample {
    pub date: NaiveDate,
    /// 0 = Sunday .. 6 = Saturday.
    pub weekday: u8,
    pub count: u32,
}

impl DaySample {
    /// Build a sample whose weekday is derived from the date.
    pub fn new(date: NaiveDate, count: u32) -> Self {
        Self {
            date,
            weekday: date.weekday().num_days_from_sunday() as u8,
            count,
        }
    }

    pub fn weekday_name(&self) -> &'static str {
        WEEKDAY_NAMES[usize::from(self.weekday) % WEEKDAY_NAMES.len()]
    }

    pub fn tier(&self) -> Tier {
        Tier::classify(self.count)
    }
}

/// A day exactly as the upstream collaborator reports it, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDay {
    pub contribution_count: i64,
    pub date: String,
    pub weekday: i64,
}

impl RawDay {
    /// Reject contract violations instead of clamping them.
    pub fn validate(&self, index: usize) -> Result<DaySample, CityError> {
        let invalid = |reason: String| CityError::InvalidSample { index, reason };

        if self.contribution_count < 0 {
            return Err(invalid(format!(
                "negative count {}",
                self.contribution_count
            )));
        }
        let count = u32::try_from(self.contribution_count)
            .map_err(|_| invalid(format!("count {} out of range", self.contribution_count)))?;
        if !(0..=6).contains(&self.weekday) {
            return Err(invalid(format!("weekday {} outside 0..=6", self.weekday)));
        }
        let date: NaiveDate = self
            .date
            .parse()
            .map_err(|e| invalid(format!("unparseable date '{}': {e}", self.date)))?;

        Ok(DaySample {
            date,
            weekday: self.weekday as u8,
            count,
        })
    }
}

// ---------------------------------------------------------------------------
// Week
// ---------------------------------------------------------------------------

/// Ordered days (oldest first) plus the long-window contribution total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    days: Vec<DaySample>,
    total_contributions: u64,
}

impl Week {
    /// Validate ordering and weekday consistency.
    pub fn new(days: Vec<DaySample>, total_contributions: u64) -> Result<Self, CityError> {
        for (index, day) in days.iter().enumerate() {
            if day.weekday > 6 {
                return Err(CityError::InvalidSample {
                    index,
                    reason: format!("weekday {} outside 0..=6", day.weekday),
                });
            }
            let expected = day.date.weekday().num_days_from_sunday() as u8;
            if day.weekday != expected {
                return Err(CityError::InvalidSample {
                    index,
                    reason: format!(
                        "weekday {} does not match {} (expected {expected})",
                        day.weekday, day.date
                    ),
                });
            }
        }
        if let Some(index) = days
            .windows(2)
            .position(|pair| pair[1].date <= pair[0].date)
        {
            return Err(CityError::InvalidSample {
                index: index + 1,
                reason: format!(
                    "date {} is not after {}",
                    days[index + 1].date,
                    days[index].date
                ),
            });
        }
        Ok(Self {
            days,
            total_contributions,
        })
    }

    /// Validate raw upstream days in order.
    pub fn from_raw(raw: &[RawDay], total_contributions: u64) -> Result<Self, CityError> {
        let days = raw
            .iter()
            .enumerate()
            .map(|(i, d)| d.validate(i))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(days, total_contributions)
    }

    /// The built-in sample week ending on `end`, truncated to the last `days`.
    pub fn sample(end: NaiveDate, days: usize) -> Self {
        let days = days.min(SAMPLE_COUNTS.len());
        let counts = &SAMPLE_COUNTS[SAMPLE_COUNTS.len() - days..];
        Self::ending_on(end, counts, SAMPLE_TOTAL)
    }

    /// A random week ending on `end`.
    pub fn random<R: Rng>(end: NaiveDate, days: usize, rng: &mut R) -> Self {
        let counts: Vec<u32> = (0..days)
            .map(|_| rng.gen_range(0..=RANDOM_MAX_COUNT))
            .collect();
        let sum: u64 = counts.iter().map(|&c| u64::from(c)).sum();
        Self::ending_on(end, &counts, sum * RANDOM_TOTAL_WEEKS)
    }

    fn ending_on(end: NaiveDate, counts: &[u32], total_contributions: u64) -> Self {
        let n = counts.len() as u64;
        let days = counts
            .iter()
            .enumerate()
            .map(|(i, &count)| DaySample::new(end - Days::new(n - 1 - i as u64), count))
            .collect();
        Self {
            days,
            total_contributions,
        }
    }

    pub fn days(&self) -> &[DaySample] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn total_contributions(&self) -> u64 {
        self.total_contributions
    }

    /// Sum of the counts in this week.
    pub fn week_sum(&self) -> u64 {
        self.days.iter().map(|d| u64::from(d.count)).sum()
    }
}

// ---------------------------------------------------------------------------
// Fallback resolution
// ---------------------------------------------------------------------------

/// Choose the week to render.
///
/// DataUnavailable, or a fetched week of the wrong length, falls back to the
/// caller's week with a warning. Every other error is returned untouched.
pub fn resolve_week(
    fetched: Result<Week, CityError>,
    expected_days: usize,
    fallback: impl FnOnce() -> Week,
) -> Result<Week, CityError> {
    let reason = match fetched {
        Ok(week) if week.len() == expected_days => return Ok(week),
        Ok(week) => format!("expected {expected_days} days, got {}", week.len()),
        Err(CityError::DataUnavailable(msg)) => msg,
        Err(e) => return Err(e),
    };

    warn!("Using fallback week ({reason})");
    let week = fallback();
    if week.len() != expected_days {
        return Err(CityError::Config(format!(
            "fallback week has {} days, expected {expected_days}",
            week.len()
        )));
    }
    Ok(week)
}

/// Console report of the week being rendered.
pub fn log_week(week: &Week) {
    info!("Last {} days:", week.len());
    for (i, day) in week.days().iter().enumerate() {
        info!(
            "  {}. {} ({}): {} contributions",
            i + 1,
            day.date,
            day.weekday_name(),
            day.count
        );
    }
    info!("Total contributions: {}", week.total_contributions());
    info!("Week contributions: {}", week.week_sum());
}
