//! Contribution calendar payloads saved by the external fetch step.
//!
//! Accepts either the full GraphQL response
//! (`data.user.contributionsCollection.contributionCalendar`) or the bare
//! calendar object. Anything that does not yield a calendar is
//! `DataUnavailable`; individual bad days are `InvalidSample`.

use serde::Deserialize;
use serde_json::Value;

use crate::error::CityError;
use crate::week::{RawDay, Week};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    #[serde(default)]
    pub total_contributions: Option<u64>,
    pub weeks: Vec<CalendarWeek>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarWeek {
    pub contribution_days: Vec<RawDay>,
}

impl ContributionCalendar {
    /// Parse a saved payload.
    pub fn from_json(text: &str) -> Result<Self, CityError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| CityError::DataUnavailable(format!("calendar is not JSON: {e}")))?;

        if let Some(errors) = value.get("errors").filter(|e| !e.is_null()) {
            return Err(CityError::DataUnavailable(format!(
                "GraphQL errors: {errors}"
            )));
        }

        let calendar = match value.pointer("/data/user") {
            Some(Value::Null) => {
                return Err(CityError::DataUnavailable("user not found".to_string()))
            }
            Some(user) => user
                .pointer("/contributionsCollection/contributionCalendar")
                .cloned()
                .ok_or_else(|| {
                    CityError::DataUnavailable("response has no contribution calendar".into())
                })?,
            None => value,
        };

        serde_json::from_value(calendar)
            .map_err(|e| CityError::DataUnavailable(format!("malformed calendar: {e}")))
    }

    /// Every day in the calendar, in payload order.
    pub fn all_days(&self) -> impl Iterator<Item = &RawDay> {
        self.weeks.iter().flat_map(|w| w.contribution_days.iter())
    }

    /// The payload total, or the sum of every day when it is absent.
    ///
    /// A negative count anywhere in the calendar is `InvalidSample`, indexed
    /// by the day's position in payload order.
    pub fn total(&self) -> Result<u64, CityError> {
        let counts = self
            .all_days()
            .enumerate()
            .map(|(index, d)| {
                u64::try_from(d.contribution_count).map_err(|_| CityError::InvalidSample {
                    index,
                    reason: format!("negative count {} on {}", d.contribution_count, d.date),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self
            .total_contributions
            .unwrap_or_else(|| counts.iter().sum()))
    }

    /// The newest `days` days, oldest first.
    pub fn last_days(&self, days: usize) -> Result<Week, CityError> {
        let mut all: Vec<RawDay> = self.all_days().cloned().collect();
        if all.len() < days {
            return Err(CityError::DataUnavailable(format!(
                "calendar holds {} days, need {days}",
                all.len()
            )));
        }
        // ISO dates sort lexicographically; unparseable ones are reported by
        // validation below.
        all.sort_by(|a, b| a.date.cmp(&b.date));
        let total = self.total()?;
        let recent = &all[all.len() - days..];
        Week::from_raw(recent, total)
    }
}
