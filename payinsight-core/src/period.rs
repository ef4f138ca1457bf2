//! Calendar buckets used for period-over-period comparison.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bucket granularity
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    /// Monday through Sunday
    Week,
    #[default]
    Month,
    Year,
}

impl PeriodUnit {
    /// Word used in insight statements ("this month")
    pub fn noun(&self) -> &'static str {
        match self {
            PeriodUnit::Week => "week",
            PeriodUnit::Month => "month",
            PeriodUnit::Year => "year",
        }
    }
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

impl FromStr for PeriodUnit {
    type Err = String;

    /// Accepts "week"/"weekly"/"w", "month"/"monthly"/"m", "year"/"yearly"/"y"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "w" | "week" | "weekly" => Ok(PeriodUnit::Week),
            "m" | "month" | "monthly" => Ok(PeriodUnit::Month),
            "y" | "year" | "yearly" => Ok(PeriodUnit::Year),
            other => Err(format!("unknown period unit: {other} (expected week, month or year)")),
        }
    }
}

/// One calendar bucket, identified by its first day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub unit: PeriodUnit,
}

impl Period {
    /// The bucket of `unit` granularity containing `date`
    pub fn containing(unit: PeriodUnit, date: NaiveDate) -> Self {
        let start = match unit {
            PeriodUnit::Week => {
                date - Days::new(u64::from(date.weekday().num_days_from_monday()))
            }
            PeriodUnit::Month => date.with_day(1).unwrap_or(date),
            PeriodUnit::Year => date.with_ordinal(1).unwrap_or(date),
        };
        Self { start, unit }
    }

    /// The bucket immediately before this one, whether or not any data falls in it
    pub fn previous(&self) -> Option<Self> {
        let start = match self.unit {
            PeriodUnit::Week => self.start.checked_sub_days(Days::new(7))?,
            PeriodUnit::Month => self.start.checked_sub_months(Months::new(1))?,
            PeriodUnit::Year => self.start.checked_sub_months(Months::new(12))?,
        };
        Some(Self {
            start,
            unit: self.unit,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Period::containing(self.unit, date) == *self
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            PeriodUnit::Week => {
                let w = self.start.iso_week();
                write!(f, "{}-W{:02}", w.year(), w.week())
            }
            PeriodUnit::Month => write!(f, "{}-{:02}", self.start.year(), self.start.month()),
            PeriodUnit::Year => write!(f, "{}", self.start.year()),
        }
    }
}
