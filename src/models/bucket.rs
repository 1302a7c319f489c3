//! Time buckets and view modes.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::PointRecord;

/// Grouping granularity over the calendar fields of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBucketKey {
    Week,
    Month,
    Year,
}

impl TimeBucketKey {
    /// Bucket value of a record under this key.
    pub fn value_of(self, record: &PointRecord) -> u32 {
        match self {
            TimeBucketKey::Week => record.week_number,
            TimeBucketKey::Month => record.month,
            TimeBucketKey::Year => record.year,
        }
    }

    /// Human label for a bucket value, e.g. "Week 12".
    pub fn label(self, value: u32) -> String {
        match self {
            TimeBucketKey::Week => format!("Week {}", value),
            TimeBucketKey::Month => format!("Month {}", value),
            TimeBucketKey::Year => value.to_string(),
        }
    }
}

impl std::fmt::Display for TimeBucketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeBucketKey::Week => write!(f, "week"),
            TimeBucketKey::Month => write!(f, "month"),
            TimeBucketKey::Year => write!(f, "year"),
        }
    }
}

impl FromStr for TimeBucketKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" | "weekly" | "week_number" => Ok(TimeBucketKey::Week),
            "month" | "monthly" => Ok(TimeBucketKey::Month),
            "year" | "yearly" => Ok(TimeBucketKey::Year),
            other => Err(format!("unknown time bucket '{}'", other)),
        }
    }
}

/// Dashboard view switch: which calendar scope a chart covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Weekly,
    Monthly,
    Yearly,
}

impl ViewMode {
    /// The bucket key this view groups by.
    pub fn bucket_key(self) -> TimeBucketKey {
        match self {
            ViewMode::Weekly => TimeBucketKey::Week,
            ViewMode::Monthly => TimeBucketKey::Month,
            ViewMode::Yearly => TimeBucketKey::Year,
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewMode::Weekly => write!(f, "weekly"),
            ViewMode::Monthly => write!(f, "monthly"),
            ViewMode::Yearly => write!(f, "yearly"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<TimeBucketKey>() {
            Ok(TimeBucketKey::Week) => Ok(ViewMode::Weekly),
            Ok(TimeBucketKey::Month) => Ok(ViewMode::Monthly),
            Ok(TimeBucketKey::Year) => Ok(ViewMode::Yearly),
            Err(_) => Err(format!("unknown view mode '{}'", s.trim())),
        }
    }
}

/// A concrete week/month/year triple, as seeded into dashboard filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSelection {
    pub week: u32,
    pub month: u32,
    pub year: u32,
}

impl BucketSelection {
    pub fn of(record: &PointRecord) -> Self {
        Self {
            week: record.week_number,
            month: record.month,
            year: record.year,
        }
    }
}
