//! Aggregation and ranking models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{Nation, NationId, PointRecord};

/// A record field that can take part in a grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupField {
    Nation,
    Week,
    Month,
    Year,
    Event,
    Date,
}

impl std::fmt::Display for GroupField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupField::Nation => write!(f, "nation"),
            GroupField::Week => write!(f, "week"),
            GroupField::Month => write!(f, "month"),
            GroupField::Year => write!(f, "year"),
            GroupField::Event => write!(f, "event"),
            GroupField::Date => write!(f, "date"),
        }
    }
}

impl FromStr for GroupField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nation" => Ok(GroupField::Nation),
            "week" => Ok(GroupField::Week),
            "month" => Ok(GroupField::Month),
            "year" => Ok(GroupField::Year),
            "event" => Ok(GroupField::Event),
            "date" => Ok(GroupField::Date),
            other => Err(format!("unknown group field '{}'", other)),
        }
    }
}

/// Set of fields to group by. Order is kept, duplicates are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    fields: Vec<GroupField>,
}

impl GroupSpec {
    pub fn new(fields: impl IntoIterator<Item = GroupField>) -> Self {
        let mut spec = Self::default();
        for field in fields {
            spec = spec.with(field);
        }
        spec
    }

    /// Group by nation only.
    pub fn by_nation() -> Self {
        Self::new([GroupField::Nation])
    }

    pub fn with(mut self, field: GroupField) -> Self {
        if !self.fields.contains(&field) {
            self.fields.push(field);
        }
        self
    }

    pub fn contains(&self, field: GroupField) -> bool {
        self.fields.contains(&field)
    }

    pub fn fields(&self) -> &[GroupField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse a comma-separated list such as "nation,week".
    pub fn parse_list(s: &str) -> Result<Self, String> {
        s.split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse::<GroupField>)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    /// Project a record onto the selected fields.
    pub fn key_for(&self, record: &PointRecord) -> GroupKey {
        let mut key = GroupKey::default();
        for field in &self.fields {
            match field {
                GroupField::Nation => key.nation_id = Some(record.nation_id),
                GroupField::Week => key.week = Some(record.week_number),
                GroupField::Month => key.month = Some(record.month),
                GroupField::Year => key.year = Some(record.year),
                GroupField::Event => key.event = record.event_name.clone(),
                GroupField::Date => key.date = record.date_captured,
            }
        }
        key
    }
}

/// Grouping key of an aggregate. Only selected fields are set.
///
/// A record without an event name or capture date groups under `None`
/// for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nation_id: Option<NationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// Summed totals for one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateEntry {
    pub key: GroupKey,

    /// Name of the nation of the first record in the group, when grouped by nation
    pub nation_name: Option<String>,

    pub total_points: i64,

    pub total_people: u64,

    pub record_count: u32,
}

impl AggregateEntry {
    pub fn new(key: GroupKey) -> Self {
        Self {
            key,
            nation_name: None,
            total_points: 0,
            total_people: 0,
            record_count: 0,
        }
    }

    /// Fold one record into the totals. Sums saturate at the integer bounds.
    pub(crate) fn add(&mut self, record: &PointRecord) {
        self.total_points = self.total_points.saturating_add(record.total_points_earned);
        self.total_people = self
            .total_people
            .saturating_add(u64::from(record.number_of_people));
        self.record_count = self.record_count.saturating_add(1);
    }

    /// Short label describing the group, e.g. "Impact / Week 3".
    pub fn label(&self) -> String {
        let mut parts = Vec::new();
        if let Some(id) = self.key.nation_id {
            parts.push(
                self.nation_name
                    .clone()
                    .unwrap_or_else(|| format!("Nation {}", id)),
            );
        }
        if let Some(event) = &self.key.event {
            parts.push(event.clone());
        }
        if let Some(date) = self.key.date {
            parts.push(date.to_string());
        }
        if let Some(week) = self.key.week {
            parts.push(format!("Week {}", week));
        }
        if let Some(month) = self.key.month {
            parts.push(format!("Month {}", month));
        }
        if let Some(year) = self.key.year {
            parts.push(year.to_string());
        }
        if parts.is_empty() {
            "All".to_string()
        } else {
            parts.join(" / ")
        }
    }
}

/// Anything that can be ordered on a leaderboard.
pub trait Scored {
    fn score(&self) -> i64;
}

impl Scored for AggregateEntry {
    fn score(&self) -> i64 {
        self.total_points
    }
}

impl Scored for Nation {
    fn score(&self) -> i64 {
        self.total_points
    }
}

/// An item with its 1-based leaderboard position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranked<T> {
    pub rank: u32,
    #[serde(flatten)]
    pub item: T,
}

/// A ranked aggregate.
pub type RankedEntry = Ranked<AggregateEntry>;
