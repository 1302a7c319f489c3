//! Point record model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::NationId;

/// One captured attendance entry for a nation at an event.
///
/// Produced by the normalizer; every required field has already been
/// validated, optional ones are `None` when the backend omitted them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointRecord {
    /// Backend row id
    pub id: Option<u64>,

    pub nation_id: NationId,

    pub nation_name: Option<String>,

    /// Base event name (e.g. "Sunday Service")
    pub event_name: Option<String>,

    pub week_number: u32,

    /// Month number, 1 to 12
    pub month: u32,

    pub year: u32,

    pub date_captured: Option<NaiveDate>,

    pub points_per_person: Option<i64>,

    pub number_of_people: u32,

    /// Points earned by this entry; negative for adjustments
    pub total_points_earned: i64,
}

impl PointRecord {
    /// Create a record with only the required fields set.
    pub fn new(
        nation_id: NationId,
        week_number: u32,
        month: u32,
        year: u32,
        number_of_people: u32,
        total_points_earned: i64,
    ) -> Self {
        Self {
            id: None,
            nation_id,
            nation_name: None,
            event_name: None,
            week_number,
            month,
            year,
            date_captured: None,
            points_per_person: None,
            number_of_people,
            total_points_earned,
        }
    }

    pub fn with_nation_name(mut self, name: impl Into<String>) -> Self {
        self.nation_name = Some(name.into());
        self
    }

    pub fn with_event_name(mut self, name: impl Into<String>) -> Self {
        self.event_name = Some(name.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date_captured = Some(date);
        self
    }

    pub fn with_points_per_person(mut self, points: i64) -> Self {
        self.points_per_person = Some(points);
        self
    }

    /// Display label for the nation, falling back to its id.
    pub fn nation_label(&self) -> String {
        self.nation_name
            .clone()
            .unwrap_or_else(|| format!("Nation {}", self.nation_id))
    }
}
