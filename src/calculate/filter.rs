use serde::{Deserialize, Serialize};

use crate::models::{BucketSelection, NationId, PointRecord, ViewMode};

/// Explicit filter parameters. `None` fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketFilter {
    pub week: Option<u32>,
    pub month: Option<u32>,
    pub year: Option<u32>,
    pub nation: Option<NationId>,
}

impl BucketFilter {
    /// Filter a chart view applies for a selected bucket.
    ///
    /// Weeks are only meaningful inside a month and year, months inside a
    /// year, so the weekly view pins all three.
    pub fn for_view(mode: ViewMode, selection: BucketSelection) -> Self {
        match mode {
            ViewMode::Weekly => Self {
                week: Some(selection.week),
                month: Some(selection.month),
                year: Some(selection.year),
                nation: None,
            },
            ViewMode::Monthly => Self {
                month: Some(selection.month),
                year: Some(selection.year),
                ..Self::default()
            },
            ViewMode::Yearly => Self {
                year: Some(selection.year),
                ..Self::default()
            },
        }
    }

    pub fn with_nation(mut self, nation: NationId) -> Self {
        self.nation = Some(nation);
        self
    }

    /// True when no bucket field is pinned.
    pub fn is_unbounded(&self) -> bool {
        self.week.is_none() && self.month.is_none() && self.year.is_none()
    }

    pub fn matches(&self, record: &PointRecord) -> bool {
        self.week.map_or(true, |w| record.week_number == w)
            && self.month.map_or(true, |m| record.month == m)
            && self.year.map_or(true, |y| record.year == y)
            && self.nation.map_or(true, |n| record.nation_id == n)
    }
}

/// Records matching the filter, in input order.
pub fn filter_records(records: &[PointRecord], filter: &BucketFilter) -> Vec<PointRecord> {
    records
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect()
}

/// Nations present in the records, first-seen order, with their names.
pub fn distinct_nations(records: &[PointRecord]) -> Vec<(NationId, Option<String>)> {
    let mut seen: Vec<(NationId, Option<String>)> = Vec::new();
    for record in records {
        if !seen.iter().any(|(id, _)| *id == record.nation_id) {
            seen.push((record.nation_id, record.nation_name.clone()));
        }
    }
    seen
}
