use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{NationId, PointRecord, TimeBucketKey};

use super::buckets::distinct_buckets;
use super::filter::distinct_nations;

/// What a series cell counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesMeasure {
    #[default]
    Points,
    People,
}

impl SeriesMeasure {
    fn value_of(self, record: &PointRecord) -> i64 {
        match self {
            SeriesMeasure::Points => record.total_points_earned,
            SeriesMeasure::People => i64::from(record.number_of_people),
        }
    }
}

impl fmt::Display for SeriesMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesMeasure::Points => write!(f, "points"),
            SeriesMeasure::People => write!(f, "people"),
        }
    }
}

impl FromStr for SeriesMeasure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "points" => Ok(SeriesMeasure::Points),
            "people" => Ok(SeriesMeasure::People),
            other => Err(format!("unknown series measure '{}'", other)),
        }
    }
}

/// One nation's values per bucket, aligned with [`NationSeries::buckets`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesRow {
    pub nation_id: NationId,
    pub nation_name: Option<String>,
    pub values: Vec<i64>,
}

impl SeriesRow {
    pub fn total(&self) -> i64 {
        self.values.iter().fold(0i64, |acc, v| acc.saturating_add(*v))
    }
}

/// Nation-by-bucket matrix of point or people totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NationSeries {
    pub key: TimeBucketKey,
    pub measure: SeriesMeasure,
    pub buckets: Vec<u32>,
    pub rows: Vec<SeriesRow>,
}

impl NationSeries {
    pub fn labels(&self) -> Vec<String> {
        self.buckets.iter().map(|b| self.key.label(*b)).collect()
    }
}

/// Build the series for `key`. Nations appear in first-seen order; a nation
/// with no records in a bucket gets 0 there. Cell sums saturate.
pub fn nation_series(
    records: &[PointRecord],
    key: TimeBucketKey,
    measure: SeriesMeasure,
) -> NationSeries {
    let buckets = distinct_buckets(records, key);
    let column: HashMap<u32, usize> = buckets.iter().enumerate().map(|(i, b)| (*b, i)).collect();

    let mut rows: Vec<SeriesRow> = distinct_nations(records)
        .into_iter()
        .map(|(nation_id, nation_name)| SeriesRow {
            nation_id,
            nation_name,
            values: vec![0; buckets.len()],
        })
        .collect();
    let row_of: HashMap<NationId, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (row.nation_id, i))
        .collect();

    for record in records {
        let row = row_of[&record.nation_id];
        let col = column[&key.value_of(record)];
        let cell = &mut rows[row].values[col];
        *cell = cell.saturating_add(measure.value_of(record));
    }

    NationSeries {
        key,
        measure,
        buckets,
        rows,
    }
}
