//! Points calculation engine.
//!
//! Pure functions over normalized point records:
//! - Grouping and summing by nation, time bucket, event or date
//! - Ranking nations by total points
//! - Time bucket discovery and default selection
//! - Filtering by bucket and nation
//! - Nation-by-bucket series for charts

mod aggregate;
mod buckets;
mod filter;
mod rank;
mod series;

pub use aggregate::aggregate;
pub use buckets::{default_bucket, distinct_buckets};
pub use filter::{distinct_nations, filter_records, BucketFilter};
pub use rank::rank;
pub use series::{nation_series, NationSeries, SeriesMeasure, SeriesRow};

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::{NationId, PointRecord};

    /// Minimal record for a nation with the given points in week 1, January 2025.
    pub fn record(nation: u64, name: &str, points: i64) -> PointRecord {
        PointRecord::new(NationId::new(nation), 1, 1, 2025, 1, points).with_nation_name(name)
    }

    pub fn dated(nation: u64, week: u32, month: u32, year: u32, points: i64) -> PointRecord {
        PointRecord::new(NationId::new(nation), week, month, year, 2, points)
    }
}
