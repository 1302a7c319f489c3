use std::collections::BTreeSet;

use crate::models::{BucketSelection, PointRecord, TimeBucketKey};

/// Distinct values of a time bucket, ascending.
pub fn distinct_buckets(records: &[PointRecord], key: TimeBucketKey) -> Vec<u32> {
    records
        .iter()
        .map(|r| key.value_of(r))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The bucket a dashboard starts on: the week, month and year of the first
/// record in fetch order. Not the minimum or the most recent value.
pub fn default_bucket(records: &[PointRecord]) -> Option<BucketSelection> {
    records.first().map(BucketSelection::of)
}
