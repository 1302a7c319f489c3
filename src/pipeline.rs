//! Load-and-rank pipeline.
//!
//! Fetch raw records once, normalize, filter, aggregate and rank. All filter
//! state is passed in explicitly; nothing is cached between loads.

use serde::Serialize;
use tracing::info;

use crate::calculate::{
    aggregate, default_bucket, distinct_buckets, filter_records, rank, BucketFilter,
};
use crate::fetch::{FetchError, RecordSource};
use crate::models::{
    BucketSelection, GroupSpec, Nation, PointRecord, Ranked, RankedEntry, ScopeId,
    TimeBucketKey, ViewMode,
};
use crate::normalize::{normalize, NormalizeOutcome};

/// What a standings view should show.
#[derive(Debug, Clone, Default)]
pub struct StandingsQuery {
    pub group_by: GroupSpec,

    /// Explicit bucket and nation filter
    pub filter: BucketFilter,

    /// When set, bucket fields the filter leaves open are seeded from the
    /// default bucket and then narrowed to what the view covers
    pub view: Option<ViewMode>,
}

impl StandingsQuery {
    /// Nation leaderboard over all records.
    pub fn by_nation() -> Self {
        Self {
            group_by: GroupSpec::by_nation(),
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: BucketFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_view(mut self, view: ViewMode) -> Self {
        self.view = Some(view);
        self
    }

    /// The filter actually applied to `records`.
    pub fn resolve_filter(&self, records: &[PointRecord]) -> BucketFilter {
        let Some(mode) = self.view else {
            return self.filter;
        };
        let Some(seed) = default_bucket(records) else {
            return self.filter;
        };

        let selection = BucketSelection {
            week: self.filter.week.unwrap_or(seed.week),
            month: self.filter.month.unwrap_or(seed.month),
            year: self.filter.year.unwrap_or(seed.year),
        };
        let mut filter = BucketFilter::for_view(mode, selection);
        filter.nation = self.filter.nation;
        filter
    }
}

/// A ranked view plus the options a dashboard offers for narrowing it.
#[derive(Debug, Clone, Serialize)]
pub struct Standings {
    pub entries: Vec<RankedEntry>,

    /// Filter that produced `entries`
    pub filter: BucketFilter,

    pub weeks: Vec<u32>,
    pub months: Vec<u32>,
    pub years: Vec<u32>,

    /// Valid records before filtering
    pub record_count: usize,

    /// Records dropped as malformed
    pub skipped: usize,
}

impl Standings {
    /// Rank-1 entry, if any.
    pub fn leader(&self) -> Option<&RankedEntry> {
        self.entries.first()
    }
}

/// Fetch and normalize one address's records.
pub async fn load_records(
    source: &dyn RecordSource,
    scope: ScopeId,
) -> Result<NormalizeOutcome, FetchError> {
    let raw = source.fetch_point_records(scope).await?;
    let outcome = normalize(&raw);
    info!(
        "Loaded {} point records for address {} from {} ({} skipped)",
        outcome.records.len(),
        scope,
        source.name(),
        outcome.skipped()
    );
    Ok(outcome)
}

/// Build standings from already-normalized records.
pub fn standings(outcome: &NormalizeOutcome, query: &StandingsQuery) -> Standings {
    let records = &outcome.records;
    let filter = query.resolve_filter(records);
    let selected = filter_records(records, &filter);

    Standings {
        entries: rank(aggregate(&selected, &query.group_by)),
        filter,
        weeks: distinct_buckets(records, TimeBucketKey::Week),
        months: distinct_buckets(records, TimeBucketKey::Month),
        years: distinct_buckets(records, TimeBucketKey::Year),
        record_count: records.len(),
        skipped: outcome.skipped(),
    }
}

/// Fetch an address's records and build standings.
pub async fn load_standings(
    source: &dyn RecordSource,
    scope: ScopeId,
    query: &StandingsQuery,
) -> Result<Standings, FetchError> {
    let outcome = load_records(source, scope).await?;
    Ok(standings(&outcome, query))
}

/// Rank nations by their backend-computed totals.
pub async fn nation_leaderboard(
    source: &dyn RecordSource,
) -> Result<Vec<Ranked<Nation>>, FetchError> {
    let nations = source.fetch_nations().await?;
    Ok(rank(nations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NationId, TopPerformers};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    /// In-memory record source.
    struct StaticSource {
        pub records: Vec<Value>,
        pub nations: Vec<Nation>,
        pub fail: bool,
    }

    impl StaticSource {
        pub fn new(records: Vec<Value>) -> Self {
            Self {
                records,
                nations: Vec::new(),
                fail: false,
            }
        }

        pub fn failing() -> Self {
            Self {
                records: Vec::new(),
                nations: Vec::new(),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl RecordSource for StaticSource {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn fetch_point_records(&self, _scope: ScopeId) -> Result<Vec<Value>, FetchError> {
            if self.fail {
                return Err(FetchError::HttpStatus {
                    status: 503,
                    message: "Service Unavailable".to_string(),
                });
            }
            Ok(self.records.clone())
        }

        async fn fetch_nations(&self) -> Result<Vec<Nation>, FetchError> {
            if self.fail {
                return Err(FetchError::HttpStatus {
                    status: 503,
                    message: "Service Unavailable".to_string(),
                });
            }
            Ok(self.nations.clone())
        }

        async fn fetch_top_performers(&self, _scope: ScopeId) -> Result<TopPerformers, FetchError> {
            Ok(TopPerformers::default())
        }
    }

    fn raw(nation: u64, name: &str, week: u32, month: u32, year: u32, points: i64) -> Value {
        json!({
            "nation": { "id": nation, "nation": name },
            "baseEvent": { "name": "Sunday Service" },
            "weekNumber": week,
            "month": month,
            "year": year,
            "numberOfPeople": 1,
            "totalPointsEarnedPerWeek": points
        })
    }

    fn sample() -> Vec<Value> {
        vec![
            raw(1, "Impact", 10, 3, 2025, 50),
            raw(2, "Flawless", 10, 3, 2025, 80),
            raw(1, "Impact", 10, 3, 2025, 30),
            raw(3, "Revolution", 11, 3, 2025, 200),
            raw(2, "Flawless", 2, 1, 2024, 500),
        ]
    }

    #[tokio::test]
    async fn test_load_standings_all_records() {
        let source = StaticSource::new(sample());
        let result = load_standings(&source, ScopeId::new(1), &StandingsQuery::by_nation())
            .await
            .unwrap();

        let order: Vec<_> = result
            .entries
            .iter()
            .map(|e| (e.rank, e.item.nation_name.clone().unwrap(), e.item.total_points))
            .collect();
        assert_eq!(
            order,
            vec![
                (1, "Flawless".to_string(), 580),
                (2, "Revolution".to_string(), 200),
                (3, "Impact".to_string(), 80),
            ]
        );
        assert_eq!(result.weeks, vec![2, 10, 11]);
        assert_eq!(result.months, vec![1, 3]);
        assert_eq!(result.years, vec![2024, 2025]);
        assert_eq!(result.record_count, 5);
        assert_eq!(result.skipped, 0);
        assert_eq!(result.leader().map(|e| e.rank), Some(1));
    }

    #[tokio::test]
    async fn test_weekly_view_seeds_from_first_record() {
        let source = StaticSource::new(sample());
        let query = StandingsQuery::by_nation().with_view(ViewMode::Weekly);

        let result = load_standings(&source, ScopeId::new(1), &query).await.unwrap();

        assert_eq!(result.filter.week, Some(10));
        assert_eq!(result.filter.month, Some(3));
        assert_eq!(result.filter.year, Some(2025));
        // Impact 50 + 30 ties Flawless 80; Impact was seen first.
        let order: Vec<_> = result
            .entries
            .iter()
            .map(|e| (e.item.key.nation_id, e.item.total_points))
            .collect();
        assert_eq!(
            order,
            vec![(Some(NationId::new(1)), 80), (Some(NationId::new(2)), 80)]
        );
    }

    #[tokio::test]
    async fn test_view_with_explicit_year() {
        let source = StaticSource::new(sample());
        let query = StandingsQuery::by_nation()
            .with_filter(BucketFilter {
                year: Some(2024),
                ..BucketFilter::default()
            })
            .with_view(ViewMode::Yearly);

        let result = load_standings(&source, ScopeId::new(1), &query).await.unwrap();

        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].item.total_points, 500);
    }

    #[tokio::test]
    async fn test_explicit_filter_without_view() {
        let source = StaticSource::new(sample());
        let query = StandingsQuery::by_nation().with_filter(
            BucketFilter {
                month: Some(3),
                ..BucketFilter::default()
            }
            .with_nation(NationId::new(1)),
        );

        let result = load_standings(&source, ScopeId::new(1), &query).await.unwrap();
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].item.total_points, 80);
        assert_eq!(result.entries[0].item.record_count, 2);
    }

    #[tokio::test]
    async fn test_malformed_records_are_skipped() {
        let mut records = sample();
        records.push(json!({ "nation": { "id": 1 }, "weekNumber": 10, "month": 3, "year": 2025 }));
        records.push(json!("garbage"));
        let source = StaticSource::new(records);

        let result = load_standings(&source, ScopeId::new(1), &StandingsQuery::by_nation())
            .await
            .unwrap();

        assert_eq!(result.skipped, 2);
        assert_eq!(result.record_count, 5);
        let total: i64 = result.entries.iter().map(|e| e.item.total_points).sum();
        assert_eq!(total, 860);
    }

    #[tokio::test]
    async fn test_empty_dataset_is_not_an_error() {
        let source = StaticSource::new(Vec::new());
        let query = StandingsQuery::by_nation().with_view(ViewMode::Weekly);

        let result = load_standings(&source, ScopeId::new(1), &query).await.unwrap();

        assert!(result.entries.is_empty());
        assert!(result.weeks.is_empty());
        assert!(result.filter.is_unbounded());
        assert!(result.leader().is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_surfaced() {
        let source = StaticSource::failing();

        let err = load_standings(&source, ScopeId::new(1), &StandingsQuery::by_nation())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::HttpStatus { status: 503, .. }));

        assert!(nation_leaderboard(&source).await.is_err());
    }

    #[test]
    fn test_nation_leaderboard() {
        let mut source = StaticSource::new(Vec::new());
        source.nations = vec![
            Nation::new(NationId::new(1), "Invincible").with_total_points(40),
            Nation::new(NationId::new(2), "Explosion").with_total_points(75),
        ];

        let ranked = tokio_test::block_on(nation_leaderboard(&source)).unwrap();

        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].item.name, "Explosion");
        assert_eq!(ranked[1].item.name, "Invincible");
    }

    #[test]
    fn test_extreme_points_do_not_panic() {
        let outcome = normalize(&[
            raw(1, "Impact", 1, 1, 2025, i64::MAX),
            raw(1, "Impact", 1, 1, 2025, 1),
            raw(2, "Flawless", 1, 1, 2025, 5),
        ]);
        assert_eq!(outcome.skipped(), 0);

        let result = standings(&outcome, &StandingsQuery::by_nation());

        assert_eq!(result.entries[0].item.total_points, i64::MAX);
        assert_eq!(result.entries[1].item.total_points, 5);
    }

    #[test]
    fn test_standings_is_pure_over_outcome() {
        let outcome = normalize(&sample());
        let query = StandingsQuery::by_nation().with_view(ViewMode::Monthly);

        let first = standings(&outcome, &query);
        let second = standings(&outcome, &query);

        assert_eq!(first.entries, second.entries);
        assert_eq!(first.filter.month, Some(3));
        assert!(first.filter.week.is_none());
    }
}
